use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();
    println!("  {:<20} {}", "defaults.theme", config.theme().cyan());
    println!(
        "  {:<20} {}",
        "defaults.windowed",
        config.windowed().to_string().cyan()
    );
    println!(
        "  {:<20} {}",
        "defaults.hint",
        config.hint().to_string().cyan()
    );
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {} = {} ({})",
        "Saved".green(),
        key,
        value.cyan(),
        path.display()
    );
    Ok(())
}
