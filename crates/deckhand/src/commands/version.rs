use colored::Colorize;

pub fn run() {
    println!(
        "{} {}",
        "deckhand".bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}
