pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod deck;
pub mod input;
pub mod render;
pub mod theme;
