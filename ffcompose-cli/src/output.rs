//! Styled stdout helpers for command results.

use owo_colors::OwoColorize;
use std::fmt::Display;

pub fn print_heading(title: &str) {
    println!("{}", title.bold().bright_white());
    println!("{}", "=".repeat(title.len().max(20)).bright_blue());
}

pub fn print_section(title: &str) {
    println!();
    println!("{}", title.bold().cyan());
}

pub fn print_info(label: &str, value: impl Display) {
    println!("  {:<18} {}", format!("{label}:").yellow(), value);
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".bright_green().bold(), message);
}
