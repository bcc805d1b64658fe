//! Terminal output utilities

use console::style;
use std::fmt::Display;

/// Print a success message
pub fn success(msg: impl Display) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: impl Display) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: impl Display) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a section header
pub fn header(title: &str) {
    println!("\n{}", style(title).bold().underlined());
}

/// Print an indented key-value pair
pub fn kv(key: &str, value: impl Display) {
    println!("  {}: {}", style(key).dim(), value);
}
