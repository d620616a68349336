//! Output formatting and display utilities
//!
//! Provides colored, formatted output for the prompt loop

use colored::Colorize;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", msg.bold().underline());
}

/// Print a subheader
pub fn subheader(msg: &str) {
    println!("\n{}", msg.bold());
}

/// Print the client banner
pub fn banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!("{}", format!("termtrack v{}", version).bold());
    println!("{}", "Project and task tracking from the terminal".dimmed());
    println!();
}
