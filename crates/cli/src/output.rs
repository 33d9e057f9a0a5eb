//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print an error message
#[allow(dead_code)]
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a 0-1 confidence as a percentage
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// Color a prediction result: concerning outcomes in red, clear ones green
pub fn color_result(result: &str) -> String {
    match result {
        "Positive" | "High Risk" => result.red().bold().to_string(),
        "Negative" | "Low Risk" => result.green().bold().to_string(),
        other => other.normal().to_string(),
    }
}

/// Render model availability as a colored marker
pub fn availability_marker(loaded: bool) -> String {
    if loaded {
        "✓ loaded".green().to_string()
    } else {
        "✗ unavailable".red().to_string()
    }
}
