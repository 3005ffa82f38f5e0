//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use sizing_lib::AllocationResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a rounded table from rows
pub fn print_table<T: tabled::Tabled>(rows: Vec<T>) {
    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a load or EPS value with thousands separators
pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    if !rounded.is_finite() {
        return value.to_string();
    }

    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Describe an allocation, e.g. "2 x LARGE + 1 standby"
pub fn format_allocation(allocation: &AllocationResult) -> String {
    let standby = allocation.standby_count();
    match allocation.display_size() {
        Some(size) => {
            let base = format!("{} x {}", allocation.primary_count(), size);
            if standby > 0 {
                format!("{} + {} standby", base, standby)
            } else {
                base
            }
        }
        None if standby > 0 => format!("{} standby only", standby),
        None => "No collectors required".to_string(),
    }
}

/// Color utilization against the max-load threshold
pub fn color_utilization(allocation: &AllocationResult, max_load_percent: f64) -> String {
    let Some(utilization) = allocation.primary_utilization() else {
        return "N/A".dimmed().to_string();
    };

    let formatted = format!("{}%", utilization);
    if utilization >= 100 {
        formatted.red().to_string()
    } else if f64::from(utilization) >= max_load_percent {
        formatted.yellow().to_string()
    } else {
        formatted.green().to_string()
    }
}

/// Format an optional export timestamp for display
pub fn format_timestamp(ts: Option<&chrono::DateTime<chrono::Utc>>) -> String {
    ts.map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string())
}
