//! Human-readable summary printed after a conversion.

use std::fmt;
use std::time::Duration;

use colored::Colorize;

use crate::models::ConversionResult;

pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{} ms", millis)
    } else {
        format!("{:.2} s", millis as f64 / 1000.0)
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

/// Conversion summary; its `Display` output is what the binary prints.
pub struct Report<'a> {
    pub result: &'a ConversionResult,
    pub elapsed: Duration,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(f, "{}", "Conversion succeeded".green().bold())?;
        writeln!(f)?;
        writeln!(f, "{}", "Statistics:".bold())?;
        writeln!(f, "  Sheets            : {}", result.sheets_processed)?;
        writeln!(f, "  Total rows        : {}", result.total_rows)?;
        writeln!(f, "  Rows converted    : {}", result.rows_converted)?;
        writeln!(f, "  Empty rows skipped: {}", result.empty_rows_skipped)?;
        writeln!(f, "  Columns detected  : {}", result.columns_detected)?;
        writeln!(f, "  Elapsed           : {}", format_duration(self.elapsed))?;
        writeln!(f)?;
        writeln!(f, "{}", "Output:".bold())?;
        writeln!(f, "  Path              : {}", result.output_path)?;
        writeln!(f, "  Size              : {}", format_file_size(result.output_file_size))?;

        if !result.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", "Warnings:".yellow().bold())?;
            for warning in &result.warnings {
                writeln!(f, "  - {}", warning.yellow())?;
            }
        }
        Ok(())
    }
}

pub fn render(result: &ConversionResult, elapsed: Duration) -> String {
    Report { result, elapsed }.to_string()
}
