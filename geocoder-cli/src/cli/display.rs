//! Terminal output: inline messages, tables and the progress bar

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::geocode::{BatchResult, RowOutcome};
use crate::workbook::{CellValue, cols};

/// Widest a table cell may get before it is truncated
const MAX_CELL_WIDTH: usize = 32;

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message.yellow());
}

pub fn info(message: &str) {
    println!("{} {}", "ℹ".cyan(), message);
}

pub fn heading(title: &str) {
    println!();
    println!("{}", title.bold().underline());
}

pub fn banner() {
    println!("{}", "📍 Address Geocoding Service".bright_blue().bold());
    println!("Load an Excel file with addresses to get latitude and longitude coordinates.");
}

/// Print a table of raw cells
pub fn print_cells(headers: &[String], rows: &[Vec<CellValue>]) {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();
    print_grid(headers, &rows);
}

/// Per-row failures followed by the batch counters
pub fn print_summary(result: &BatchResult) {
    for row in result.failures() {
        if let RowOutcome::Failed { reason } = &row.outcome {
            warning(&format!("Error processing row {}: {}", row.position, reason));
        }
    }

    success(&format!(
        "Processing complete! Processed {} addresses with {} errors.",
        result.processed_count, result.error_count
    ));
    if result.not_found_count() > 0 {
        info(&format!(
            "{} addresses returned no location.",
            result.not_found_count()
        ));
    }
}

/// Summary plus the full result table
pub fn print_results(result: &BatchResult) {
    print_summary(result);

    heading("Results");

    let mut headers = result.headers.clone();
    headers.push(cols::LATITUDE.to_string());
    headers.push(cols::LONGITUDE.to_string());

    let rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.cells.iter().map(|c| c.to_string()).collect();
            cells.push(row.outcome.latitude().to_string());
            cells.push(row.outcome.longitude().to_string());
            cells
        })
        .collect();

    print_grid(&headers, &rows);
}

fn print_grid(headers: &[String], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(col) {
                *width = (*width).max(display_width(cell));
            }
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w).bold().to_string())
        .collect();
    println!("{}", header_line.join("  "));

    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    println!("{}", rule.join("  ").dimmed());

    for row in rows {
        let line: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(col, w)| pad(row.get(col).map(String::as_str).unwrap_or(""), *w))
            .collect();
        println!("{}", line.join("  "));
    }
}

fn display_width(s: &str) -> usize {
    s.width().min(MAX_CELL_WIDTH)
}

/// Truncate to `width` columns (with an ellipsis) and right-pad with spaces
fn pad(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;

    if s.width() > width {
        for ch in s.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w + 1 > width {
                break;
            }
            out.push(ch);
            used += w;
        }
        out.push('…');
        used += 1;
    } else {
        out.push_str(s);
        used = s.width();
    }

    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// Progress bar for a running batch
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ ");
        bar.set_style(style);
        bar.set_message(format!("Processing addresses: 0/{}", total));

        Self { bar }
    }

    pub fn update(&self, completed: usize, total: usize) {
        self.bar.set_position(completed as u64);
        self.bar
            .set_message(format!("Processing addresses: {}/{}", completed, total));
    }

    pub fn finish(self) {
        self.bar.finish();
    }

    pub fn abandon(self) {
        self.bar.abandon();
    }
}
