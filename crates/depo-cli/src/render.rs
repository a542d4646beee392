//! Terminal output for dependency state.

use colored::Colorize;
use depo_core::dependency::{DependencyRecord, DependencySet, SearchResult};
use depo_core::session::SessionError;

pub fn dependencies(set: &DependencySet) {
    if set.is_empty() {
        println!("{}", "No dependencies.".bright_black());
        return;
    }
    for record in set.iter() {
        println!("  {}", record_line(record));
    }
}

pub fn search_results(results: &SearchResult) {
    if results.is_empty() {
        println!(
            "{}",
            format!("No candidates for '{}'.", results.query).bright_black()
        );
        return;
    }
    println!(
        "{}",
        format!("Candidates for '{}':", results.query).bright_yellow()
    );
    for record in results.iter() {
        println!("  {}", record_line(record));
    }
}

pub fn selection(record: &DependencyRecord) {
    println!(
        "{}",
        format!("Selected {}", record_line(record)).bright_cyan()
    );
}

pub fn session_error(error: &SessionError) {
    println!(
        "{} {}",
        format!("[{}]", error.occurred_at).bright_black(),
        error.to_string().red()
    );
}

/// One-line summary: `name [full name] version (constraint) [installed]`.
pub fn record_line(record: &DependencyRecord) -> String {
    let mut line = record.name.bold().to_string();
    if record.display_name() != record.name {
        line.push_str(&format!(" {}", record.display_name().bright_black()));
    }
    if let Some(version) = &record.version {
        line.push_str(&format!(" {}", version.green()));
    }
    if let Some(constraint) = &record.version_constraint {
        line.push_str(&format!(" ({})", constraint.yellow()));
    }
    if record.installed == Some(true) {
        line.push_str(&format!(" {}", "[installed]".bright_black()));
    }
    line
}
