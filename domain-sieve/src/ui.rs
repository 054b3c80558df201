//! Terminal output for domain-sieve.
//!
//! Results go to stdout, errors to stderr. Colors come from the `console`
//! crate and are dropped automatically when output is not a terminal.

use console::style;
use domain_sieve_lib::{available_domains, DomainSieveError, LookupResult, Summary};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    results: Vec<&'a LookupResult>,
}

/// Print one line per available domain, alphabetically.
pub fn print_available(results: &[LookupResult]) {
    for domain in available_domains(results) {
        println!("{} {}", style("✓").green().bold(), style(domain).green());
    }
}

/// Print the final summary line.
pub fn print_summary(summary: Summary) {
    println!("{}", format_summary(summary));
}

pub fn format_summary(summary: Summary) -> String {
    summary.line_with(style(summary.available).green().bold())
}

/// Print results sorted by domain, plus the summary, as pretty JSON.
pub fn print_json(results: &[LookupResult], summary: Summary) -> Result<(), DomainSieveError> {
    let mut sorted: Vec<&LookupResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.domain.cmp(&b.domain));

    let report = JsonReport {
        summary,
        results: sorted,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &report)
        .map_err(|e| DomainSieveError::file_error("<stdout>", e.to_string()))?;
    writeln!(out).map_err(|e| DomainSieveError::file_error("<stdout>", e.to_string()))?;
    Ok(())
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
}
