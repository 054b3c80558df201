//! Result aggregation.

use crate::types::{Domain, LookupResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts for the end-of-run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub available: usize,
    pub total: usize,
}

/// Count available domains against the total.
pub fn summarize(results: &[LookupResult]) -> Summary {
    Summary {
        available: results.iter().filter(|r| r.available).count(),
        total: results.len(),
    }
}

/// Available domains in alphabetical order.
pub fn available_domains(results: &[LookupResult]) -> Vec<&Domain> {
    let mut available: Vec<&Domain> = results
        .iter()
        .filter(|r| r.available)
        .map(|r| &r.domain)
        .collect();
    available.sort();
    available
}

impl Summary {
    /// The report line with the available count rendered by the caller,
    /// e.g. styled for a terminal.
    pub fn line_with<A: fmt::Display>(&self, available: A) -> String {
        format!("{} domains are available out of {}", available, self.total)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line_with(self.available))
    }
}
