//! Utility functions for hostname validation and duration parsing.

use crate::error::DomainSieveError;
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;

/// Longest hostname accepted, excluding an optional trailing root dot.
pub const MAX_HOSTNAME_LEN: usize = 253;

/// Longest single label accepted.
pub const MAX_LABEL_LEN: usize = 63;

lazy_static! {
    // Operates on already lowercased labels.
    static ref LABEL_RE: Regex = Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$").unwrap();
}

/// Validate a hostname and return its canonical form.
///
/// The canonical form is trimmed, ASCII-lowercased and has a single trailing
/// root dot removed. Labels are letters, digits and hyphens, 1-63 characters,
/// and may not start or end with a hyphen.
///
/// # Errors
///
/// Returns `DomainSieveError::InvalidDomain` describing the first rule broken.
pub fn normalize_hostname(input: &str) -> Result<String, DomainSieveError> {
    let trimmed = input.trim();
    let host = trimmed.strip_suffix('.').unwrap_or(trimmed);

    if host.is_empty() {
        return Err(DomainSieveError::invalid_domain(
            input,
            "Hostname cannot be empty",
        ));
    }

    if !host.is_ascii() {
        return Err(DomainSieveError::invalid_domain(
            input,
            "Hostname must be ASCII (use punycode for internationalized names)",
        ));
    }

    if host.len() > MAX_HOSTNAME_LEN {
        return Err(DomainSieveError::invalid_domain(
            input,
            format!("Hostname longer than {} characters", MAX_HOSTNAME_LEN),
        ));
    }

    let host = host.to_ascii_lowercase();

    for label in host.split('.') {
        if label.is_empty() {
            return Err(DomainSieveError::invalid_domain(input, "Empty label"));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainSieveError::invalid_domain(
                input,
                format!("Label '{}' longer than {} characters", label, MAX_LABEL_LEN),
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(DomainSieveError::invalid_domain(
                input,
                format!("Label '{}' starts or ends with a hyphen", label),
            ));
        }
        if !LABEL_RE.is_match(label) {
            let bad = label
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
                .unwrap_or('?');
            return Err(DomainSieveError::invalid_domain(
                input,
                format!("Illegal character '{}' in label '{}'", bad, label),
            ));
        }
    }

    Ok(host)
}

/// Parse a duration string like "30s", "5m", "12h", "7d" or bare seconds.
///
/// Returns None if parsing fails.
pub fn parse_duration_string(value: &str) -> Option<Duration> {
    let value = value.trim().to_lowercase();

    let (number, multiplier) = if let Some(n) = value.strip_suffix('s') {
        (n, 1)
    } else if let Some(n) = value.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = value.strip_suffix('h') {
        (n, 60 * 60)
    } else if let Some(n) = value.strip_suffix('d') {
        (n, 24 * 60 * 60)
    } else {
        (value.as_str(), 1)
    };

    number
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .map(Duration::from_secs)
}
