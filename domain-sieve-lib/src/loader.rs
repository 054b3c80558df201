//! Domain list loading.
//!
//! Input files hold one hostname per line. Blank lines and lines starting
//! with `#` are ignored; every other line must be a valid hostname or the
//! whole load fails.

use crate::error::DomainSieveError;
use crate::types::Domain;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// Read and validate a domain list file.
///
/// # Errors
///
/// - `FileError` if the file cannot be read
/// - `Validation` for the first line that is not a valid hostname
pub fn load_domains<P: AsRef<Path>>(path: P) -> Result<HashSet<Domain>, DomainSieveError> {
    let path = path.as_ref();
    let origin = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|e| {
        DomainSieveError::file_error(&origin, format!("Failed to read domain list: {}", e))
    })?;

    parse_domains(&content, &origin)
}

/// Validate domain list text. `origin` names the source in errors and logs.
pub fn parse_domains(content: &str, origin: &str) -> Result<HashSet<Domain>, DomainSieveError> {
    let mut domains = HashSet::new();
    let mut validated = 0usize;

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let domain = Domain::parse(line).map_err(|cause| DomainSieveError::Validation {
            path: origin.to_string(),
            line: index + 1,
            input: line.to_string(),
            cause: Box::new(cause),
        })?;

        validated += 1;
        domains.insert(domain);
    }

    info!(
        "Loaded and validated {} domains from {} with {} unique entries",
        validated,
        origin,
        domains.len()
    );

    Ok(domains)
}
