//! Core data types for domain availability checking.
//!
//! This module defines the validated `Domain` value, the cached and reported
//! result records, and the checker configuration.

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::error::DomainSieveError;
use crate::utils::normalize_hostname;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A syntactically valid, case-folded hostname.
///
/// Construction goes through [`Domain::parse`], so a `Domain` always holds the
/// canonical lowercase form and `"EXAMPLE.COM"` equals `"example.com"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// Validate and canonicalize a hostname.
    pub fn parse(input: &str) -> Result<Self, DomainSieveError> {
        normalize_hostname(input).map(Domain)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for Domain {
    type Err = DomainSieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::parse(s)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Domain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Domain::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A persisted availability record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub domain: Domain,

    /// Last availability reported by the registrar
    pub available: bool,

    /// When the registrar was asked, in Unix epoch milliseconds
    pub checked_at: i64,
}

/// Where a lookup result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultSource {
    #[serde(rename = "cache")]
    Cache,

    #[serde(rename = "registrar")]
    Registrar,
}

/// Availability of one domain for the current run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub domain: Domain,
    pub available: bool,
    pub source: ResultSource,
}

impl LookupResult {
    pub fn from_cache(entry: &CacheEntry) -> Self {
        Self {
            domain: entry.domain.clone(),
            available: entry.available,
            source: ResultSource::Cache,
        }
    }

    pub fn from_registrar(domain: Domain, available: bool) -> Self {
        Self {
            domain,
            available,
            source: ResultSource::Registrar,
        }
    }
}

/// Configuration options for the availability checker.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    /// Domains per registrar call.
    /// Default: 50, Range: 1-50
    pub batch_size: usize,

    /// Cache entries older than this are treated as misses and re-queried.
    /// Default: None (cached answers never expire)
    pub max_age: Option<Duration>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_age: None,
        }
    }
}

impl CheckConfig {
    /// Set the batch size, clamped to what the registrar accepts per call.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, DEFAULT_BATCH_SIZE);
        self
    }

    /// Set the freshness horizon for cache entries.
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }
}

impl fmt::Display for ResultSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultSource::Cache => write!(f, "cache"),
            ResultSource::Registrar => write!(f, "registrar"),
        }
    }
}
