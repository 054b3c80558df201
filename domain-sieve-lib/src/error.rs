//! Error handling for domain sieve operations.
//!
//! A single error type covers the three ways a run can fail (bad input,
//! registrar failure, cache failure) plus file and configuration problems.

use std::fmt;

/// Main error type for domain sieve operations.
///
/// None of these are retried. A run either produces a complete result set or
/// stops with one of these.
#[derive(Debug, Clone)]
pub enum DomainSieveError {
    /// A string is not a syntactically valid hostname
    InvalidDomain { domain: String, reason: String },

    /// A non-blank, non-comment line of an input file failed validation.
    ///
    /// Wraps the hostname error that caused it.
    Validation {
        path: String,
        line: usize,
        input: String,
        cause: Box<DomainSieveError>,
    },

    /// The registrar lookup failed (network, auth, server error, bad payload)
    Registrar {
        message: String,
        status_code: Option<u16>,
    },

    /// The persistent cache failed (I/O, corruption, SQL error)
    Store { message: String },

    /// File I/O errors when reading domain lists or config files
    FileError { path: String, message: String },

    /// Configuration errors (invalid settings, missing credentials, etc.)
    ConfigError { message: String },
}

impl DomainSieveError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new registrar error.
    pub fn registrar<M: Into<String>>(message: M) -> Self {
        Self::Registrar {
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a new registrar error with HTTP status code.
    pub fn registrar_with_status<M: Into<String>>(message: M, status_code: u16) -> Self {
        Self::Registrar {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new store error.
    pub fn store<M: Into<String>>(message: M) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Whether this error was raised while validating input, before any
    /// cache or registrar work happened.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidDomain { .. })
    }
}

impl fmt::Display for DomainSieveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::Validation {
                path,
                line,
                input,
                cause,
            } => {
                write!(
                    f,
                    "Failed to validate domains from {} (line {}: '{}'): {}",
                    path, line, input, cause
                )
            }
            Self::Registrar {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "Registrar error (HTTP {}): {}", code, message)
                } else {
                    write!(f, "Registrar error: {}", message)
                }
            }
            Self::Store { message } => {
                write!(f, "Cache store error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for DomainSieveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DomainSieveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::registrar(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            Self::registrar(format!("Connection failed: {}", err))
        } else if let Some(status) = err.status() {
            Self::registrar_with_status(err.to_string(), status.as_u16())
        } else {
            Self::registrar(format!("HTTP request failed: {}", err))
        }
    }
}

impl From<rusqlite::Error> for DomainSieveError {
    fn from(err: rusqlite::Error) -> Self {
        Self::store(err.to_string())
    }
}

impl From<serde_json::Error> for DomainSieveError {
    fn from(err: serde_json::Error) -> Self {
        Self::registrar(format!("JSON parsing failed: {}", err))
    }
}

impl From<toml::de::Error> for DomainSieveError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML configuration: {}", err))
    }
}
