//! # Domain Sieve Library
//!
//! Bulk domain availability checking with a persistent cache.
//!
//! A run loads a domain list, answers what it can from a SQLite cache and
//! asks the registrar about the rest in batches of at most 50, caching every
//! answer it receives.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_sieve_lib::{
//!     load_domains, summarize, AvailabilityChecker, CacheStore, CheckConfig, VercelConfig,
//!     VercelRegistrar,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let domains = load_domains("domains.txt")?;
//!     let store = CacheStore::open("domains.sqlite")?;
//!     let registrar = VercelRegistrar::new(VercelConfig {
//!         bearer_token: std::env::var("VERCEL_BEARER_TOKEN").ok(),
//!         ..Default::default()
//!     })?;
//!
//!     let mut checker = AvailabilityChecker::new(store, registrar, CheckConfig::default());
//!     let results = checker.check(&domains).await?;
//!     println!("{}", summarize(&results));
//!     Ok(())
//! }
//! ```

pub use batch::{chunk, DEFAULT_BATCH_SIZE};
pub use checker::{AvailabilityChecker, Partition};
pub use config::{
    load_env_config, CacheFileConfig, ConfigManager, EnvConfig, FileConfig, RegistrarFileConfig,
    Settings, DEFAULT_CACHE_PATH, DEFAULT_DOMAINS_FILE,
};
pub use error::DomainSieveError;
pub use loader::{load_domains, parse_domains};
pub use registrar::{
    Availability, AvailabilityProvider, VercelConfig, VercelRegistrar, DEFAULT_VERCEL_API_URL,
};
pub use report::{available_domains, summarize, Summary};
pub use store::CacheStore;
pub use types::{CacheEntry, CheckConfig, Domain, LookupResult, ResultSource};
pub use utils::{normalize_hostname, parse_duration_string};

mod batch;
mod checker;
mod config;
mod error;
mod loader;
mod registrar;
mod report;
mod store;
mod types;
mod utils;

pub type Result<T> = std::result::Result<T, DomainSieveError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
