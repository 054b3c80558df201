//! Cache-aware availability checking.
//!
//! This module provides the `AvailabilityChecker` that answers what it can
//! from the cache and sends the rest to the registrar in sequential batches.

use crate::batch::chunk;
use crate::error::DomainSieveError;
use crate::registrar::AvailabilityProvider;
use crate::store::{now_millis, CacheStore};
use crate::types::{CheckConfig, Domain, LookupResult};
use std::collections::HashSet;
use tracing::{info, warn};

/// Domains split by what the cache knows about them.
#[derive(Debug, Default)]
pub struct Partition {
    /// Results answered from the cache, unchanged
    pub cached: Vec<LookupResult>,
    /// Domains that must be asked of the registrar
    pub uncached: Vec<Domain>,
}

/// Coordinates cache lookups, registrar batches and cache write-back.
///
/// The checker owns the cache handle for the lifetime of a run; batches go
/// out one at a time so the store only ever has a single writer.
///
/// # Example
///
/// ```rust,no_run
/// use domain_sieve_lib::{load_domains, summarize, AvailabilityChecker, CacheStore, CheckConfig};
/// use domain_sieve_lib::{VercelConfig, VercelRegistrar};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let domains = load_domains("domains.txt")?;
///     let store = CacheStore::open("domains.sqlite")?;
///     let registrar = VercelRegistrar::new(VercelConfig::default())?;
///
///     let mut checker = AvailabilityChecker::new(store, registrar, CheckConfig::default());
///     let results = checker.check(&domains).await?;
///     println!("{}", summarize(&results));
///     Ok(())
/// }
/// ```
pub struct AvailabilityChecker<P> {
    store: CacheStore,
    provider: P,
    config: CheckConfig,
}

impl<P: AvailabilityProvider> AvailabilityChecker<P> {
    pub fn new(store: CacheStore, provider: P, config: CheckConfig) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    /// Look up every domain in the cache.
    ///
    /// With `max_age` configured, entries checked longer ago than that are
    /// reported as uncached.
    pub fn partition(&self, domains: &HashSet<Domain>) -> Result<Partition, DomainSieveError> {
        // A horizon too long to express in epoch millis has no cutoff.
        let stale_before = self
            .config
            .max_age
            .and_then(|age| i64::try_from(age.as_millis()).ok())
            .map(|age_ms| now_millis().saturating_sub(age_ms));

        let mut partition = Partition::default();
        let mut stale = 0usize;

        for domain in domains {
            match self.store.get(domain)? {
                Some(entry) if stale_before.is_some_and(|cutoff| entry.checked_at < cutoff) => {
                    stale += 1;
                    partition.uncached.push(domain.clone());
                }
                Some(entry) => partition.cached.push(LookupResult::from_cache(&entry)),
                None => partition.uncached.push(domain.clone()),
            }
        }

        if stale > 0 {
            info!("{} cached entries are older than the configured max age", stale);
        }

        Ok(partition)
    }

    /// Determine availability for every domain in `domains`.
    ///
    /// Cached answers come first, followed by registrar answers in batch
    /// order. Each registrar answer is written to the cache before the next
    /// batch is sent.
    ///
    /// # Errors
    ///
    /// The first registrar or store failure ends the run. Batches completed
    /// before it stay cached; later batches are never sent.
    pub async fn check(
        &mut self,
        domains: &HashSet<Domain>,
    ) -> Result<Vec<LookupResult>, DomainSieveError> {
        let Partition {
            cached: mut results,
            uncached,
        } = self.partition(domains)?;

        info!("Found cached results for {} domains", results.len());

        if uncached.is_empty() {
            return Ok(results);
        }

        info!("Checking availability for {} domains", uncached.len());

        let batches = chunk(&uncached, self.config.batch_size);
        let total = batches.len();

        for (index, batch) in batches.iter().enumerate() {
            info!(
                "Processing batch {}/{} ({} domains)",
                index + 1,
                total,
                batch.len()
            );

            let answers = self.provider.bulk_availability(batch).await?;
            let requested: HashSet<&Domain> = batch.iter().collect();

            // Reject the whole response before any of it reaches the cache.
            if let Some(stranger) = answers
                .iter()
                .find(|a| !requested.contains(&a.domain))
            {
                return Err(DomainSieveError::registrar(format!(
                    "Registrar answered for '{}', which was not in the batch",
                    stranger.domain
                )));
            }

            let mut answered: HashSet<Domain> = HashSet::with_capacity(answers.len());
            for answer in answers {
                if !answered.insert(answer.domain.clone()) {
                    warn!("Registrar answered twice for {}; keeping the first", answer.domain);
                    continue;
                }

                self.store.upsert(&answer.domain, answer.available)?;
                results.push(LookupResult::from_registrar(answer.domain, answer.available));
            }

            if answered.len() < batch.len() {
                let missing: Vec<&str> = batch
                    .iter()
                    .filter(|d| !answered.contains(*d))
                    .map(Domain::as_str)
                    .collect();
                warn!(
                    "Registrar returned no answer for {} domains: {}",
                    missing.len(),
                    missing.join(", ")
                );
            }
        }

        info!("Checked and cached results for {} domains", uncached.len());

        Ok(results)
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Give back the cache handle, ending the checker's run.
    pub fn into_store(self) -> CacheStore {
        self.store
    }
}
