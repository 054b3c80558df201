//! Registrar access for domains the cache cannot answer.
//!
//! The checker only sees the [`AvailabilityProvider`] trait; the Vercel
//! registrar client is the production implementation.

/// Vercel registrar bulk availability client
pub mod vercel;

pub use vercel::{VercelConfig, VercelRegistrar, DEFAULT_VERCEL_API_URL};

use crate::error::DomainSieveError;
use crate::types::Domain;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One `{domain, available}` pair reported by a registrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub domain: Domain,
    pub available: bool,
}

/// Bulk availability lookup against a registrar.
///
/// Callers pass at most [`crate::batch::DEFAULT_BATCH_SIZE`] domains per
/// call. Implementations do not retry; any failure is returned as-is.
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    async fn bulk_availability(
        &self,
        domains: &[Domain],
    ) -> Result<Vec<Availability>, DomainSieveError>;
}
