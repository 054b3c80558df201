// domain-sieve-lib/tests/integration.rs

//! Integration tests for the load → check → summarize pipeline

use async_trait::async_trait;
use domain_sieve_lib::{
    load_domains, parse_domains, summarize, Availability, AvailabilityChecker,
    AvailabilityProvider, CacheStore, CheckConfig, Domain, DomainSieveError, ResultSource,
    VercelConfig, VercelRegistrar,
};
use httpmock::prelude::*;
use std::collections::HashSet;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::{NamedTempFile, TempDir};

/// Fake registrar: even-numbered names are available. Optionally fails on
/// the given 1-based call.
#[derive(Clone, Default)]
struct CountingRegistrar {
    batches: Arc<Mutex<Vec<Vec<Domain>>>>,
    fail_on_call: Option<usize>,
}

impl CountingRegistrar {
    fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Default::default()
        }
    }

    fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    fn batches(&self) -> Vec<Vec<Domain>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvailabilityProvider for CountingRegistrar {
    async fn bulk_availability(
        &self,
        domains: &[Domain],
    ) -> Result<Vec<Availability>, DomainSieveError> {
        let call = {
            let mut batches = self.batches.lock().unwrap();
            batches.push(domains.to_vec());
            batches.len()
        };
        if self.fail_on_call == Some(call) {
            return Err(DomainSieveError::registrar_with_status("bad gateway", 502));
        }

        Ok(domains
            .iter()
            .map(|d| Availability {
                domain: d.clone(),
                available: is_even_name(d),
            })
            .collect())
    }
}

fn is_even_name(domain: &Domain) -> bool {
    domain
        .as_str()
        .trim_start_matches("name")
        .split('.')
        .next()
        .and_then(|n| n.parse::<usize>().ok())
        .is_some_and(|n| n % 2 == 0)
}

fn numbered_domains(count: usize) -> HashSet<Domain> {
    (0..count)
        .map(|i| Domain::parse(&format!("name{}.com", i)).unwrap())
        .collect()
}

#[tokio::test]
async fn test_120_uncached_domains_use_three_batches() {
    let registrar = CountingRegistrar::default();
    let mut checker = AvailabilityChecker::new(
        CacheStore::open_in_memory().unwrap(),
        registrar.clone(),
        CheckConfig::default(),
    );

    let domains = numbered_domains(120);
    let results = checker.check(&domains).await.unwrap();

    assert_eq!(registrar.batch_sizes(), vec![50, 50, 20]);
    assert_eq!(results.len(), 120);

    let returned: HashSet<Domain> = results.iter().map(|r| r.domain.clone()).collect();
    assert_eq!(returned, domains);

    // Batches went out in the order the uncached list was chunked, and each
    // domain was sent exactly once.
    let sent: Vec<Domain> = registrar.batches().concat();
    let fetched: Vec<Domain> = results.iter().map(|r| r.domain.clone()).collect();
    assert_eq!(sent, fetched);
    assert_eq!(sent.iter().collect::<HashSet<_>>().len(), 120);

    assert_eq!(summarize(&results).available, 60);
    assert_eq!(checker.store().len().unwrap(), 120);
}

#[tokio::test]
async fn test_second_check_is_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("domains.sqlite");
    let domains = numbered_domains(75);

    let first_registrar = CountingRegistrar::default();
    let mut first = AvailabilityChecker::new(
        CacheStore::open(&db_path).unwrap(),
        first_registrar.clone(),
        CheckConfig::default(),
    );
    let first_results = first.check(&domains).await.unwrap();
    assert_eq!(first_registrar.batch_sizes(), vec![50, 25]);
    drop(first);

    let second_registrar = CountingRegistrar::default();
    let mut second = AvailabilityChecker::new(
        CacheStore::open(&db_path).unwrap(),
        second_registrar.clone(),
        CheckConfig::default(),
    );
    let second_results = second.check(&domains).await.unwrap();

    assert!(second_registrar.batch_sizes().is_empty());
    assert!(second_results.iter().all(|r| r.source == ResultSource::Cache));

    let as_map = |results: &[domain_sieve_lib::LookupResult]| {
        results
            .iter()
            .map(|r| (r.domain.clone(), r.available))
            .collect::<std::collections::HashMap<_, _>>()
    };
    assert_eq!(as_map(&first_results), as_map(&second_results));
}

#[tokio::test]
async fn test_failure_on_second_batch_keeps_first_batch() {
    let registrar = CountingRegistrar::failing_on(2);
    let mut checker = AvailabilityChecker::new(
        CacheStore::open_in_memory().unwrap(),
        registrar.clone(),
        CheckConfig::default(),
    );

    let err = checker.check(&numbered_domains(120)).await.unwrap_err();
    assert!(matches!(
        err,
        DomainSieveError::Registrar {
            status_code: Some(502),
            ..
        }
    ));

    // The third batch was never attempted.
    let batches = registrar.batches();
    assert_eq!(batches.len(), 2);

    let store = checker.store();
    for domain in &batches[0] {
        let entry = store.get(domain).unwrap().expect("first batch cached");
        assert_eq!(entry.available, is_even_name(domain));
    }
    for domain in &batches[1] {
        assert!(store.get(domain).unwrap().is_none());
    }
    assert_eq!(store.len().unwrap(), 50);
}

#[tokio::test]
async fn test_smaller_batch_size_from_config() {
    let registrar = CountingRegistrar::default();
    let mut checker = AvailabilityChecker::new(
        CacheStore::open_in_memory().unwrap(),
        registrar.clone(),
        CheckConfig::default().with_batch_size(10),
    );

    checker.check(&numbered_domains(25)).await.unwrap();
    assert_eq!(registrar.batch_sizes(), vec![10, 10, 5]);
}

#[tokio::test]
async fn test_load_and_check_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# shortlist").unwrap();
    writeln!(file, "name2.com").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "NAME2.COM").unwrap();
    writeln!(file, "name3.com").unwrap();
    file.flush().unwrap();

    let domains = load_domains(file.path()).unwrap();
    assert_eq!(domains.len(), 2);

    let mut checker = AvailabilityChecker::new(
        CacheStore::open_in_memory().unwrap(),
        CountingRegistrar::default(),
        CheckConfig::default(),
    );
    let results = checker.check(&domains).await.unwrap();
    assert_eq!(
        summarize(&results).to_string(),
        "1 domains are available out of 2"
    );
}

#[test]
fn test_invalid_line_aborts_before_any_work() {
    let err = parse_domains("fine.com\nnot a domain!!\n", "inline").unwrap_err();
    assert!(err.is_validation());
}

// ============================================================
// Vercel registrar against a mock server
// ============================================================

fn mock_registrar(server: &MockServer, team_id: Option<&str>) -> VercelRegistrar {
    VercelRegistrar::new(VercelConfig {
        bearer_token: Some("test-token".to_string()),
        team_id: team_id.map(str::to_string),
        base_url: server.base_url(),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_vercel_bulk_availability_request_shape() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/registrar/domains/availability")
                .query_param("teamId", "team_abc")
                .header("authorization", "Bearer test-token")
                .json_body(serde_json::json!({ "domains": ["alpha.com", "beta.com"] }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "results": [
                        { "domain": "alpha.com", "available": true },
                        { "domain": "beta.com", "available": false }
                    ]
                }));
        })
        .await;

    let registrar = mock_registrar(&server, Some("team_abc"));
    let domains = vec![
        Domain::parse("alpha.com").unwrap(),
        Domain::parse("beta.com").unwrap(),
    ];
    let answers = registrar.bulk_availability(&domains).await.unwrap();

    mock.assert_async().await;
    assert_eq!(answers.len(), 2);
    assert!(answers[0].available);
    assert!(!answers[1].available);
}

#[tokio::test]
async fn test_vercel_error_status_is_registrar_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/registrar/domains/availability");
            then.status(403)
                .json_body(serde_json::json!({ "error": { "code": "forbidden" } }));
        })
        .await;

    let registrar = mock_registrar(&server, None);
    let err = registrar
        .bulk_availability(&[Domain::parse("x.com").unwrap()])
        .await
        .unwrap_err();

    match err {
        DomainSieveError::Registrar {
            status_code,
            message,
        } => {
            assert_eq!(status_code, Some(403));
            assert!(message.contains("forbidden"));
        }
        other => panic!("expected registrar error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_vercel_malformed_body_is_registrar_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/registrar/domains/availability");
            then.status(200).body("not json");
        })
        .await;

    let registrar = mock_registrar(&server, None);
    let err = registrar
        .bulk_availability(&[Domain::parse("x.com").unwrap()])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainSieveError::Registrar { .. }));
}

#[tokio::test]
async fn test_checker_with_vercel_registrar_caches_answers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/registrar/domains/availability");
            then.status(200).json_body(serde_json::json!({
                "results": [{ "domain": "solo.dev", "available": true }]
            }));
        })
        .await;

    let mut checker = AvailabilityChecker::new(
        CacheStore::open_in_memory().unwrap(),
        mock_registrar(&server, None),
        CheckConfig::default(),
    );
    let domains: HashSet<Domain> = [Domain::parse("solo.dev").unwrap()].into_iter().collect();

    for _ in 0..2 {
        let results = checker.check(&domains).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].available);
    }

    // Second run was answered from the cache.
    mock.assert_hits_async(1).await;
}
