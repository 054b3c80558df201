//! Domain Sieve CLI Application
//!
//! Reads a file of candidate domain names, answers what it can from the local
//! cache, asks the registrar about the rest and prints how many are available.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_sieve_lib::{
    load_domains, load_env_config, parse_duration_string, summarize, AvailabilityChecker,
    CacheStore, ConfigManager, DomainSieveError, FileConfig, Settings, VercelRegistrar,
    DEFAULT_BATCH_SIZE, DEFAULT_DOMAINS_FILE,
};
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-sieve
#[derive(Parser, Debug)]
#[command(name = "domain-sieve")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sai Dutt G.V <gvs46@protonmail.com>")]
#[command(about = "Check a list of domains for availability, caching registrar answers")]
#[command(
    long_about = "Check a list of domains for availability.\n\nDomains already in the local cache are answered from it; the rest are sent to the registrar in batches of up to 50 and cached."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// File with one domain per line (# starts a comment)
    #[arg(value_name = "FILE", default_value = DEFAULT_DOMAINS_FILE)]
    pub file: PathBuf,

    /// SQLite cache database (default: domains.sqlite)
    #[arg(long = "cache", value_name = "PATH", help_heading = "Cache")]
    pub cache: Option<PathBuf>,

    /// Re-check cached entries older than this (e.g. 12h, 30d)
    #[arg(long = "max-age", value_name = "DURATION", help_heading = "Cache")]
    pub max_age: Option<String>,

    /// Registrar team identifier
    #[arg(long = "team-id", value_name = "ID", help_heading = "Registrar")]
    pub team_id: Option<String>,

    /// Domains per registrar call (1-50)
    #[arg(long = "batch-size", value_name = "N", help_heading = "Registrar")]
    pub batch_size: Option<usize>,

    /// Output results and summary as JSON
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// List available domains before the summary line
    #[arg(short = 'a', long = "show-available", help_heading = "Output Format")]
    pub show_available: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Show progress logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        ui::print_error(&e);
        process::exit(1);
    }

    init_tracing(&args);

    if let Err(e) = run(args).await {
        ui::print_error(&e.to_string());
        process::exit(1);
    }
}

/// Log to stderr so stdout only carries results. `RUST_LOG` wins over flags.
fn init_tracing(args: &Args) {
    let default_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if let Some(batch_size) = args.batch_size {
        if batch_size == 0 || batch_size > DEFAULT_BATCH_SIZE {
            return Err(format!(
                "Batch size must be between 1 and {}",
                DEFAULT_BATCH_SIZE
            ));
        }
    }

    if let Some(max_age) = &args.max_age {
        if parse_duration_string(max_age).is_none() {
            return Err(format!(
                "Invalid --max-age '{}'. Use a format like '30s', '5m', '12h' or '7d'",
                max_age
            ));
        }
    }

    if args.show_available && args.json {
        return Err("Cannot combine --show-available with --json".to_string());
    }

    Ok(())
}

async fn run(args: Args) -> Result<(), DomainSieveError> {
    let settings = resolve_settings(&args)?;
    debug!("Resolved settings: {:?}", redacted(&settings));

    // Input is validated before the cache or registrar are touched.
    let domains = load_domains(&args.file)?;

    let store = CacheStore::open(&settings.cache_path)?;
    let registrar = VercelRegistrar::new(settings.registrar)?;
    let mut checker = AvailabilityChecker::new(store, registrar, settings.check);

    let results = checker.check(&domains).await?;
    let summary = summarize(&results);

    if args.json {
        ui::print_json(&results, summary)?;
    } else {
        if args.show_available {
            ui::print_available(&results);
        }
        ui::print_summary(summary);
    }

    Ok(())
}

/// Config file < environment < CLI arguments.
fn resolve_settings(args: &Args) -> Result<Settings, DomainSieveError> {
    let manager = ConfigManager::new();
    let file_config: FileConfig = match &args.config {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load()?,
    };

    let settings = Settings::default()
        .apply_file_config(&file_config)
        .apply_env_config(&load_env_config());

    Ok(apply_cli_args(settings, args))
}

/// Apply CLI arguments to settings (highest precedence).
fn apply_cli_args(mut settings: Settings, args: &Args) -> Settings {
    if let Some(cache) = &args.cache {
        settings.cache_path = cache.clone();
    }
    if let Some(team_id) = &args.team_id {
        settings.registrar.team_id = Some(team_id.clone());
    }
    if let Some(batch_size) = args.batch_size {
        settings.check = settings.check.with_batch_size(batch_size);
    }
    if let Some(max_age) = args.max_age.as_deref().and_then(parse_duration_string) {
        settings.check = settings.check.with_max_age(Some(max_age));
    }
    settings
}

fn redacted(settings: &Settings) -> Settings {
    let mut copy = settings.clone();
    if copy.registrar.bearer_token.is_some() {
        copy.registrar.bearer_token = Some("***".to_string());
    }
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn create_test_args() -> Args {
        Args {
            file: PathBuf::from(DEFAULT_DOMAINS_FILE),
            cache: None,
            max_age: None,
            team_id: None,
            batch_size: None,
            json: false,
            show_available: false,
            config: None,
            debug: false,
            verbose: false,
        }
    }

    #[test]
    fn test_default_file_argument() {
        let args = Args::parse_from(["domain-sieve"]);
        assert_eq!(args.file, PathBuf::from("domains.txt"));

        let args = Args::parse_from(["domain-sieve", "shortlist.txt", "--batch-size", "10"]);
        assert_eq!(args.file, PathBuf::from("shortlist.txt"));
        assert_eq!(args.batch_size, Some(10));
    }

    #[test]
    fn test_validate_args_batch_size() {
        let mut args = create_test_args();
        assert!(validate_args(&args).is_ok());

        args.batch_size = Some(0);
        assert!(validate_args(&args).is_err());

        args.batch_size = Some(51);
        assert!(validate_args(&args).is_err());

        args.batch_size = Some(50);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_max_age() {
        let mut args = create_test_args();
        args.max_age = Some("eventually".to_string());
        assert!(validate_args(&args).is_err());

        args.max_age = Some("30d".to_string());
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_conflicting_output() {
        let mut args = create_test_args();
        args.json = true;
        args.show_available = true;
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_cli_args_override_settings() {
        let mut args = create_test_args();
        args.cache = Some(PathBuf::from("cli.sqlite"));
        args.team_id = Some("cli-team".to_string());
        args.batch_size = Some(5);
        args.max_age = Some("2h".to_string());

        let mut base = Settings::default();
        base.registrar.team_id = Some("env-team".to_string());

        let settings = apply_cli_args(base, &args);
        assert_eq!(settings.cache_path, PathBuf::from("cli.sqlite"));
        assert_eq!(settings.registrar.team_id.as_deref(), Some("cli-team"));
        assert_eq!(settings.check.batch_size, 5);
        assert_eq!(settings.check.max_age, Some(Duration::from_secs(7_200)));
    }

    #[test]
    fn test_cli_args_leave_unset_values_alone() {
        let mut base = Settings::default();
        base.registrar.team_id = Some("env-team".to_string());

        let settings = apply_cli_args(base.clone(), &create_test_args());
        assert_eq!(settings, base);
    }

    #[test]
    fn test_redacted_hides_token() {
        let mut settings = Settings::default();
        settings.registrar.bearer_token = Some("secret".to_string());
        let shown = format!("{:?}", redacted(&settings));
        assert!(!shown.contains("secret"));
    }
}
