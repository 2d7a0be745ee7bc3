//! Shared components for CLI commands
//!
//! Common helpers used across command implementations: logging setup,
//! layered configuration assembly, and input loading.

use crate::app::models::RawStationRecord;
use crate::cli::args::EnrichArgs;
use crate::config::Config;
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Set up structured logging on stderr
///
/// Respects `RUST_LOG` when set; otherwise filters to the crate at the
/// requested level.
pub fn setup_logging(log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("station_enricher={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using the layered approach (file -> env -> args)
pub fn load_configuration(args: &EnrichArgs) -> Result<Config> {
    info!("Loading configuration");

    // Determine config file path
    let default_config_path = if args.config_file.is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_ref()
            .filter(|path| path.exists())
            .map(|path| path.as_path()),
    };

    if let Some(config_path) = config_file {
        info!("Using config file: {}", config_path.display());
    } else {
        info!("No config file found, using defaults and environment variables");
    }

    let mut config = Config::load_layered(config_file)?;

    // Apply CLI argument overrides
    apply_cli_overrides(&mut config, args);

    // Final validation
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &EnrichArgs) {
    if let Some(output_root) = &args.output_root {
        config.output.output_root = output_root.clone();
    }

    if let Some(chunk_size) = args.chunk_size {
        config.batch.chunk_size = chunk_size;
    }

    if let Some(interval_ms) = args.request_interval_ms {
        config.lookup.request_interval_ms = interval_ms;
    }

    if let Some(max_attempts) = args.max_attempts {
        config.lookup.max_attempts = max_attempts;
    }

    if args.capture_imagery {
        config.batch.capture_imagery = true;
    }

    if let Some(api_key) = &args.api_key {
        config.lookup.api_key = Some(api_key.clone());
    }

    config.logging.level = args.get_log_level().to_string();
}

/// Read raw station records from a JSON listings file
///
/// The file must hold a JSON array of raw records; every record must
/// carry a non-empty name. The set is not assumed pre-deduplicated.
pub fn read_listings(path: &Path) -> Result<Vec<RawStationRecord>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read listings file '{}'", path.display()), e))?;

    let records: Vec<RawStationRecord> = serde_json::from_str(&raw).map_err(|e| {
        Error::input_format(
            path.display().to_string(),
            format!("expected a JSON array of station records: {}", e),
        )
    })?;

    for (index, record) in records.iter().enumerate() {
        record.validate().map_err(|e| {
            Error::input_format(
                path.display().to_string(),
                format!("record at index {} is invalid: {}", index, e),
            )
        })?;
    }

    debug!("Loaded {} listings from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apply_cli_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        let args = EnrichArgs {
            output_root: Some(temp_dir.path().to_path_buf()),
            chunk_size: Some(10),
            request_interval_ms: Some(500),
            max_attempts: Some(5),
            capture_imagery: true,
            api_key: Some("cli-key".to_string()),
            ..Default::default()
        };

        apply_cli_overrides(&mut config, &args);

        assert_eq!(config.output.output_root, temp_dir.path());
        assert_eq!(config.batch.chunk_size, 10);
        assert_eq!(config.lookup.request_interval_ms, 500);
        assert_eq!(config.lookup.max_attempts, 5);
        assert!(config.batch.capture_imagery);
        assert_eq!(config.lookup.api_key.as_deref(), Some("cli-key"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_leave_unset_fields_alone() {
        let mut config = Config::default().with_chunk_size(15);
        let args = EnrichArgs::default();

        apply_cli_overrides(&mut config, &args);

        assert_eq!(config.batch.chunk_size, 15);
        assert!(!config.batch.capture_imagery);
    }

    #[test]
    fn test_read_listings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("listings.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "Texaco Spanish Town", "address": "Main St"},
                {"name": "Rubis Half Way Tree", "listing": {"e10_87": 182.9}}
            ]"#,
        )
        .unwrap();

        let records = read_listings(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Texaco Spanish Town");
        assert_eq!(records[0].address.as_deref(), Some("Main St"));
        assert!(records[1].listing.is_some());
    }

    #[test]
    fn test_read_listings_rejects_malformed_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("listings.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            read_listings(&path),
            Err(Error::InputFormat { .. })
        ));
    }

    #[test]
    fn test_read_listings_rejects_empty_names() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("listings.json");
        std::fs::write(&path, r#"[{"name": "   "}]"#).unwrap();

        assert!(matches!(
            read_listings(&path),
            Err(Error::InputFormat { .. })
        ));
    }
}
