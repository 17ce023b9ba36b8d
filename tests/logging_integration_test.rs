// Integration tests for logging setup
// Installs the global subscriber, so everything lives in one test.

use nrf_cache::infrastructure::logging::{LogConfig, LogFormat, LoggerImpl, RotationPolicy};
use nrf_cache::{MasterCache, MatchPolicy, NfProfile, NfType};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_cache_events_reach_log_file() {
    let temp_dir = TempDir::new().unwrap();

    let config = LogConfig {
        level: "debug".to_string(),
        format: LogFormat::Json,
        log_dir: Some(temp_dir.path().to_path_buf()),
        enable_stdout: false,
        rotation: RotationPolicy::Never,
    };

    let logger = LoggerImpl::init(&config).unwrap();

    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let cache = MasterCache::new(Duration::from_secs(30), MatchPolicy::AnyOf);
        cache
            .set(&NfProfile::new("", NfType::Smf), Duration::from_secs(60))
            .await;
        cache
            .set(&NfProfile::new("smf-1", NfType::Smf), Duration::from_secs(60))
            .await;
        cache.shutdown().await;
    });

    // A second global subscriber is refused.
    assert!(LoggerImpl::init(&config).is_err());

    // Dropping the guard flushes the non-blocking writer.
    drop(logger);

    let log_path = temp_dir.path().join("nrf-cache.log");
    let contents = fs::read_to_string(&log_path).unwrap();

    assert!(contents.contains("logger initialized"));
    assert!(contents.contains("dropping profile without nf instance id"));
    assert!(contents.contains("creating category cache"));
    assert!(contents.contains("purged nf cache"));

    for line in contents.lines().filter(|line| !line.trim().is_empty()) {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(parsed.get("level").is_some());
    }
}
