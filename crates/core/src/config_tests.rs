// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

#[test]
fn defaults_apply_to_empty_document() {
    let config = TailerConfig::from_toml_str("").unwrap();
    assert_eq!(config, TailerConfig::default());
    assert_eq!(config.marker_publish_timeout, Duration::from_secs(30));
}

#[test]
fn parses_humantime_timeout() {
    let config = TailerConfig::from_toml_str(
        r#"
        worker_id = "worker-a"
        marker_publish_timeout = "1m 30s"
        "#,
    )
    .unwrap();

    assert_eq!(config.worker_id, "worker-a");
    assert_eq!(config.marker_publish_timeout, Duration::from_secs(90));
}

#[test]
fn rejects_unknown_fields() {
    let err = TailerConfig::from_toml_str("topic = \"metadata\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "got: {err}");
}

#[test]
fn rejects_blank_worker_id() {
    let err = TailerConfig::from_toml_str("worker_id = \"  \"").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "got: {err}");
}

#[test]
fn rejects_zero_timeout() {
    let err = TailerConfig::from_toml_str("marker_publish_timeout = \"0s\"").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "got: {err}");
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "worker_id = \"from-file\"").unwrap();

    let config = TailerConfig::load(file.path()).unwrap();
    assert_eq!(config.worker_id, "from-file");
}

#[test]
fn load_missing_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = TailerConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("missing.toml"), "got: {err}");
}

#[test]
fn builder_overrides_timeout() {
    let config = TailerConfig::new("w1").with_marker_publish_timeout(Duration::from_millis(50));
    assert_eq!(config.worker_id, "w1");
    assert_eq!(config.marker_publish_timeout, Duration::from_millis(50));
}
