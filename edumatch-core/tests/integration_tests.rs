//! Integration tests for edumatch-core infrastructure

use edumatch_core::{
    config_error, init_logging, storage_error, validation_error, EdumatchConfig, EdumatchError,
    LogFormat, LoggingConfig,
};
use tempfile::TempDir;

#[test]
fn test_error_handling() {
    let error = storage_error!("Session slot unreadable", "test_component");

    match &error {
        EdumatchError::Storage {
            message, context, ..
        } => {
            assert_eq!(message, "Session slot unreadable");
            assert_eq!(context.component, "test_component");
            assert!(!context.error_id.is_empty());
        }
        _ => panic!("Expected Storage error"),
    }

    // Logging without a subscriber must not panic
    error.log();

    let config_error = config_error!("Invalid config", "test", "Run 'edumatch config --init'");
    assert!(matches!(config_error, EdumatchError::Config { .. }));
    assert_eq!(
        config_error.context().map(|c| c.recovery_suggestions.len()),
        Some(1)
    );

    let validation = validation_error!("Title is required", "title", "test");
    assert_eq!(validation.field(), Some("title"));
    validation.log();
}

#[test]
fn test_logging_initialization() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        format: LogFormat::Compact,
        include_location: false,
        include_thread: false,
        log_to_file: false,
        log_file_path: None,
        filter_directives: vec!["edumatch_core=debug".to_string()],
    };

    // Only one subscriber per process; the second call reports an error instead of panicking
    let _ = init_logging(&config);
    assert!(init_logging(&config).is_err());
}

#[test]
fn test_config_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("edumatch.toml");

    let mut config = EdumatchConfig::default();
    config.security.max_input_length = 280;
    config.session.ttl_hours = 12;
    config.session.storage_dir = temp_dir.path().join("session");
    config.logging.format = LogFormat::Json;

    config.save_to_file(&path).unwrap();
    let loaded = EdumatchConfig::from_file(&path).unwrap();

    assert_eq!(loaded.security.max_input_length, 280);
    assert_eq!(loaded.session.ttl_hours, 12);
    assert_eq!(loaded.session.storage_dir, temp_dir.path().join("session"));
    assert_eq!(loaded.logging.format, LogFormat::Json);
}

#[test]
fn test_config_load_rejects_invalid_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("edumatch.toml");
    std::fs::write(&path, "[security]\nmax_input_length = 0\n").unwrap();

    let result = EdumatchConfig::from_file(&path);
    assert!(matches!(result, Err(EdumatchError::Config { .. })));
}

#[test]
fn test_config_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = EdumatchConfig::load(Some(&temp_dir.path().join("missing.toml")));

    match result {
        Err(EdumatchError::Config { context, .. }) => {
            assert_eq!(context.operation.as_deref(), Some("read_file"));
        }
        other => panic!("Expected Config error, got {:?}", other),
    }
}
