//! Configuration File Tests

use crate::common::*;
use tempfile::TempDir;
use xrepo::{ErrorKind, CONFIG_FILE_NAME};

#[test]
fn repository_from_default_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    RepositoryConfig::write_default_if_missing(&path).unwrap();

    let config = RepositoryConfig::from_file(&path).unwrap();
    let repo = MemoryRepository::<Employee>::with_config(&config).unwrap();
    assert_eq!(Repository::namespace(&repo), &Namespace::default());
    assert!(repo.change_events_enabled());
}

#[test]
fn edited_config_is_honored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "namespace = \"payroll:2024\"\nchange_events = false\n").unwrap();

    let repo = MemoryRepository::<Employee>::with_config(&RepositoryConfig::from_file(&path).unwrap())
        .unwrap();
    assert_eq!(Repository::namespace(&repo).as_str(), "payroll:2024");
    assert!(!repo.change_events_enabled());
}

#[test]
fn written_config_round_trips_through_json_and_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    let config = RepositoryConfig {
        namespace: "staff".to_string(),
        change_events: false,
    };
    config.write_to_file(&path).unwrap();
    assert_eq!(RepositoryConfig::from_file(&path).unwrap(), config);

    let json = serde_json::to_string(&config).unwrap();
    let back: RepositoryConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn bad_namespace_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "namespace = \".hidden\"\n").unwrap();

    let err = RepositoryConfig::from_file(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidNamespace);
}

#[test]
fn unreadable_config_is_config_error() {
    let dir = TempDir::new().unwrap();
    let err = RepositoryConfig::from_file(&dir.path().join("missing.toml")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}
