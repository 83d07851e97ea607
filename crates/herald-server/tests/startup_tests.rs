//! Startup wiring tests.

mod common;

use std::io::Write;
use std::sync::Arc;

use common::{signed_in, test_config, StaticDirectory, StaticTokenProvider, AUTHORS_GROUP};
use herald_server::startup::{load_config, start, StartupError};
use herald_server::ConfigLoadError;
use herald_storage::TableEntity;
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_started_service_serves_members_from_configured_store() {
    let service = start(
        test_config(),
        Arc::new(StaticTokenProvider::default()),
        Arc::new(StaticDirectory::default()),
    )
    .unwrap();

    let table = service.config.storage.table_name.clone();
    let partition = service.config.storage.partition_key.clone();
    for (id, name) in [("t2", "Sales"), ("t1", "Engineering")] {
        service
            .store
            .upsert(&table, TableEntity::new(partition.as_str(), id).with_property("Name", name))
            .unwrap();
    }

    let names = service
        .handler
        .team_names(&signed_in("member-alice"), &["t2".to_string(), "t1".to_string()])
        .await
        .unwrap();

    assert_eq!(names, vec!["Engineering".to_string(), "Sales".to_string()]);
}

#[test]
fn test_start_rejects_unavailable_backend() {
    let mut config = test_config();
    config.storage.backend = "table".to_string();

    let result = start(
        config,
        Arc::new(StaticTokenProvider::default()),
        Arc::new(StaticDirectory::default()),
    );

    assert!(matches!(
        result,
        Err(StartupError::Config(ConfigLoadError::Invalid { .. }))
    ));
}

#[test]
fn test_start_requires_group_id() {
    let mut config = test_config();
    config.authorization.group_id = None;

    let result = start(
        config,
        Arc::new(StaticTokenProvider::default()),
        Arc::new(StaticDirectory::default()),
    );

    assert!(matches!(
        result,
        Err(StartupError::Config(ConfigLoadError::Invalid { .. }))
    ));
}

#[test]
fn test_load_config_reads_given_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "authorization:\n  group_id: \"{AUTHORS_GROUP}\"\nlogging:\n  level: warn\n  json: true"
    )
    .unwrap();

    let config = load_config(Some(file.path())).unwrap();

    assert_eq!(config.authorization.group_id.as_deref(), Some(AUTHORS_GROUP));
    assert_eq!(config.logging.level, "warn");
    assert!(config.logging.json);
}
