use catalog_rotate::ConfigStore;
use tempfile::TempDir;

const CONFIG: &str = r#"
[main]
catalog_server_url = "http://localhost:9047"
catalog_admin_user = "admin1"
catalog_admin_user_password = "changeme123"
password_length = 12
audit_log_path = "/var/log/catalog-rotate-audit.jsonl"

[analytics_pg]
current_password = "changeme1"

[reporting_pg]
current_password = "changeme2"
"#;

#[test]
fn test_round_trip_through_disk_preserves_every_section() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog-rotate.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let mut store = ConfigStore::from_file(&path).unwrap();
    store.set_password("analytics_pg", "Ab3!xZ9q#2");
    store.save(&path).unwrap();

    let reloaded = ConfigStore::from_file(&path).unwrap();
    assert_eq!(reloaded.main.catalog_server_url, "http://localhost:9047");
    assert_eq!(reloaded.main.catalog_admin_user_password, "changeme123");
    assert_eq!(reloaded.password_length(), 12);
    assert_eq!(
        reloaded.audit_log_path(),
        Some("/var/log/catalog-rotate-audit.jsonl")
    );
    assert_eq!(reloaded.current_password("analytics_pg"), Some("Ab3!xZ9q#2"));
    assert_eq!(reloaded.current_password("reporting_pg"), Some("changeme2"));
    assert_eq!(reloaded.sources.len(), 2);
}

#[cfg(unix)]
#[test]
fn test_saved_file_is_owner_readable_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog-rotate.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let store = ConfigStore::from_file(&path).unwrap();
    store.save(&path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_unknown_source_has_no_record() {
    let store = ConfigStore::from_toml_str(CONFIG).unwrap();
    assert_eq!(store.current_password("nonexistent"), None);
}

#[test]
fn test_set_password_on_unknown_source_is_a_no_op() {
    let mut store = ConfigStore::from_toml_str(CONFIG).unwrap();
    store.set_password("nonexistent", "whatever");

    assert_eq!(store.current_password("nonexistent"), None);
    assert_eq!(store.sources.len(), 2);
}

#[test]
fn test_missing_main_section_is_rejected() {
    let content = r#"
[analytics_pg]
current_password = "changeme1"
"#;
    assert!(ConfigStore::from_toml_str(content).is_err());
}
