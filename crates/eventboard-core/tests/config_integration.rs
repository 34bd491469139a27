//! Integration tests for reading and writing the TOML configuration.

use eventboard_core::{Config, ConfigError, SortOrder, VisibilityPolicy};

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.visibility = VisibilityPolicy::new(0, 14);
    config.listing.default_sort = SortOrder::Newest;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(
        loaded.get("visibility.hide_cancelled_after_days").as_deref(),
        Some("14")
    );
}

#[test]
fn test_hand_written_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[visibility]
hide_completed_after_days = 3

[listing]
default_sort = "popular"
"#,
    )
    .unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.visibility, VisibilityPolicy::new(3, 7));
    assert_eq!(loaded.listing.default_sort, SortOrder::Popular);
}

#[test]
fn test_load_reports_path_on_parse_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[visibility]\nhide_completed_after_days = \"soon\"\n").unwrap();

    match Config::load_from(&path) {
        Err(ConfigError::LoadFailed { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected LoadFailed, got {other:?}"),
    }
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load_from(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::LoadFailed { .. })));
}
