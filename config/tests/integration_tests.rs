use std::fs;
use std::path::PathBuf;

use dump_params_config::{ConfigError, Settings};
use dump_params_core::{Dialect, RedumperDriveType};

fn sample_settings() -> Settings {
    let mut settings = Settings {
        default_dialect: Some(Dialect::Redumper),
        redumper_path: Some(PathBuf::from("/opt/redumper/redumper")),
        ..Settings::default()
    };
    settings.options.redumper.retries = 100;
    settings.options.redumper.drive_type = RedumperDriveType::Plextor;
    settings.options.dic.paranoid_mode = true;
    settings
}

#[test]
fn test_yaml_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.yaml");

    let settings = sample_settings();
    settings.save(&path).unwrap();
    assert_eq!(Settings::load(&path).unwrap(), settings);
}

#[test]
fn test_json_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let settings = sample_settings();
    settings.save(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"drive_type\": \"PLEXTOR\""));
    assert_eq!(Settings::load(&path).unwrap(), settings);
}

#[test]
fn test_partial_yaml_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.yml");
    fs::write(&path, "options:\n  dd:\n    block_size: 2048\n").unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.options.dd.block_size, 2048);
    assert!(settings.options.dd.progress);
    assert_eq!(settings.options.dic.reread_count, 20);
    assert_eq!(settings.default_dialect, None);
}

#[test]
fn test_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.yaml");
    assert!(matches!(Settings::load(&missing), Err(ConfigError::IoError(_))));

    let unsupported = dir.path().join("settings.toml");
    assert!(matches!(
        Settings::default().save(&unsupported),
        Err(ConfigError::UnsupportedFormat(_))
    ));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(Settings::load(&broken), Err(ConfigError::JsonError(_))));

    let wrong_type = dir.path().join("wrong.yaml");
    fs::write(&wrong_type, "options:\n  dic:\n    reread_count: lots\n").unwrap();
    assert!(matches!(Settings::load(&wrong_type), Err(ConfigError::YamlError(_))));
}

#[test]
fn test_load_or_default() {
    assert_eq!(Settings::load_or_default(None).unwrap(), Settings::default());
}
