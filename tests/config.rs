use std::fs;

use assert_matches::assert_matches;

use census_tract_etl::config::{Config, ConfigLoader, Settings};
use census_tract_etl::error::EtlError;

#[test]
fn partial_config_keeps_other_defaults() {
    let config: Config =
        serde_json::from_str(r#"{"output_dir": "/tmp/census", "write_intermediate": false}"#)
            .unwrap();
    let settings = ConfigLoader::resolve_config(config);
    assert_eq!(settings.output_dir, "/tmp/census");
    assert!(!settings.write_intermediate);
    assert_eq!(settings.merged_file, Settings::default().merged_file);
    assert_eq!(settings.database_file, "climate_database.db");
}

#[test]
fn resolves_explicit_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("settings.json");
    fs::write(&path, r#"{"merged_file": "tracts.csv", "database_file": "tracts.db"}"#).unwrap();

    let settings = ConfigLoader::resolve(path.to_str()).unwrap();
    assert_eq!(settings.merged_file, "tracts.csv");
    assert_eq!(settings.database_file, "tracts.db");
    assert_eq!(settings.output_dir, "output_data");
}

#[test]
fn missing_explicit_file_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("absent.json");
    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, EtlError::ConfigRead(_));
}

#[test]
fn invalid_json_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("broken.json");
    fs::write(&path, "{ output_dir: ").unwrap();
    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, EtlError::ConfigParse(_));
}
