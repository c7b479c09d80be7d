use pretty_assertions::assert_eq;
use recipe_fs::{ConfigStore, Error, NormalizedPath};
use rstest::rstest;
use serde::Deserialize;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct Sample {
    name: String,
    step_into: Vec<String>,
}

#[rstest]
#[case("runner.toml", "name = \"example\"\nstep_into = [\"file\"]\n")]
#[case("runner.json", r#"{"name": "example", "step_into": ["file"]}"#)]
#[case("runner.yaml", "name: example\nstep_into:\n  - file\n")]
fn test_load_detects_format_from_extension(#[case] file: &str, #[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(file);
    fs::write(&path, content).unwrap();

    let loaded: Sample = ConfigStore::new().load(&NormalizedPath::new(&path)).unwrap();

    assert_eq!(
        loaded,
        Sample {
            name: "example".into(),
            step_into: vec!["file".into()],
        }
    );
}

#[test]
fn test_load_rejects_unknown_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("runner.ini");
    fs::write(&path, "name=example").unwrap();

    let err = ConfigStore::new()
        .load::<Sample>(&NormalizedPath::new(&path))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { extension } if extension == "ini"));
}

#[test]
fn test_load_reports_parse_errors_with_format() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.toml");
    fs::write(&path, "name = ").unwrap();

    let err = ConfigStore::new()
        .load::<Sample>(&NormalizedPath::new(&path))
        .unwrap_err();
    assert!(err.to_string().contains("TOML"), "got: {err}");
}

#[test]
fn test_locate_prefers_toml() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("default.yaml"), "").unwrap();
    fs::write(temp.path().join("default.toml"), "").unwrap();

    let dir = NormalizedPath::new(temp.path());
    let found = ConfigStore::new().locate(&dir, "default").unwrap();
    assert_eq!(found.extension(), Some("toml"));
    assert!(ConfigStore::new().locate(&dir, "missing").is_none());
}
