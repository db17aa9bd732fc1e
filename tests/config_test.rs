//! Settings loading: explicit files, layered overrides, environment.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use ddmetrics::config::Settings;
use ddmetrics::util::testing::init_test_setup;

#[test]
fn given_explicit_config_file_when_load_then_overrides_defaults() {
    init_test_setup();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ddmetrics.toml");
    fs::write(
        &path,
        r#"
data_dir = "lists"
output_dir = "results"
threads = 2

[[collections]]
name = "prague"

[[collections]]
name = "ud26"
main_file = "lists/ud26_main.txt"
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.output_dir, PathBuf::from("results"));
    assert_eq!(settings.threads, 2);
    assert_eq!(settings.collections.len(), 2);

    let requests = settings.requests().unwrap();
    assert_eq!(requests[0].main_file, PathBuf::from("lists/prague_list.txt"));
    assert_eq!(requests[1].main_file, PathBuf::from("lists/ud26_main.txt"));
    assert_eq!(requests[1].output_dir, PathBuf::from("results"));
}

#[test]
fn given_partial_config_file_when_load_then_unspecified_fields_keep_defaults() {
    init_test_setup();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ddmetrics.toml");
    fs::write(&path, "threads = 16\n").unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.threads, 16);
    assert_eq!(settings.output_dir, PathBuf::from("out"));
    assert_eq!(settings.collections.len(), 6);
    assert_eq!(settings.separator, " ");
}

#[test]
fn given_missing_explicit_config_file_when_load_then_error() {
    init_test_setup();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    assert!(Settings::load(Some(&path)).is_err());
}

#[test]
fn given_environment_override_when_load_then_env_wins() {
    init_test_setup();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ddmetrics.toml");
    fs::write(&path, "treebank_column = \"from_file\"\n").unwrap();

    // Only this test touches the variable; other tests do not assert on
    // treebank_column to stay independent of it.
    std::env::set_var("DDMETRICS_TREEBANK_COLUMN", "from_env");
    let settings = Settings::load(Some(&path)).expect("load settings");
    std::env::remove_var("DDMETRICS_TREEBANK_COLUMN");

    assert_eq!(settings.treebank_column, "from_env");
}

#[test]
fn given_tilde_in_config_paths_when_load_then_expanded() {
    init_test_setup();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ddmetrics.toml");
    fs::write(&path, "output_dir = \"~/ddmetrics-out\"\n").unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    let home = std::env::var("HOME").expect("HOME should be set");
    assert!(
        settings.output_dir.starts_with(&home),
        "output_dir should start with home dir: {}",
        settings.output_dir.display()
    );
}
