use std::fs;
use std::io::Write;
use std::path::Path;

use gherkin_fmt_config::{Config, ConfigError, ConfigSource, LoadOptions};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

#[test]
fn loads_defaults_when_no_files_present() {
    let temp = TempDir::new().expect("tempdir");

    let config = Config::load(LoadOptions::default().with_working_dir(temp.path().to_path_buf()))
        .expect("load defaults");

    assert_eq!(config.indent.background_and_scenario, 2);
    assert_eq!(config.indent.step, 4);
    assert_eq!(config.indent.table_and_doc_string, 6);
    assert!(config.commands.is_empty());
    assert_eq!(config.extensions, vec!["feature".to_string()]);
    assert_eq!(config.source, ConfigSource::Default);
}

#[test]
fn loads_file_from_working_dir() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join(".gherkin-fmt.toml");
    write_file(
        &path,
        r#"
        extensions = ["feature", "story"]

        [indent]
        step = 2

        [commands]
        jq = "jq ."
        "#,
    );

    let config = Config::load(LoadOptions::default().with_working_dir(temp.path().to_path_buf()))
        .expect("load config");

    assert_eq!(config.indent.step, 2);
    assert_eq!(config.indent.background_and_scenario, 2);
    assert_eq!(config.commands.get("jq").map(String::as_str), Some("jq ."));
    assert_eq!(
        config.extensions,
        vec!["feature".to_string(), "story".to_string()]
    );
    assert_eq!(config.source, ConfigSource::File(path));
}

#[test]
fn falls_back_to_git_root() {
    let temp = TempDir::new().expect("tempdir");
    let git_root = temp.path();
    fs::create_dir(git_root.join(".git")).expect("create .git");

    let nested = git_root.join("features").join("api");
    fs::create_dir_all(&nested).expect("create nested dirs");

    write_file(
        git_root.join(".gherkin-fmt.toml"),
        r#"
        [indent]
        background_and_scenario = 4
        "#,
    );

    let config = Config::load(LoadOptions::default().with_working_dir(nested)).expect("load");

    assert_eq!(config.indent.background_and_scenario, 4);
    assert_eq!(
        config.source,
        ConfigSource::File(git_root.join(".gherkin-fmt.toml"))
    );
}

#[test]
fn explicit_path_wins_over_working_dir() {
    let temp = TempDir::new().expect("tempdir");
    write_file(
        temp.path().join(".gherkin-fmt.toml"),
        "[indent]\nstep = 8\n",
    );

    let explicit = temp.path().join("other.toml");
    write_file(&explicit, "[indent]\nstep = 3\n");

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(temp.path().to_path_buf())
            .with_config_path(explicit.clone()),
    )
    .expect("load explicit");

    assert_eq!(config.indent.step, 3);
    assert_eq!(config.source, ConfigSource::File(explicit));
}

#[test]
fn explicit_missing_path_errors() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("nope.toml");

    let err = Config::load(
        LoadOptions::default()
            .with_working_dir(temp.path().to_path_buf())
            .with_config_path(missing),
    )
    .unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn rejects_unknown_fields() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join(".gherkin-fmt.toml");
    write_file(&path, "unknown = true\n");

    let err = Config::load(LoadOptions::default().with_working_dir(temp.path().to_path_buf()))
        .unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn rejects_empty_command() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join(".gherkin-fmt.toml");
    write_file(&path, "[commands]\njq = \"  \"\n");

    let err = Config::load(LoadOptions::default().with_working_dir(temp.path().to_path_buf()))
        .unwrap_err();

    assert!(matches!(err, ConfigError::Invalid(_)));
}
