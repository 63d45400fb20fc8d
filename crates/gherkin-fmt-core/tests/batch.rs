use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use gherkin_fmt_config::IndentConfig;
use gherkin_fmt_core::FeatureFormatter;
use tempfile::tempdir;

fn formatter(commands: &[(&str, &str)]) -> FeatureFormatter {
    let registry: BTreeMap<String, String> = commands
        .iter()
        .map(|(tag, command)| (tag.to_string(), command.to_string()))
        .collect();
    FeatureFormatter::new(IndentConfig::default(), registry)
}

fn extensions() -> Vec<String> {
    vec!["feature".to_string()]
}

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write fixture");
}

#[test]
fn replaces_a_single_file_in_place() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("api.feature");
    write(&file, "   Feature:  Set api\n  Scenario:  create\nGiven a thing\n");

    let errors = formatter(&[]).transform_and_replace(&file, &extensions());

    assert!(errors.is_empty());
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "Feature: Set api\n  Scenario: create\n    Given a thing"
    );
}

#[test]
fn one_failing_file_does_not_abort_its_siblings() {
    let dir = tempdir().unwrap();
    for name in ["a", "c", "d"] {
        write(
            &dir.path().join(format!("{name}.feature")),
            "  Feature:  ok\n",
        );
    }
    write(
        &dir.path().join("b.feature"),
        "# @fail\nGiven a thing\n",
    );

    let errors = formatter(&[("fail", "echo broken >&2; exit 1")])
        .transform_and_replace(dir.path(), &extensions());

    assert_eq!(errors.len(), 1);
    assert!(errors[0].path.ends_with("b.feature"));
    assert!(errors[0].to_string().contains("b.feature"));
    assert!(errors[0].to_string().contains("broken"));

    for name in ["a", "c", "d"] {
        let rewritten = fs::read_to_string(dir.path().join(format!("{name}.feature"))).unwrap();
        assert_eq!(rewritten, "Feature: ok");
    }
}

#[test]
fn missing_path_yields_a_single_labeled_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.feature");

    let errors = formatter(&[]).transform_and_replace(&missing, &extensions());

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, missing);
}

#[test]
fn directory_run_handles_many_files() {
    let dir = tempdir().unwrap();
    for index in 0..40 {
        write(
            &dir.path().join(format!("f{index:02}.feature")),
            "   Feature:   many\n",
        );
    }

    let errors = formatter(&[]).transform_and_replace(dir.path(), &extensions());

    assert!(errors.is_empty());
    for index in 0..40 {
        let rewritten =
            fs::read_to_string(dir.path().join(format!("f{index:02}.feature"))).unwrap();
        assert_eq!(rewritten, "Feature: many");
    }
}

#[test]
fn non_matching_extensions_are_untouched() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("readme.txt"), "   not touched\n");
    write(&dir.path().join("a.feature"), "Feature: x\n");

    let errors = formatter(&[]).transform_and_replace(dir.path(), &extensions());

    assert!(errors.is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("readme.txt")).unwrap(),
        "   not touched\n"
    );
}
