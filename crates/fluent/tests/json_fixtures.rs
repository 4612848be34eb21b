//! Golden tests: each `fixtures/*.ftl` file must parse to the JSON tree in
//! the `.json` file next to it.

use std::fs;
use std::path::{Path, PathBuf};

use fluent::json::{to_json, to_json_string_pretty};
use fluent::parser::{ParseMode, parse};
use serde_json::Value;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn assert_fixture(name: &str) {
    let dir = fixtures_dir();
    let source = fs::read_to_string(dir.join(format!("{name}.ftl"))).unwrap();
    let expected: Value =
        serde_json::from_str(&fs::read_to_string(dir.join(format!("{name}.json"))).unwrap())
            .unwrap();

    let resource = parse(&source, ParseMode::Lenient).unwrap();
    let actual = to_json(&resource);
    assert_eq!(
        actual,
        expected,
        "fixture '{name}' mismatch, got:\n{}",
        serde_json::to_string_pretty(&actual).unwrap()
    );
}

#[test]
fn test_messages_fixture() {
    assert_fixture("messages");
}

#[test]
fn test_select_fixture() {
    assert_fixture("select");
}

#[test]
fn test_junk_fixture() {
    assert_fixture("junk");
}

#[test]
fn test_multiline_fixture() {
    assert_fixture("multiline");
}

#[test]
fn test_literals_fixture() {
    assert_fixture("literals");
}

#[test]
fn test_every_fixture_has_a_golden_file() {
    let mut count = 0;
    for entry in fs::read_dir(fixtures_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "ftl") {
            assert!(
                path.with_extension("json").exists(),
                "missing golden file for {}",
                path.display()
            );
            count += 1;
        }
    }
    assert_eq!(count, 5);
}

#[test]
fn test_pretty_output_round_trips() {
    let resource = parse("hello = Hi\n", ParseMode::Lenient).unwrap();
    let text = to_json_string_pretty(&resource).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["body"][0]["id"]["name"], "hello");
    assert_eq!(value["body"][0]["value"]["elements"][0]["value"], "Hi");
}
