//! Integration tests for the locale loader and fallback chains.

use std::fs;
#[cfg(unix)]
use std::os::unix::fs::symlink;

use fluent::{FluentLoader, LoadError, LoadWarning, ResolverError, args, compute_suggestions};
use tempfile::TempDir;

fn loader() -> FluentLoader {
    let mut loader = FluentLoader::builder()
        .fallback(vec!["en".to_string()])
        .build();
    loader
        .add_resource_str(
            "en",
            "hello = Hello\nbye = Goodbye\n-brand = Fluent\nabout = About { -brand }\n",
        )
        .unwrap();
    loader
        .add_resource_str("fr", "hello = Bonjour\n-brand = Fluide\n")
        .unwrap();
    loader
}

// =========================================================================
// Fallback Chains
// =========================================================================

#[test]
fn test_first_locale_with_message_wins() {
    let loader = loader();
    let hello = loader.format_message(&["fr", "en"], "hello", &args! {}).unwrap();
    assert_eq!(hello.as_deref(), Some("Bonjour"));

    let bye = loader.format_message(&["fr", "en"], "bye", &args! {}).unwrap();
    assert_eq!(bye.as_deref(), Some("Goodbye"));
}

#[test]
fn test_references_resolve_along_chain() {
    let loader = loader();
    let about = loader.format_message(&["fr", "en"], "about", &args! {}).unwrap();
    assert_eq!(about.as_deref(), Some("About Fluide"));
}

#[test]
fn test_empty_chain_uses_fallback() {
    let loader = loader();
    let hello = loader.format_message(&[], "hello", &args! {}).unwrap();
    assert_eq!(hello.as_deref(), Some("Hello"));
    assert_eq!(loader.fallback(), &["en".to_string()]);
}

#[test]
fn test_unknown_locales_are_skipped() {
    let loader = loader();
    let hello = loader
        .format_message(&["de", "not a locale!", "fr"], "hello", &args! {})
        .unwrap();
    assert_eq!(hello.as_deref(), Some("Bonjour"));
}

#[test]
fn test_missing_message_is_none() {
    let loader = loader();
    assert_eq!(loader.format_message(&["fr", "en"], "nope", &args! {}).unwrap(), None);
    assert!(!loader.has_message(&["fr", "en"], "nope"));
    assert!(loader.has_message(&["fr"], "hello"));
    assert!(!loader.has_message(&["fr"], "bye"));
}

#[test]
fn test_message_ids_across_chain() {
    let loader = loader();
    assert_eq!(loader.message_ids(&["fr", "en"]), vec!["about", "bye", "hello"]);
    assert_eq!(loader.message_ids(&["fr"]), vec!["hello"]);
}

#[test]
fn test_plural_rules_follow_supplying_locale() {
    let mut loader = FluentLoader::new();
    let source = "items = { $n ->\n    [one] one\n    [few] few\n   *[other] other\n}\n";
    loader.add_resource_str("pl", source).unwrap();
    loader.add_resource_str("en", "unrelated = x\n").unwrap();

    let text = loader
        .format_message(&["en", "pl"], "items", &args! { "n" => 3 })
        .unwrap();
    assert_eq!(text.as_deref(), Some("few"));
}

#[test]
fn test_format_message_with_errors() {
    let mut loader = FluentLoader::new();
    loader.add_resource_str("en", "msg = Hi { missing }\n").unwrap();
    let formatted = loader
        .format_message_with_errors(&["en"], "msg", &args! {})
        .unwrap()
        .unwrap();
    assert_eq!(formatted.value, "Hi {missing}");
    assert_eq!(
        formatted.errors,
        vec![ResolverError::UnknownMessage {
            id: "missing".to_string()
        }]
    );
}

#[test]
fn test_max_depth_is_configurable() {
    let mut loader = FluentLoader::builder().max_depth(1).build();
    loader
        .add_resource_str("en", "a = { b }\nb = { c }\nc = C\n")
        .unwrap();
    let text = loader.format_message(&["en"], "a", &args! {}).unwrap();
    assert_eq!(text.as_deref(), Some("{b}"));
}

// =========================================================================
// Loading
// =========================================================================

#[test]
fn test_locale_tags_are_canonicalized() {
    let mut loader = FluentLoader::new();
    loader.add_resource_str("en_us", "hello = Howdy\n").unwrap();
    assert_eq!(loader.locales(), vec!["en-US"]);
    assert!(loader.bundle("en-US").is_some());
    assert!(loader.bundle("EN-us").is_some());

    let hello = loader.format_message(&["en_US"], "hello", &args! {}).unwrap();
    assert_eq!(hello.as_deref(), Some("Howdy"));
}

#[test]
fn test_invalid_locale_is_rejected() {
    let mut loader = FluentLoader::new();
    let result = loader.add_resource_str("not a locale!", "hello = Hi\n");
    assert!(matches!(result, Err(LoadError::InvalidLocale { tag }) if tag == "not a locale!"));
}

#[test]
fn test_same_locale_merges() {
    let mut loader = FluentLoader::new();
    loader.add_resource_str("en", "a = A\nb = B\n").unwrap();
    let warnings = loader.add_resource_str("en", "b = Bee\nc = C\n").unwrap();
    assert_eq!(
        warnings,
        vec![LoadWarning::DuplicateMessage {
            id: "b".to_string(),
            locale: "en".to_string(),
        }]
    );
    assert_eq!(loader.message_ids(&["en"]), vec!["a", "b", "c"]);
    let b = loader.format_message(&["en"], "b", &args! {}).unwrap();
    assert_eq!(b.as_deref(), Some("Bee"));
}

#[test]
fn test_lenient_loader_reports_junk() {
    let mut loader = FluentLoader::new();
    let warnings = loader
        .add_resource_str("en", "ok = Fine\nbroken = { $\n")
        .unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(warnings[0], LoadWarning::Junk { line: 2, .. }));
    assert!(loader.has_message(&["en"], "ok"));
}

#[test]
fn test_strict_loader_fails_on_junk() {
    let mut loader = FluentLoader::builder().strict(true).build();
    let result = loader.add_resource_str("en", "ok = Fine\nbroken = { $\n");
    match result {
        Err(LoadError::Parse { path, line, .. }) => {
            assert_eq!(path.to_str(), Some("<string>"));
            assert_eq!(line, 2);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
    assert!(loader.locales().is_empty());
}

#[test]
fn test_add_resource_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("main.ftl");
    fs::write(&path, "hello = From file\n").unwrap();

    let mut loader = FluentLoader::new();
    loader.add_resource_file("en", &path).unwrap();
    let hello = loader.format_message(&["en"], "hello", &args! {}).unwrap();
    assert_eq!(hello.as_deref(), Some("From file"));
}

#[test]
fn test_add_resource_file_missing() {
    let mut loader = FluentLoader::new();
    let result = loader.add_resource_file("en", "/nonexistent/path/main.ftl");
    assert!(matches!(result, Err(LoadError::Io { .. })));
}

#[test]
fn test_add_resource_file_invalid_utf8() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.ftl");
    fs::write(&path, b"hello = \xff\n").unwrap();

    let mut loader = FluentLoader::new();
    let result = loader.add_resource_file("en", &path);
    assert!(matches!(result, Err(LoadError::Parse { line: 1, .. })));
}

#[test]
fn test_add_directory_uses_parent_as_locale() {
    let dir = TempDir::new().unwrap();
    let en = dir.path().join("en-US");
    let fr = dir.path().join("nested").join("fr");
    fs::create_dir_all(&en).unwrap();
    fs::create_dir_all(&fr).unwrap();
    fs::write(en.join("a.ftl"), "hello = Hello\n").unwrap();
    fs::write(en.join("b.ftl"), "bye = Bye\n").unwrap();
    fs::write(en.join("notes.txt"), "not fluent").unwrap();
    fs::write(fr.join("main.ftl"), "hello = Salut\n").unwrap();

    let mut loader = FluentLoader::new();
    let warnings = loader.add_directory(dir.path()).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(loader.locales(), vec!["en-US", "fr"]);
    assert_eq!(loader.message_ids(&["en-US"]), vec!["bye", "hello"]);

    let hello = loader.format_message(&["fr"], "hello", &args! {}).unwrap();
    assert_eq!(hello.as_deref(), Some("Salut"));
}

#[test]
fn test_add_resource_file_skips_bom() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("main.ftl");
    fs::write(&path, "\u{feff}hello = With BOM\n").unwrap();

    let mut loader = FluentLoader::builder().strict(true).build();
    loader.add_resource_file("en", &path).unwrap();
    assert_eq!(loader.message_ids(&["en"]), vec!["hello"]);
}

#[test]
fn test_add_directory_missing() {
    let mut loader = FluentLoader::new();
    let result = loader.add_directory("/nonexistent/locales");
    assert!(matches!(result, Err(LoadError::Io { .. })));
}

#[cfg(unix)]
#[test]
fn test_add_directory_ignores_symlink_loops() {
    let dir = TempDir::new().unwrap();
    let en = dir.path().join("en");
    fs::create_dir_all(&en).unwrap();
    fs::write(en.join("main.ftl"), "hello = Hello\n").unwrap();
    symlink(dir.path(), en.join("loop")).unwrap();

    let mut loader = FluentLoader::new();
    let warnings = loader.add_directory(dir.path()).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(loader.locales(), vec!["en"]);
    assert_eq!(loader.message_ids(&["en"]), vec!["hello"]);
}

// =========================================================================
// Suggestions
// =========================================================================

#[test]
fn test_suggestions_for_typo() {
    let loader = loader();
    let available = loader.message_ids(&["en"]);
    assert_eq!(compute_suggestions("helo", &available), vec!["hello"]);
    assert_eq!(compute_suggestions("byee", &available), vec!["bye"]);
}

#[test]
fn test_suggestions_for_short_keys_are_strict() {
    let available = vec!["cat".to_string(), "car".to_string(), "dog".to_string()];
    assert_eq!(compute_suggestions("cot", &available), vec!["cat"]);
    assert!(compute_suggestions("cow", &available).is_empty());
    assert!(compute_suggestions("cat", &available).iter().all(|s| s != "cat"));
}

#[test]
fn test_suggestions_are_limited_and_sorted() {
    let available: Vec<String> = ["abcd", "abce", "abcf", "abcg", "xbcd"]
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        compute_suggestions("abcx", &available),
        vec!["abcd", "abce", "abcf"]
    );
}
