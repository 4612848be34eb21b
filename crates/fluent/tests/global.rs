//! Tests for the process-wide loader.
//!
//! The global state is shared by every test in this binary, so the whole
//! lifecycle runs in a single test.

#![cfg(feature = "global-loader")]

use fluent::global::{
    add_static_resource, format_static_message, init, is_initialized, with_loader,
};
use fluent::{FluentLoader, args};

#[test]
fn test_global_loader_lifecycle() {
    assert!(!is_initialized());
    assert_eq!(with_loader(|loader| loader.locales().len()), None);
    assert_eq!(format_static_message(&["en"], "hello", &args! {}), None);

    let loader = FluentLoader::builder()
        .fallback(vec!["en".to_string()])
        .build();
    assert!(init(loader).is_ok());
    assert!(is_initialized());

    let warnings = add_static_resource("en", "hello = Hello, { $name }!\n").unwrap();
    assert!(warnings.is_empty());
    add_static_resource("de", "hello = Hallo, { $name }!\n").unwrap();

    assert_eq!(
        format_static_message(&["de"], "hello", &args! { "name" => "Ana" }).as_deref(),
        Some("Hallo, Ana!")
    );
    assert_eq!(
        format_static_message(&[], "hello", &args! { "name" => "Ana" }).as_deref(),
        Some("Hello, Ana!")
    );

    // Missing arguments and unknown messages both come back empty.
    assert_eq!(format_static_message(&["en"], "hello", &args! {}), None);
    assert_eq!(format_static_message(&["en"], "nope", &args! {}), None);

    assert_eq!(
        with_loader(|loader| loader.locales().join(",")).as_deref(),
        Some("de,en")
    );

    let second = FluentLoader::new();
    assert!(init(second).is_err());
}
