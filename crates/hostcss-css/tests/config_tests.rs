//! Tests for component descriptor loading and compilation.

use std::path::Path;

use hostcss_css::config::{AttributeConversion, FOCUS_RING_SELECTOR, normalize_whitespace};
use hostcss_css::{Component, ConfigError, PackageConfig};
use hostcss_tree::{Attribute, NodeKind, Pseudo};

const SEARCH: &str = r##"{
    "name": "search",
    "host": { "selector": ".spectrum-Search", "shadowSelector": "#textfield" },
    "attributes": [
        ".spectrum-Search--quiet",
        { "type": "boolean", "selector": ".is-disabled", "name": "disabled" },
        { "selector": ".spectrum-Search--emphasized" },
        {
            "type": "enum",
            "name": "size",
            "values": [
                ".spectrum-Search--sizeS",
                { "selector": ".spectrum-Search--large", "name": "l" }
            ]
        }
    ],
    "ids": [
        ".spectrum-Search-clearButton",
        { "selector": ".spectrum-Search-input", "name": "input" }
    ],
    "slots": [{ "selector": ".spectrum-Search-icon", "name": "icon" }],
    "classes": [{ "selector": ".spectrum-Search-textfield", "name": ".textfield" }],
    "pseudos": [{ "selector": ".is-keyboardFocused", "value": ":focus-visible" }],
    "exclude": ["\\.is-focused"],
    "excludeSourceSelector": ["^\\.spectrum-Search--legacy"],
    "complexSelectors": [
        { "selector": ".spectrum-Search  .spectrum-Search-input", "replacement": [".a", ".b"] },
        { "selector": ".spectrum-Search-x", "replacement": ".y" }
    ]
}"##;

fn search() -> Component {
    Component::from_json(SEARCH).expect("search config compiles")
}

fn boolean_name(conversion: &AttributeConversion) -> &str {
    match conversion {
        AttributeConversion::Boolean { name, .. } => name,
        AttributeConversion::Enum { .. } => panic!("expected boolean attribute"),
    }
}

#[test]
fn test_host_forms() {
    let component = search();
    assert_eq!(component.name, "search");
    assert_eq!(component.host, "spectrum-Search");
    assert_eq!(component.host_selector(), ".spectrum-Search");

    let bare = Component::from_json(r#"{ "name": "button", "host": ".spectrum-Button" }"#)
        .expect("string host");
    assert_eq!(bare.host, "spectrum-Button");

    let detailed =
        Component::from_json(r#"{ "name": "button", "host": { "selector": ".spectrum-Button" } }"#)
            .expect("object host");
    assert_eq!(detailed.host, "spectrum-Button");
}

#[test]
fn test_attribute_name_derivation() {
    let component = search();
    assert_eq!(component.attributes.len(), 4);
    assert_eq!(boolean_name(&component.attributes[0]), "quiet");
    assert_eq!(boolean_name(&component.attributes[1]), "disabled");
    assert_eq!(boolean_name(&component.attributes[2]), "emphasized");

    let AttributeConversion::Enum { name, values } = &component.attributes[3] else {
        panic!("expected enum attribute");
    };
    assert_eq!(name, "size");
    let derived: Vec<_> = values.iter().map(|(_, value)| value.as_str()).collect();
    assert_eq!(derived, ["sizeS", "l"]);
    assert_eq!(values[0].0.as_str(), ".spectrum-Search--sizeS");
}

#[test]
fn test_bare_names_outside_the_host_keep_their_text() {
    let component = Component::from_json(
        r#"{
            "name": "button",
            "host": ".spectrum-Button",
            "attributes": [".is-selected"],
            "ids": [{ "selector": ".spectrum-Icon" }]
        }"#,
    )
    .expect("compiles");
    assert_eq!(boolean_name(&component.attributes[0]), "is-selected");
    assert_eq!(component.ids[0].name, "spectrum-Icon");
}

#[test]
fn test_id_and_class_names() {
    let component = search();
    let ids: Vec<_> = component.ids.iter().map(|id| id.name.as_str()).collect();
    assert_eq!(ids, ["clearButton", "input"]);

    // A leading dot on a class target is dropped
    assert_eq!(component.classes[0].name, "textfield");
    assert_eq!(component.slots[0].name.as_deref(), Some("icon"));
}

#[test]
fn test_focus_ring_is_always_appended() {
    let component = search();
    assert_eq!(component.pseudos.len(), 2);
    let last = component.pseudos.last().expect("focus ring entry");
    assert_eq!(last.source.as_str(), FOCUS_RING_SELECTOR);
    assert_eq!(last.value.name, "focus-visible");

    let bare = Component::from_json(r#"{ "name": "x", "host": ".x" }"#).expect("compiles");
    assert_eq!(bare.pseudos.len(), 1);
}

#[test]
fn test_source_selector_matching() {
    let component = search();
    let quiet = match &component.attributes[0] {
        AttributeConversion::Boolean { source, .. } => source,
        AttributeConversion::Enum { .. } => unreachable!(),
    };
    assert!(quiet.matches(&NodeKind::Class("spectrum-Search--quiet".to_string())));
    assert!(!quiet.matches(&NodeKind::Class("spectrum-Search--quieter".to_string())));
    assert!(!quiet.matches(&NodeKind::Id("spectrum-Search--quiet".to_string())));

    let disabled = Component::from_json(
        r#"{
            "name": "x",
            "host": ".x",
            "attributes": [
                { "selector": ":disabled", "name": "disabled" },
                { "selector": "[aria-invalid=\"true\"]", "name": "invalid" }
            ]
        }"#,
    )
    .expect("compiles");
    let AttributeConversion::Boolean { source, .. } = &disabled.attributes[0] else {
        unreachable!()
    };
    assert!(source.matches(&NodeKind::PseudoClass(Pseudo::new("DISABLED"))));

    let AttributeConversion::Boolean { source, .. } = &disabled.attributes[1] else {
        unreachable!()
    };
    assert!(source.matches(&NodeKind::Attribute(Attribute::equals("aria-invalid", "true"))));
    assert!(!source.matches(&NodeKind::Attribute(Attribute::equals("aria-invalid", "false"))));
}

#[test]
fn test_exclusion_patterns() {
    let component = search();
    assert!(component.is_excluded(".spectrum-Search.is-focused .spectrum-Search-input"));
    assert!(component.is_excluded(".spectrum-Search--legacy .x"));
    assert!(!component.is_excluded(".x .spectrum-Search--legacy"));
    assert!(!component.is_excluded(".spectrum-Search"));
}

#[test]
fn test_complex_replacement_ignores_whitespace() {
    let component = search();
    let expected = [".a".to_string(), ".b".to_string()];
    assert_eq!(
        component.complex_replacement(".spectrum-Search .spectrum-Search-input"),
        Some(&expected[..])
    );
    assert_eq!(
        component.complex_replacement("  .spectrum-Search\n\t.spectrum-Search-input "),
        Some(&expected[..])
    );
    assert_eq!(
        component.complex_replacement(".spectrum-Search-x"),
        Some(&[".y".to_string()][..])
    );
    assert!(component.complex_replacement(".spectrum-Search").is_none());
    assert_eq!(normalize_whitespace("  a \n  b "), "a b");
}

#[test]
fn test_source_selector_must_be_simple() {
    let err = Component::from_json(
        r#"{ "name": "x", "host": ".x", "attributes": [".x--a .x--b"] }"#,
    )
    .expect_err("compound source");
    assert!(matches!(err, ConfigError::SourceSelector { ref selector, .. } if selector == ".x--a .x--b"));

    let err = Component::from_json(r#"{ "name": "x", "host": ".x", "ids": [".a, .b"] }"#)
        .expect_err("list source");
    assert!(matches!(err, ConfigError::SourceSelector { .. }));

    let err = Component::from_json(r##"{ "name": "x", "host": "#x" }"##).expect_err("id host");
    assert!(matches!(err, ConfigError::SourceSelector { .. }));
}

#[test]
fn test_pseudo_target_must_be_pseudo_class() {
    let err = Component::from_json(
        r#"{ "name": "x", "host": ".x", "pseudos": [{ "selector": ".is-hover", "value": ".hover" }] }"#,
    )
    .expect_err("class target");
    assert!(matches!(err, ConfigError::TargetSelector { .. }));

    let err = Component::from_json(
        r#"{ "name": "x", "host": ".x", "pseudos": [{ "selector": ".is-hover", "value": ":hover:focus" }] }"#,
    )
    .expect_err("compound target");
    assert!(matches!(err, ConfigError::TargetSelector { .. }));
}

#[test]
fn test_invalid_slot_content() {
    let err = Component::from_json(
        r#"{ "name": "x", "host": ".x", "slots": [{ "selector": ".x-icon", "content": "> >" }] }"#,
    )
    .expect_err("bad content");
    assert!(matches!(err, ConfigError::TargetSelector { .. }));
}

fn slot_content_error(content: &str) -> ConfigError {
    let json = format!(
        r#"{{ "name": "x", "host": ".x", "slots": [{{ "selector": ".x-icon", "content": "{content}" }}] }}"#
    );
    Component::from_json(&json).expect_err("content is not one compound selector")
}

#[test]
fn test_slot_content_must_be_one_compound() {
    for content in ["span, em", "span em", "span > em", "span::before"] {
        let err = slot_content_error(content);
        let ConfigError::TargetSelector { selector, reason, .. } = err else {
            panic!("expected target error for `{content}`");
        };
        assert_eq!(selector, content);
        assert!(reason.contains("compound"), "{reason}");
    }

    let component = Component::from_json(
        r#"{ "name": "x", "host": ".x", "slots": [{ "selector": ".x-icon", "content": "span.a:hover" }] }"#,
    )
    .expect("compound content");
    let content = component.slots[0].content.as_ref().expect("parsed content");
    let compound = content.first_child(content.root()).expect("one selector");
    assert_eq!(content.children(compound).len(), 3);
}

#[test]
fn test_invalid_pattern() {
    let err = Component::from_json(r#"{ "name": "x", "host": ".x", "exclude": ["("] }"#)
        .expect_err("bad regex");
    let ConfigError::Pattern { component, pattern, .. } = err else {
        panic!("expected pattern error");
    };
    assert_eq!(component, "x");
    assert_eq!(pattern, "(");
}

#[test]
fn test_invalid_json() {
    assert!(matches!(
        Component::from_json("{ not json"),
        Err(ConfigError::Json(_))
    ));
    // `host` is required
    assert!(matches!(
        Component::from_json(r#"{ "name": "x" }"#),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_package_config() {
    let package = PackageConfig::from_json(
        r#"{
            "spectrum": "search",
            "components": [
                { "name": "search", "host": ".spectrum-Search" },
                { "name": "search-field", "host": ".spectrum-Search-field" }
            ]
        }"#,
    )
    .expect("parses");
    assert_eq!(package.spectrum.as_deref(), Some("search"));
    assert!(package.package.is_none());

    let components = package.compile().expect("compiles");
    let names: Vec<_> = components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["search", "search-field"]);
}

#[test]
fn test_missing_config_file() {
    let err = PackageConfig::load(Path::new("/nonexistent/hostcss/config.json"))
        .expect_err("missing file");
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/hostcss/config.json"));
}
