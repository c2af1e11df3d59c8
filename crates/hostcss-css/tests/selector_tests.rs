//! Tests for selector parsing and serialization.

use hostcss_css::selector::{parse_selector_list, serialize_list, to_css};
use hostcss_tree::{Attribute, AttributeOperator, Combinator, NodeKind, QuoteStyle, SelectorTree};

fn parse(selector: &str) -> SelectorTree {
    parse_selector_list(selector).expect("selector should parse")
}

/// Parse and serialize back.
fn canonical(selector: &str) -> String {
    serialize_list(&parse(selector))
}

/// Kinds of the direct children of the first top-level selector.
fn first_selector_kinds(tree: &SelectorTree) -> Vec<NodeKind> {
    let selector = tree.first_child(tree.root()).expect("one selector");
    tree.children(selector)
        .iter()
        .map(|&id| tree.kind(id).clone())
        .collect()
}

#[test]
fn test_compound_and_combinators() {
    let tree = parse(".a.b > #c + d ~ *");
    let kinds = first_selector_kinds(&tree);
    assert_eq!(
        kinds,
        vec![
            NodeKind::Class("a".to_string()),
            NodeKind::Class("b".to_string()),
            NodeKind::Combinator(Combinator::Child),
            NodeKind::Id("c".to_string()),
            NodeKind::Combinator(Combinator::NextSibling),
            NodeKind::Tag("d".to_string()),
            NodeKind::Combinator(Combinator::SubsequentSibling),
            NodeKind::Universal,
        ]
    );
    assert_eq!(serialize_list(&tree), ".a.b > #c + d ~ *");
}

#[test]
fn test_whitespace_is_normalized() {
    assert_eq!(canonical("  .a    .b  "), ".a .b");
    assert_eq!(canonical(".a>.b"), ".a > .b");
    assert_eq!(canonical(".a,.b ,  .c"), ".a, .b, .c");
    assert_eq!(canonical(".a\n  .b"), ".a .b");
}

#[test]
fn test_descendant_combinator() {
    let tree = parse("div .item");
    let kinds = first_selector_kinds(&tree);
    assert_eq!(kinds[1], NodeKind::Combinator(Combinator::Descendant));
    assert_eq!(kinds.len(), 3);
}

#[test]
fn test_selector_list_has_one_selector_per_comma() {
    let tree = parse(".a .b, .c");
    assert_eq!(tree.children(tree.root()).len(), 2);
    let second = tree.children(tree.root())[1];
    assert_eq!(to_css(&tree, second), ".c");
}

#[test]
fn test_attribute_selectors() {
    let tree = parse(r#"[dir="rtl"]"#);
    let NodeKind::Attribute(attr) = &first_selector_kinds(&tree)[0] else {
        panic!("expected attribute");
    };
    assert_eq!(attr.name, "dir");
    let matcher = attr.matcher.as_ref().expect("matcher");
    assert_eq!(matcher.operator, AttributeOperator::Equals);
    assert_eq!(matcher.value, "rtl");
    assert_eq!(matcher.quote, QuoteStyle::Double);

    let tree = parse("[lang|=en i]");
    let NodeKind::Attribute(attr) = &first_selector_kinds(&tree)[0] else {
        panic!("expected attribute");
    };
    let matcher = attr.matcher.as_ref().expect("matcher");
    assert_eq!(matcher.operator, AttributeOperator::DashMatch);
    assert_eq!(matcher.quote, QuoteStyle::None);
    assert_eq!(matcher.case_flag, Some('i'));

    assert_eq!(canonical("[lang|=en i]"), "[lang|=en i]");
    assert_eq!(canonical("[data-x='a b']"), "[data-x='a b']");
    assert_eq!(canonical("[ hidden ]"), "[hidden]");
    assert_eq!(canonical(r#"a[href^="http"][href$=".pdf"]"#), r#"a[href^="http"][href$=".pdf"]"#);
}

#[test]
fn test_quotes_inside_attribute_values() {
    assert_eq!(canonical(r#"[x="a\"b"]"#), r#"[x="a\"b"]"#);
    assert_eq!(canonical(r#"[x='a"b']"#), r#"[x='a"b']"#);
    assert_eq!(canonical(r"[x='a\'b']"), r"[x='a\'b']");

    // A value switched to double quotes gets its bare quotes escaped
    let mut tree = parse(r#"[x='a"b']"#);
    let selector = tree.first_child(tree.root()).expect("one selector");
    let node = tree.children(selector)[0];
    *tree.kind_mut(node) = NodeKind::Attribute(Attribute::equals("x", r#"a"b"#));
    assert_eq!(serialize_list(&tree), r#"[x="a\"b"]"#);
}

#[test]
fn test_functional_pseudo_with_selector_list() {
    let tree = parse(":not(.a, .b)");
    let not = tree.children(tree.first_child(tree.root()).expect("selector"))[0];
    assert!(tree.kind(not).is_pseudo_class("not"));
    assert_eq!(tree.children(not).len(), 2);
    assert_eq!(serialize_list(&tree), ":not(.a, .b)");
}

#[test]
fn test_non_selector_arguments_stay_raw() {
    let tree = parse(":nth-child(2n + 1)");
    let NodeKind::PseudoClass(pseudo) = &first_selector_kinds(&tree)[0] else {
        panic!("expected pseudo-class");
    };
    assert_eq!(pseudo.raw_argument.as_deref(), Some("2n + 1"));
    assert_eq!(serialize_list(&tree), ":nth-child(2n + 1)");

    let tree = parse(":dir(rtl)");
    let NodeKind::PseudoClass(pseudo) = &first_selector_kinds(&tree)[0] else {
        panic!("expected pseudo-class");
    };
    assert_eq!(pseudo.raw_argument.as_deref(), Some("rtl"));
}

#[test]
fn test_pseudo_elements() {
    let tree = parse(".a::before");
    assert!(matches!(
        &first_selector_kinds(&tree)[1],
        NodeKind::PseudoElement(p) if p.name == "before" && !p.legacy
    ));

    let tree = parse(".a:after");
    assert!(matches!(
        &first_selector_kinds(&tree)[1],
        NodeKind::PseudoElement(p) if p.name == "after" && p.legacy
    ));
    assert_eq!(serialize_list(&tree), ".a:after");

    assert_eq!(
        canonical(r#"::slotted([slot="icon"])"#),
        r#"::slotted([slot="icon"])"#
    );
}

#[test]
fn test_host_anchor_argument() {
    let tree = parse(":host(.quiet) .x");
    let anchor = tree.children(tree.first_child(tree.root()).expect("selector"))[0];
    assert!(tree.kind(anchor).is_host_anchor());
    let argument = tree.first_child(anchor).expect("argument");
    assert_eq!(to_css(&tree, argument), ".quiet");
}

#[test]
fn test_relative_selector_inside_has() {
    assert_eq!(canonical(":has(> img)"), ":has(> img)");
    assert_eq!(canonical(".a:has(+ .b, ~ .c)"), ".a:has(+ .b, ~ .c)");
}

#[test]
fn test_escaped_identifiers() {
    let tree = parse(r".md\:flex");
    assert_eq!(
        first_selector_kinds(&tree)[0],
        NodeKind::Class(r"md\:flex".to_string())
    );
    assert_eq!(serialize_list(&tree), r".md\:flex");
}

#[test]
fn test_invalid_selectors() {
    for bad in ["", "   ", ".a,", ".a,,.b", "> .a", ".a >", ".a > > .b", ".a[", ".a)", "[x=\"open]", ".", "#", "::", ":not(.a"] {
        assert!(
            parse_selector_list(bad).is_err(),
            "`{bad}` should not parse"
        );
    }
}

#[test]
fn test_error_reports_offset() {
    let err = parse_selector_list("> .a").expect_err("leading combinator");
    assert_eq!(err.offset, 0);
    assert_eq!(err.selector, "> .a");

    let err = parse_selector_list(".a:not(.b").expect_err("unbalanced");
    assert_eq!(err.offset, 6);
}

#[test]
fn test_round_trip_is_fixed_point() {
    let selectors = [
        ".spectrum-Search--quiet .spectrum-Search-input",
        ":host(:where([quiet])) .x",
        ".a:not(.b):hover::before",
        "[dir='rtl'] .a > .b + .c ~ .d",
        ".a:is(.b, .c :not(.d)), #e",
        ":nth-last-child( odd )",
        "input[type=checkbox i]:checked + label",
        "::slotted(span[slot=\"badge\"])",
    ];
    for selector in selectors {
        let once = canonical(selector);
        let twice = canonical(&once);
        assert_eq!(once, twice, "round trip of `{selector}`");
    }
}
