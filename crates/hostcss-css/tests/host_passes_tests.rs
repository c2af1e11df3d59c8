//! Tests for the passes that place and shape the `:host` anchor.

use hostcss_css::selector::{parse_selector_list, serialize_list};
use hostcss_css::transform::{
    HostClass, HostPresence, classify_host, dehostify, hoist_dir, hostify, scan_host,
    whereify_host,
};
use hostcss_tree::{NodeId, SelectorTree};

const HOST: &str = "spectrum-Search";

type Pass = fn(&mut SelectorTree, NodeId);

fn parse(selector: &str) -> SelectorTree {
    parse_selector_list(selector).expect("selector should parse")
}

fn top_level(tree: &SelectorTree) -> Vec<NodeId> {
    tree.children(tree.root()).to_vec()
}

/// Run `passes` over every top-level selector and serialize.
fn run(selector: &str, passes: &[Pass]) -> String {
    let mut tree = parse(selector);
    for node in top_level(&tree) {
        for pass in passes {
            pass(&mut tree, node);
        }
    }
    serialize_list(&tree)
}

fn host(tree: &mut SelectorTree, selector: NodeId) {
    hostify(tree, selector, HOST);
}

fn classify(selector: &str) -> HostClass {
    let tree = parse(selector);
    let first = top_level(&tree)[0];
    classify_host(&tree, first, HOST)
}

// Hostify

#[test]
fn test_presence_is_ordered() {
    assert!(HostPresence::No < HostPresence::Modifier);
    assert!(HostPresence::Modifier < HostPresence::Yes);
}

#[test]
fn test_classification() {
    assert_eq!(classify(".spectrum-Search-input"), HostClass::Absent);
    assert_eq!(classify(".spectrum-Searchfield"), HostClass::Absent);
    assert_eq!(
        classify(".spectrum-Search--quiet .spectrum-Search-input"),
        HostClass::ModifierOnly
    );
    assert_eq!(classify(".spectrum-Search"), HostClass::Leading);
    assert_eq!(classify(".spectrum-Search > .x"), HostClass::Leading);
    assert_eq!(classify(":host .x"), HostClass::Leading);
    assert_eq!(classify(".spectrum-Search ~ .x"), HostClass::Leading);
    assert_eq!(classify(".spectrum-Search + .x"), HostClass::Leading);
    assert_eq!(
        classify(".spectrum-Search + .spectrum-Search"),
        HostClass::General
    );
    assert_eq!(classify(".spectrum-Search.is-quiet .x"), HostClass::General);
    assert_eq!(classify(".spectrum-Search::before"), HostClass::General);
    assert_eq!(classify("[dir] .spectrum-Search .x"), HostClass::General);
}

#[test]
fn test_modifier_never_downgrades_presence() {
    let tree = parse(".spectrum-Search.spectrum-Search--quiet");
    let scan = scan_host(&tree, top_level(&tree)[0], HOST);
    assert_eq!(scan.presence, HostPresence::Yes);
    assert_eq!(scan.host_at, Some(0));
    assert_eq!(scan.boundary, 2);

    let tree = parse(".spectrum-Search--quiet .spectrum-Search");
    let scan = scan_host(&tree, top_level(&tree)[0], HOST);
    assert_eq!(scan.presence, HostPresence::Yes);
    assert_eq!(scan.host_at, Some(2));
    assert_eq!(scan.boundary, 1);
}

#[test]
fn test_every_combinator_ends_the_host_region() {
    let tree = parse(".a + .b ~ .c > .d");
    let scan = scan_host(&tree, top_level(&tree)[0], HOST);
    assert_eq!(scan.boundary, 1);
    assert_eq!(scan.presence, HostPresence::No);

    let tree = parse(".a.b ~ .c");
    let scan = scan_host(&tree, top_level(&tree)[0], HOST);
    assert_eq!(scan.boundary, 2);
}

#[test]
fn test_hostify_absent() {
    assert_eq!(
        run(".spectrum-Search-input", &[host]),
        ":host .spectrum-Search-input"
    );
    assert_eq!(
        run(".spectrum-Search-a + .spectrum-Search-b", &[host]),
        ":host .spectrum-Search-a + .spectrum-Search-b"
    );
}

#[test]
fn test_hostify_modifier_only() {
    assert_eq!(
        run(".spectrum-Search--quiet .spectrum-Search-input", &[host]),
        ":host(.spectrum-Search--quiet) .spectrum-Search-input"
    );
    assert_eq!(
        run(".spectrum-Search--quiet.is-open > .x", &[host]),
        ":host(.spectrum-Search--quiet.is-open) > .x"
    );
}

#[test]
fn test_hostify_leading() {
    assert_eq!(run(".spectrum-Search", &[host]), ":host");
    assert_eq!(run(".spectrum-Search .x", &[host]), ":host .x");
    assert_eq!(run(".spectrum-Search > .x", &[host]), ":host > .x");
}

#[test]
fn test_hostify_sibling_combinators() {
    assert_eq!(run(".spectrum-Search ~ .x", &[host]), ":host ~ .x");
    assert_eq!(run(".spectrum-Search + .x", &[host]), ":host + .x");
    assert_eq!(
        run(".spectrum-Search.is-open + .x", &[host]),
        ":host(.is-open) + .x"
    );
    assert_eq!(
        run(".spectrum-Search--quiet ~ .x", &[host]),
        ":host(.spectrum-Search--quiet) ~ .x"
    );
    assert_eq!(
        run(".spectrum-Search + .spectrum-Search", &[host]),
        ":host"
    );
    assert_eq!(
        run(".a + .spectrum-Search .x", &[host]),
        ":host(.a) .x"
    );
}

#[test]
fn test_hostify_general() {
    assert_eq!(
        run(".spectrum-Search.is-quiet .x", &[host]),
        ":host(.is-quiet) .x"
    );
    assert_eq!(
        run(".spectrum-Search--quiet.spectrum-Search", &[host]),
        ":host(.spectrum-Search--quiet)"
    );
    assert_eq!(run(".spectrum-Search:hover", &[host]), ":host(:hover)");
}

#[test]
fn test_hostify_general_moves_late_host() {
    assert_eq!(
        run(r#"[dir="rtl"] .spectrum-Search .x"#, &[host]),
        r#":host([dir="rtl"]) .x"#
    );
    assert_eq!(
        run(".spectrum-Search--quiet .spectrum-Search", &[host]),
        ":host(.spectrum-Search--quiet)"
    );
}

#[test]
fn test_hostify_merges_existing_anchor() {
    assert_eq!(run(":host(.a).b .x", &[host]), ":host(.a.b) .x");
}

#[test]
fn test_hostify_is_idempotent() {
    for selector in [
        ".spectrum-Search-input",
        ".spectrum-Search--quiet .spectrum-Search-input",
        ".spectrum-Search",
        ".spectrum-Search.is-quiet .x",
        r#"[dir="rtl"] .spectrum-Search .x"#,
        ".spectrum-Search ~ .x",
        ".spectrum-Search + .spectrum-Search",
    ] {
        let once = run(selector, &[host]);
        let twice = run(selector, &[host, host]);
        assert_eq!(once, twice, "hostify twice on `{selector}`");
    }
}

#[test]
fn test_hostify_each_selector_of_a_list() {
    assert_eq!(
        run(".spectrum-Search, .spectrum-Search-input", &[host]),
        ":host, :host .spectrum-Search-input"
    );
}

// Directionality hoisting

#[test]
fn test_dir_moves_into_anchor() {
    assert_eq!(
        run(r#".x[dir="rtl"] .y"#, &[host, hoist_dir]),
        r#":host([dir="rtl"]) .x .y"#
    );
    assert_eq!(
        run(r#".x .y[dir="rtl"]"#, &[host, hoist_dir]),
        r#":host([dir="rtl"]) .x .y"#
    );
}

#[test]
fn test_dir_alone_leaves_no_dangling_combinator() {
    assert_eq!(
        run("[dir=rtl] .x", &[host, hoist_dir]),
        r#":host([dir="rtl"]) .x"#
    );
    assert_eq!(
        run("[dir=rtl] > .x", &[host, hoist_dir]),
        r#":host([dir="rtl"]) > .x"#
    );
}

#[test]
fn test_last_dir_wins() {
    assert_eq!(
        run(".x[dir=ltr] .y[dir=rtl]", &[host, hoist_dir]),
        r#":host([dir="rtl"]) .x .y"#
    );
}

#[test]
fn test_dir_pseudo_class_is_hoisted() {
    assert_eq!(
        run(".x:dir(rtl)", &[host, hoist_dir]),
        r#":host([dir="rtl"]) .x"#
    );
}

#[test]
fn test_dir_without_value() {
    assert_eq!(run(".x[dir] .y", &[host, hoist_dir]), ":host([dir]) .x .y");
}

#[test]
fn test_nested_dir_stays_in_its_argument() {
    assert_eq!(
        run(".x:not([dir=rtl])", &[host, hoist_dir]),
        r#":host .x:not([dir="rtl"])"#
    );
}

#[test]
fn test_dir_inside_host_argument() {
    assert_eq!(
        run(".spectrum-Search--quiet[dir=rtl] .x", &[host, hoist_dir]),
        r#":host(.spectrum-Search--quiet[dir="rtl"]) .x"#
    );
}

#[test]
fn test_dir_without_anchor_ends_first_compound() {
    assert_eq!(run(".a .b[dir=rtl]", &[hoist_dir]), r#".a[dir="rtl"] .b"#);
}

// Specificity normalization

#[test]
fn test_whereify_wraps_arguments() {
    assert_eq!(run(":host(.a.b) .x", &[whereify_host]), ":host(:where(.a.b)) .x");
    assert_eq!(
        run(r#":host([dir="rtl"]) .x"#, &[whereify_host]),
        r#":host(:where([dir="rtl"])) .x"#
    );
}

#[test]
fn test_whereify_extracts_pseudo_elements() {
    assert_eq!(
        run(":host(.a::before)", &[whereify_host]),
        ":host(:where(.a))::before"
    );
    assert_eq!(run(":host(::after)", &[whereify_host]), ":host::after");
    assert_eq!(
        run(":host(::before) .x", &[whereify_host]),
        ":host::before .x"
    );
}

#[test]
fn test_whereify_leaves_other_selectors() {
    assert_eq!(run(":host .x", &[whereify_host]), ":host .x");
    assert_eq!(run(".x :host(.a)", &[whereify_host]), ".x :host(.a)");
    assert_eq!(run(".x", &[whereify_host]), ".x");
}

#[test]
fn test_host_to_host_where_after_hostify() {
    assert_eq!(
        run(".spectrum-Search::before", &[host, whereify_host]),
        ":host::before"
    );
}

// Dehostify

#[test]
fn test_dehostify_strips_bare_descendant_anchor() {
    assert_eq!(run(":host .x", &[dehostify]), ".x");
    assert_eq!(run(":host .x .y, :host .z", &[dehostify]), ".x .y, .z");
}

#[test]
fn test_dehostify_keeps_anchors_that_matter() {
    assert_eq!(run(":host > .x", &[dehostify]), ":host > .x");
    assert_eq!(run(":host(.a) .x", &[dehostify]), ":host(.a) .x");
    assert_eq!(run(":host", &[dehostify]), ":host");
    assert_eq!(run(":host::before .x", &[dehostify]), ":host::before .x");
    assert_eq!(run(".x :host .y", &[dehostify]), ".x :host .y");
}
