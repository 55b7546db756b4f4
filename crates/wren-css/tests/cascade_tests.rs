//! Integration tests for cascade ordering over the DOM tree.

use wren_css::{
    Declaration, Specificity, Stylesheet, cascaded_declarations, matching_rules,
    parse_stylesheet,
};
use wren_dom::{DomTree, ElementData, NodeId};

fn parse_css(css: &str) -> Stylesheet {
    let (stylesheet, errors) = parse_stylesheet(css);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    stylesheet
}

/// `<html><body><div id="main" class="box"><p class="note"/></div></body></html>`
fn document() -> (DomTree, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let body = tree.append_element(html, ElementData::new("body"));
    let div = tree.append_element(
        body,
        ElementData::new("div")
            .with_attr("id", "main")
            .with_attr("class", "box"),
    );
    let p = tree.append_element(div, ElementData::new("p").with_attr("class", "note"));
    (tree, div, p)
}

/// The value of each declaration, as CSS text, in application order.
fn applied(declarations: &[&Declaration]) -> Vec<String> {
    declarations.iter().map(ToString::to_string).collect()
}

#[test]
fn test_only_matching_rules_are_returned() {
    let stylesheet = parse_css("p { color: red } span { color: blue } .note { margin: 0 }");
    let (tree, _, p) = document();

    let matched = matching_rules(&stylesheet, &tree, &p);
    let indices: Vec<usize> = matched.iter().map(|m| m.source_index).collect();
    assert_eq!(indices, vec![0, 2]);
}

#[test]
fn test_rules_sorted_by_specificity() {
    let stylesheet = parse_css("#main p { a: 1 } p { a: 2 } .box > .note { a: 3 }");
    let (tree, _, p) = document();

    let matched = matching_rules(&stylesheet, &tree, &p);
    let order: Vec<(usize, Specificity)> = matched
        .iter()
        .map(|m| (m.source_index, m.specificity))
        .collect();
    assert_eq!(
        order,
        vec![(1, Specificity(1)), (2, Specificity(20)), (0, Specificity(101))]
    );
}

#[test]
fn test_equal_specificity_keeps_source_order() {
    let stylesheet = parse_css("p { a: 1 } .note { a: 2 } p { a: 3 } body p { a: 4 } p { a: 5 }");
    let (tree, _, p) = document();

    let indices: Vec<usize> = matching_rules(&stylesheet, &tree, &p)
        .iter()
        .map(|m| m.source_index)
        .collect();
    assert_eq!(indices, vec![0, 2, 4, 3, 1]);
}

#[test]
fn test_source_index_counts_at_rules() {
    let stylesheet = parse_css("@media print { p { a: 1 } } @import 'x.css'; p { a: 2 }");
    let (tree, _, p) = document();

    let matched = matching_rules(&stylesheet, &tree, &p);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].source_index, 2);
}

#[test]
fn test_matched_selector_is_first_matching_alternative() {
    let stylesheet = parse_css("span, #main p, p { a: 1 }");
    let (tree, _, p) = document();

    let matched = matching_rules(&stylesheet, &tree, &p);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].selector.to_string(), "#main p");
    assert_eq!(matched[0].specificity, Specificity(101));
}

#[test]
fn test_broken_alternative_does_not_drop_rule() {
    let (stylesheet, errors) = parse_stylesheet("p::after, .note { a: 1 } ::> , p { a: 2 }");
    assert_eq!(errors.len(), 1);
    let (tree, _, p) = document();

    let matched = matching_rules(&stylesheet, &tree, &p);
    assert_eq!(matched.len(), 2);
}

#[test]
fn test_non_matching_element_gets_nothing() {
    let stylesheet = parse_css("p { a: 1 }");
    let (tree, div, _) = document();
    assert!(matching_rules(&stylesheet, &tree, &div).is_empty());
    assert!(cascaded_declarations(&stylesheet, &tree, &div).is_empty());
}

#[test]
fn test_cascaded_declarations_follow_rule_order() {
    let stylesheet = parse_css(".note { color: green } p { color: red; margin: 0 }");
    let (tree, _, p) = document();

    let declarations = cascaded_declarations(&stylesheet, &tree, &p);
    assert_eq!(
        applied(&declarations),
        vec!["color: red", "margin: 0", "color: green"]
    );
}

#[test]
fn test_important_declarations_come_last() {
    let stylesheet = parse_css(
        "p { color: red !important; width: 1px } #main p { color: blue; width: 2px !important }",
    );
    let (tree, _, p) = document();

    let declarations = cascaded_declarations(&stylesheet, &tree, &p);
    assert_eq!(
        applied(&declarations),
        vec![
            "width: 1px",
            "color: blue",
            "color: red !important",
            "width: 2px !important",
        ]
    );
    assert!(declarations[2].important());
}

#[test]
fn test_declarations_without_terms_are_skipped() {
    let stylesheet = parse_css("p { color: ; margin: 0 }");
    let (tree, _, p) = document();

    let declarations = cascaded_declarations(&stylesheet, &tree, &p);
    assert_eq!(applied(&declarations), vec!["margin: 0"]);
}

#[test]
fn test_state_changes_change_matches() {
    let stylesheet = parse_css("p:hover { color: red } p { color: black }");
    let mut tree = DomTree::new();
    let idle = tree.append_element(NodeId::ROOT, ElementData::new("p"));
    let hovered = tree.append_element(idle, ElementData::new("p").with_state("hover"));

    assert_eq!(cascaded_declarations(&stylesheet, &tree, &idle).len(), 1);
    assert_eq!(
        applied(&cascaded_declarations(&stylesheet, &tree, &hovered)),
        vec!["color: black", "color: red"]
    );
}
