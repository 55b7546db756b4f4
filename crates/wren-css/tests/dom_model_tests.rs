//! Selector matching against the `wren_dom` tree.

use wren_css::{SelectorModel, parse_selector};
use wren_dom::{DomTree, ElementData, NodeId};

fn matches(tree: &DomTree, css: &str, element: NodeId) -> bool {
    parse_selector(css).unwrap().matches(tree, &element)
}

/// ```html
/// <html>
///   <body>
///     <!-- c -->
///     <h1 id="title">text</h1>
///     <p class="intro lead" lang="en-US">   </p>
///     <P data-x="a b">x</P>
///     <svg:rect xlink:href="#a"/>
///     <a href="/">link</a>
///   </body>
/// </html>
/// ```
struct Page {
    tree: DomTree,
    html: NodeId,
    body: NodeId,
    h1: NodeId,
    p: NodeId,
    upper_p: NodeId,
    rect: NodeId,
    link: NodeId,
}

fn page() -> Page {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let body = tree.append_element(html, ElementData::new("body"));
    let _ = tree.append_comment(body, " c ");
    let h1 = tree.append_element(body, ElementData::new("h1").with_attr("id", "title"));
    let _ = tree.append_text(h1, "text");
    let p = tree.append_element(
        body,
        ElementData::new("p")
            .with_attr("class", "intro lead")
            .with_attr("lang", "en-US"),
    );
    let _ = tree.append_text(p, "   ");
    let _ = tree.append_text(body, "\n");
    let upper_p = tree.append_element(body, ElementData::new("P").with_attr("data-x", "a b"));
    let _ = tree.append_text(upper_p, "x");
    let rect = tree.append_element(
        body,
        ElementData::new("rect")
            .with_namespace("svg")
            .with_attr("xlink:href", "#a"),
    );
    let link = tree.append_element(body, ElementData::new("a").with_attr("href", "/"));
    Page {
        tree,
        html,
        body,
        h1,
        p,
        upper_p,
        rect,
        link,
    }
}

#[test]
fn test_parent_skips_document() {
    let page = page();
    // `DomTree::parent` is the raw tree link; the model's parent is an element.
    assert_eq!(page.tree.parent(page.html), Some(NodeId::ROOT));
    assert_eq!(SelectorModel::parent(&page.tree, &page.body), Some(page.html));
    assert_eq!(SelectorModel::parent(&page.tree, &page.html), None);
    assert!(!matches(&page.tree, "* > html", page.html));
}

#[test]
fn test_previous_sibling_skips_text_and_comments() {
    let page = page();
    let tree = &page.tree;
    assert_eq!(tree.previous_sibling(&page.h1), None);
    assert_eq!(tree.previous_sibling(&page.upper_p), Some(page.p));
    assert!(matches(tree, "h1 + p", page.p));
    assert!(matches(tree, "p + p", page.upper_p));
    assert!(matches(tree, "h1 ~ a", page.link));
}

#[test]
fn test_type_is_case_insensitive() {
    let page = page();
    assert!(matches(&page.tree, "p", page.upper_p));
    assert!(matches(&page.tree, "BODY > P", page.p));
}

#[test]
fn test_id_and_class() {
    let page = page();
    assert!(matches(&page.tree, "#title", page.h1));
    assert!(matches(&page.tree, "p.lead.intro", page.p));
    assert!(!matches(&page.tree, ".intro", page.upper_p));
    assert!(matches(&page.tree, "html #title", page.h1));
}

#[test]
fn test_namespaced_types() {
    let page = page();
    let tree = &page.tree;
    assert!(matches(tree, "svg|rect", page.rect));
    assert!(matches(tree, "rect", page.rect));
    assert!(matches(tree, "*|rect", page.rect));
    assert!(!matches(tree, "|rect", page.rect));
    assert!(!matches(tree, "math|rect", page.rect));
    assert!(matches(tree, "|p", page.p));
}

#[test]
fn test_namespaced_attributes() {
    let page = page();
    let tree = &page.tree;
    assert!(matches(tree, "[xlink|href]", page.rect));
    assert!(matches(tree, "[href]", page.rect));
    assert!(matches(tree, "[*|href='#a']", page.rect));
    assert!(!matches(tree, "[|href]", page.rect));
    assert!(matches(tree, "[|href]", page.link));
    assert!(!matches(tree, "[svg|href]", page.rect));
}

#[test]
fn test_attribute_operators() {
    let page = page();
    let tree = &page.tree;
    assert!(matches(tree, "[lang=en-US]", page.p));
    assert!(matches(tree, "[lang|=en]", page.p));
    assert!(matches(tree, "[lang^=en]", page.p));
    assert!(matches(tree, "[lang$='-US']", page.p));
    assert!(matches(tree, "[lang*='n-U']", page.p));
    assert!(matches(tree, "[class~=lead]", page.p));
    assert!(!matches(tree, "[class~=lea]", page.p));
    assert!(!matches(tree, "[lang=en]", page.p));
}

#[test]
fn test_empty_and_spaced_values_never_match() {
    let page = page();
    let tree = &page.tree;
    assert!(!matches(tree, "[lang^='']", page.p));
    assert!(!matches(tree, "[lang$='']", page.p));
    assert!(!matches(tree, "[lang*='']", page.p));
    assert!(!matches(tree, "[data-x~='']", page.upper_p));
    assert!(!matches(tree, "[data-x~='a b']", page.upper_p));
    assert!(matches(tree, "[data-x='a b']", page.upper_p));
}

#[test]
fn test_structural_pseudo_classes() {
    let page = page();
    let tree = &page.tree;

    assert!(matches(tree, ":root", page.html));
    assert!(!matches(tree, ":root", page.body));
    assert!(matches(tree, "body:only-child", page.body));

    assert!(matches(tree, "h1:first-child", page.h1));
    assert!(!matches(tree, ":first-child", page.p));
    assert!(matches(tree, "a:last-child", page.link));
    assert!(!matches(tree, "h1:only-child", page.h1));

    assert!(matches(tree, "p:first-of-type", page.p));
    assert!(!matches(tree, "p:last-of-type", page.p));
    assert!(matches(tree, "p:last-of-type", page.upper_p));
    assert!(matches(tree, "rect:first-of-type", page.rect));
}

#[test]
fn test_empty_pseudo_class() {
    let page = page();
    let tree = &page.tree;
    assert!(matches(tree, ":empty", page.p));
    assert!(matches(tree, ":empty", page.link));
    assert!(!matches(tree, ":empty", page.h1));
    assert!(matches(tree, ":empty", page.rect));
}

#[test]
fn test_link_and_form_states() {
    let mut tree = DomTree::new();
    let form = tree.append_element(NodeId::ROOT, ElementData::new("form"));
    let link = tree.append_element(form, ElementData::new("a").with_attr("href", "#"));
    let anchor = tree.append_element(form, ElementData::new("a"));
    let off = tree.append_element(form, ElementData::new("input").with_attr("disabled", ""));
    let greyed = tree.append_element(form, ElementData::new("input").with_state("disabled"));
    let on = tree.append_element(form, ElementData::new("input"));

    assert!(matches(&tree, "a:link", link));
    assert!(matches(&tree, ":any-link", link));
    assert!(!matches(&tree, ":link", anchor));

    assert!(matches(&tree, "input:disabled", off));
    assert!(matches(&tree, "input:disabled", greyed));
    assert!(!matches(&tree, "input:enabled", greyed));
    assert!(matches(&tree, "input:enabled", on));
}

#[test]
fn test_dynamic_states() {
    let mut tree = DomTree::new();
    let button = tree.append_element(
        NodeId::ROOT,
        ElementData::new("button")
            .with_state("hover")
            .with_state("focus"),
    );
    assert!(matches(&tree, "button:hover:focus", button));
    assert!(matches(&tree, ":HOVER", button));
    assert!(!matches(&tree, ":active", button));
}

#[test]
fn test_non_element_nodes_never_match() {
    let page = page();
    let text = page.tree.children(page.h1)[0];
    assert!(!matches(&page.tree, "h1", text));
    assert!(!matches(&page.tree, "[id]", text));
    assert!(!matches(&page.tree, ":root", NodeId::ROOT));
    assert!(!page.tree.has_pseudo_class(&text, "empty"));
    assert!(!page.tree.has_type(&NodeId::ROOT, None, "html"));
}

#[test]
fn test_pseudo_element_never_matches() {
    let page = page();
    assert!(!matches(&page.tree, "p::first-line", page.p));
    assert!(!matches(&page.tree, "p:before", page.p));
}
