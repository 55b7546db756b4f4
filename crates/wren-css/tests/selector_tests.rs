//! Integration tests for selector matching and specificity over a minimal
//! in-memory model.

use std::cell::Cell;

use wren_common::warning::was_warned;
use wren_css::selector::{
    AttributeSelector, Combinator, CombinatorKind, Selector, SelectorGroup, SelectorModel,
    SimpleSelector, Specificity,
};
use wren_css::{CssError, Stylesheet};

#[derive(Default)]
struct MockElement {
    tag: &'static str,
    id: Option<&'static str>,
    classes: Vec<&'static str>,
    attrs: Vec<(&'static str, &'static str)>,
    pseudo_classes: Vec<&'static str>,
    parent: Option<usize>,
    previous: Option<usize>,
}

/// Elements are indices into `elements`; every navigation and type query is
/// counted.
#[derive(Default)]
struct MockModel {
    elements: Vec<MockElement>,
    walk_limit: Option<usize>,
    parent_calls: Cell<usize>,
    sibling_calls: Cell<usize>,
    type_calls: Cell<usize>,
}

impl MockModel {
    fn add(&mut self, element: MockElement) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    fn attr(&self, element: usize, name: &str) -> Option<&'static str> {
        self.elements[element]
            .attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }
}

impl SelectorModel for MockModel {
    type Element = usize;

    fn parent(&self, element: &usize) -> Option<usize> {
        self.parent_calls.set(self.parent_calls.get() + 1);
        self.elements[*element].parent
    }

    fn previous_sibling(&self, element: &usize) -> Option<usize> {
        self.sibling_calls.set(self.sibling_calls.get() + 1);
        self.elements[*element].previous
    }

    fn has_id(&self, element: &usize, id: &str) -> bool {
        self.elements[*element].id == Some(id)
    }

    fn has_style_class(&self, element: &usize, class: &str) -> bool {
        self.elements[*element].classes.iter().any(|c| *c == class)
    }

    fn has_type(&self, element: &usize, _namespace: Option<&str>, name: &str) -> bool {
        self.type_calls.set(self.type_calls.get() + 1);
        self.elements[*element].tag == name
    }

    fn has_pseudo_class(&self, element: &usize, name: &str) -> bool {
        self.elements[*element]
            .pseudo_classes
            .iter()
            .any(|c| *c == name)
    }

    fn has_attribute(&self, element: &usize, _namespace: Option<&str>, name: &str) -> bool {
        self.attr(*element, name).is_some()
    }

    fn attribute_value_equals(&self, e: &usize, _: Option<&str>, name: &str, v: &str) -> bool {
        self.attr(*e, name) == Some(v)
    }

    fn attribute_value_starts_with(&self, e: &usize, _: Option<&str>, name: &str, v: &str) -> bool {
        self.attr(*e, name).is_some_and(|a| a.starts_with(v))
    }

    fn attribute_value_ends_with(&self, e: &usize, _: Option<&str>, name: &str, v: &str) -> bool {
        self.attr(*e, name).is_some_and(|a| a.ends_with(v))
    }

    fn attribute_value_contains(&self, e: &usize, _: Option<&str>, name: &str, v: &str) -> bool {
        self.attr(*e, name).is_some_and(|a| a.contains(v))
    }

    fn attribute_value_contains_word(
        &self,
        e: &usize,
        _: Option<&str>,
        name: &str,
        v: &str,
    ) -> bool {
        self.attr(*e, name)
            .is_some_and(|a| a.split_whitespace().any(|w| w == v))
    }

    fn walk_limit(&self) -> usize {
        self.walk_limit.unwrap_or(wren_css::DEFAULT_WALK_LIMIT)
    }
}

fn tag(name: &str) -> SimpleSelector {
    SimpleSelector::type_selector(name)
}

fn combine(kind: CombinatorKind, first: SimpleSelector, second: impl Into<Selector>) -> Selector {
    Selector::Combinator(Combinator::new(kind, first, second))
}

/// html > body > div > p, with p preceded by h1 and h2 inside div.
fn document() -> (MockModel, [usize; 6]) {
    let mut model = MockModel::default();
    let html = model.add(MockElement {
        tag: "html",
        ..MockElement::default()
    });
    let body = model.add(MockElement {
        tag: "body",
        parent: Some(html),
        ..MockElement::default()
    });
    let div = model.add(MockElement {
        tag: "div",
        id: Some("main"),
        classes: vec!["box", "wide"],
        parent: Some(body),
        ..MockElement::default()
    });
    let h1 = model.add(MockElement {
        tag: "h1",
        parent: Some(div),
        ..MockElement::default()
    });
    let h2 = model.add(MockElement {
        tag: "h2",
        parent: Some(div),
        previous: Some(h1),
        ..MockElement::default()
    });
    let p = model.add(MockElement {
        tag: "p",
        attrs: vec![("lang", "en-US"), ("rel", "nofollow noopener")],
        pseudo_classes: vec!["hover"],
        parent: Some(div),
        previous: Some(h2),
        ..MockElement::default()
    });
    (model, [html, body, div, h1, h2, p])
}

// Simple selectors
// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)

#[test]
fn test_simple_selectors_match_themselves() {
    let (model, [_, _, div, _, _, p]) = document();

    assert_eq!(tag("div").match_element(&model, &div), Some(div));
    assert_eq!(tag("div").match_element(&model, &p), None);
    assert!(SimpleSelector::id("main").matches(&model, &div));
    assert!(SimpleSelector::class("wide").matches(&model, &div));
    assert!(!SimpleSelector::class("box").matches(&model, &p));
    assert!(SimpleSelector::pseudo_class("hover").matches(&model, &p));
    assert!(SimpleSelector::Universal.matches(&model, &p));
    assert!(!SimpleSelector::SelectNothing.matches(&model, &p));
}

#[test]
fn test_attribute_selectors() {
    let (model, [.., p]) = document();
    let matches =
        |selector: AttributeSelector| SimpleSelector::Attribute(selector).matches(&model, &p);

    assert!(matches(AttributeSelector::exists("lang")));
    assert!(!matches(AttributeSelector::exists("href")));
    assert!(matches(AttributeSelector::equals("lang", "en-US")));
    assert!(!matches(AttributeSelector::equals("lang", "en")));
    assert!(matches(AttributeSelector::dash_match("lang", "en")));
    assert!(matches(AttributeSelector::dash_match("lang", "en-US")));
    assert!(!matches(AttributeSelector::dash_match("lang", "e")));
    assert!(matches(AttributeSelector::includes_word("rel", "noopener")));
    assert!(!matches(AttributeSelector::includes_word("rel", "noop")));
    assert!(matches(AttributeSelector::prefix_match("lang", "en")));
    assert!(matches(AttributeSelector::suffix_match("lang", "US")));
    assert!(matches(AttributeSelector::substring_match("rel", "follow noop")));
}

// Combinators
// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)

#[test]
fn test_compound_selector_and_specificity() {
    let (model, [_, _, div, ..]) = document();
    // div.box#main
    let selector = combine(
        CombinatorKind::And,
        tag("div"),
        combine(
            CombinatorKind::And,
            SimpleSelector::class("box"),
            SimpleSelector::id("main"),
        ),
    );

    assert_eq!(selector.match_element(&model, &div), Some(div));
    assert_eq!(selector.specificity(), Specificity(111));
}

#[test]
fn test_child_combinator() {
    let mut model = MockModel::default();
    let ul = model.add(MockElement {
        tag: "ul",
        ..MockElement::default()
    });
    let li = model.add(MockElement {
        tag: "li",
        parent: Some(ul),
        ..MockElement::default()
    });

    let ul_li = combine(CombinatorKind::Child, tag("ul"), tag("li"));
    let ol_li = combine(CombinatorKind::Child, tag("ol"), tag("li"));

    assert_eq!(ul_li.match_element(&model, &li), Some(ul));
    assert!(!ol_li.matches(&model, &li));
}

#[test]
fn test_sibling_combinators() {
    let (model, [_, _, _, h1, _, p]) = document();

    let h2_plus_p = combine(CombinatorKind::AdjacentSibling, tag("h2"), tag("p"));
    let h1_plus_p = combine(CombinatorKind::AdjacentSibling, tag("h1"), tag("p"));
    let h1_tilde_p = combine(CombinatorKind::GeneralSibling, tag("h1"), tag("p"));

    assert!(h2_plus_p.matches(&model, &p));
    assert!(!h1_plus_p.matches(&model, &p));
    assert_eq!(h1_tilde_p.match_element(&model, &p), Some(h1));
}

#[test]
fn test_descendant_combinator_walks_all_ancestors() {
    let (model, [html, body, div, _, _, p]) = document();

    assert_eq!(
        combine(CombinatorKind::Descendant, tag("html"), tag("p")).match_element(&model, &p),
        Some(html)
    );
    assert_eq!(
        combine(CombinatorKind::Descendant, tag("body"), tag("p")).match_element(&model, &p),
        Some(body)
    );
    assert!(!combine(CombinatorKind::Descendant, tag("p"), tag("p")).matches(&model, &p));
    assert!(!combine(CombinatorKind::Descendant, tag("span"), tag("p")).matches(&model, &div));
}

#[test]
fn test_chained_combinators_move_outward() {
    let (model, [_, body, _, _, _, p]) = document();
    // body > div.box h2 + p
    let selector = combine(
        CombinatorKind::Child,
        tag("body"),
        combine(
            CombinatorKind::And,
            tag("div"),
            combine(
                CombinatorKind::Descendant,
                SimpleSelector::class("box"),
                combine(CombinatorKind::AdjacentSibling, tag("h2"), tag("p")),
            ),
        ),
    );

    assert_eq!(selector.match_element(&model, &p), Some(body));
    assert_eq!(selector.specificity(), Specificity(1 + 1 + 10 + 1 + 1));
}

#[test]
fn test_failed_second_operand_never_walks() {
    let (model, [.., p]) = document();
    let selector = combine(CombinatorKind::Descendant, tag("html"), tag("table"));

    assert!(!selector.matches(&model, &p));
    assert_eq!(model.parent_calls.get(), 0);
    assert_eq!(model.sibling_calls.get(), 0);
    // only `table` was asked about
    assert_eq!(model.type_calls.get(), 1);
}

#[test]
fn test_matching_is_repeatable() {
    let (model, [.., p]) = document();
    let selector = combine(CombinatorKind::GeneralSibling, tag("h1"), tag("p"));

    let first = selector.match_element(&model, &p);
    let second = selector.match_element(&model, &p);
    assert_eq!(first, second);
}

#[test]
fn test_walk_gives_up_on_cyclic_model() {
    let mut model = MockModel {
        walk_limit: Some(10),
        ..MockModel::default()
    };
    let looped = model.add(MockElement {
        tag: "a",
        ..MockElement::default()
    });
    model.elements[looped].parent = Some(looped);
    model.elements[looped].previous = Some(looped);

    let descendant = combine(CombinatorKind::Descendant, tag("b"), SimpleSelector::Universal);
    assert!(!descendant.matches(&model, &looped));
    // ten candidates, plus the lookup that shows the chain goes on
    assert_eq!(model.parent_calls.get(), 11);
    assert!(was_warned("CSS", "Descendant walk gave up after 10 steps"));

    let sibling = combine(CombinatorKind::GeneralSibling, tag("b"), SimpleSelector::Universal);
    assert!(!sibling.matches(&model, &looped));
    assert_eq!(model.sibling_calls.get(), 11);
}

#[test]
fn test_walk_ending_at_limit_is_not_reported() {
    let mut model = MockModel {
        walk_limit: Some(3),
        ..MockModel::default()
    };
    let mut parent = None;
    for name in ["a", "c", "c", "d"] {
        parent = Some(model.add(MockElement {
            tag: name,
            parent,
            ..MockElement::default()
        }));
    }
    let leaf = parent.unwrap();

    // exactly three ancestors: the walk runs out of tree, not of budget
    let selector = combine(CombinatorKind::Descendant, tag("b"), tag("d"));
    assert!(!selector.matches(&model, &leaf));
    assert!(!was_warned("CSS", "Descendant walk gave up after 3 steps"));

    // the third ancestor is still examined
    let selector = combine(CombinatorKind::Descendant, tag("a"), tag("d"));
    assert_eq!(selector.match_element(&model, &leaf), Some(0));
}

#[test]
fn test_zero_walk_limit_examines_nothing() {
    let (mut model, [.., p]) = document();
    model.walk_limit = Some(0);

    let selector = combine(CombinatorKind::Descendant, tag("html"), tag("p"));
    assert!(!selector.matches(&model, &p));
    assert_eq!(model.type_calls.get(), 1);
    assert!(was_warned("CSS", "Descendant walk gave up after 0 steps"));
}

// Selector groups
// [§ 4.1 Selector Lists](https://www.w3.org/TR/selectors-4/#grouping)

#[test]
fn test_group_returns_the_matching_alternative() {
    let (model, [_, _, div, ..]) = document();
    let group = SelectorGroup::new(vec![
        Selector::Simple(tag("table")),
        Selector::Simple(SimpleSelector::class("box")),
    ])
    .unwrap();

    let matched = group.match_element(&model, &div).unwrap();
    assert!(std::ptr::eq(matched, &group.selectors()[1]));
    assert_eq!(matched.specificity(), Specificity::CLASS);
    assert!(group.matches(&model, &div));
}

#[test]
fn test_group_prefers_earlier_alternative() {
    let (model, [_, _, div, ..]) = document();
    let group = SelectorGroup::new(vec![
        Selector::Simple(tag("div")),
        Selector::Simple(SimpleSelector::id("main")),
    ])
    .unwrap();

    let matched = group.match_element(&model, &div).unwrap();
    assert_eq!(matched.specificity(), Specificity::TYPE);
}

#[test]
fn test_group_without_match() {
    let (model, [.., p]) = document();
    let group = SelectorGroup::new(vec![Selector::Simple(tag("table"))]).unwrap();
    assert!(group.match_element(&model, &p).is_none());
}

#[test]
fn test_empty_group_is_rejected() {
    assert_eq!(SelectorGroup::new(Vec::new()), Err(CssError::EmptySelectorGroup));
}

// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)

#[test]
fn test_specificity_weights() {
    assert_eq!(SimpleSelector::Universal.specificity(), Specificity::ZERO);
    assert_eq!(SimpleSelector::SelectNothing.specificity(), Specificity(0));
    assert_eq!(tag("a").specificity(), Specificity(1));
    assert_eq!(SimpleSelector::class("a").specificity(), Specificity(10));
    assert_eq!(SimpleSelector::pseudo_class("hover").specificity(), Specificity(10));
    assert_eq!(
        SimpleSelector::Attribute(AttributeSelector::exists("x")).specificity(),
        Specificity(10)
    );
    assert_eq!(SimpleSelector::id("a").specificity(), Specificity(100));
}

#[test]
fn test_specificity_ordering_and_sum() {
    let total: Specificity = [Specificity::ID, Specificity::CLASS, Specificity::TYPE]
        .into_iter()
        .sum();
    assert_eq!(total, Specificity(111));
    assert!(Specificity::ID > Specificity::CLASS);
    assert_eq!(total.to_string(), "111");
    assert_eq!(Specificity(u32::MAX) + Specificity::ID, Specificity(u32::MAX));
}

// Display

#[test]
fn test_display_writes_css() {
    // a.x > b c
    let selector = combine(
        CombinatorKind::And,
        tag("a"),
        combine(
            CombinatorKind::Child,
            SimpleSelector::class("x"),
            combine(CombinatorKind::Descendant, tag("b"), tag("c")),
        ),
    );
    assert_eq!(selector.to_string(), "a.x > b c");

    let attribute = SimpleSelector::Attribute(AttributeSelector::dash_match("lang", "en"));
    assert_eq!(attribute.to_string(), "[lang|=\"en\"]");
    assert_eq!(
        SimpleSelector::Type {
            namespace: Some("svg".into()),
            name: "rect".into()
        }
        .to_string(),
        "svg|rect"
    );
    assert_eq!(SimpleSelector::id("1st").to_string(), "#\\31st");
    assert_eq!(SimpleSelector::SelectNothing.to_string(), ":not(*)");

    let group = SelectorGroup::new(vec![
        Selector::Simple(tag("h1")),
        combine(CombinatorKind::GeneralSibling, tag("h2"), tag("p")),
    ])
    .unwrap();
    assert_eq!(group.to_string(), "h1, h2 ~ p");
}

#[test]
fn test_ast_is_shareable_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Selector>();
    assert_send_sync::<SelectorGroup>();
    assert_send_sync::<Stylesheet>();
}
