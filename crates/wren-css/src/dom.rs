//! Selector matching over the [`wren_dom`] element tree.
//!
//! Only element nodes take part: text and comment nodes are skipped when
//! moving to a parent or previous sibling, and the Document node is nobody's
//! parent element.

use wren_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::selector::SelectorModel;

impl SelectorModel for DomTree {
    type Element = NodeId;

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.ancestors(*element)
            .next()
            .filter(|&parent| self.as_element(parent).is_some())
    }

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    ///
    /// Find the immediately preceding element sibling (skipping text/comment nodes).
    fn previous_sibling(&self, element: &NodeId) -> Option<NodeId> {
        self.preceding_siblings(*element)
            .find(|&sibling| self.as_element(sibling).is_some())
    }

    fn has_id(&self, element: &NodeId, id: &str) -> bool {
        self.as_element(*element)
            .and_then(ElementData::id)
            .is_some_and(|value| value == id)
    }

    fn has_style_class(&self, element: &NodeId, class: &str) -> bool {
        self.as_element(*element)
            .is_some_and(|data| data.classes().contains(class))
    }

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Tag names compare ASCII case-insensitively, as in HTML documents.
    fn has_type(&self, element: &NodeId, namespace: Option<&str>, name: &str) -> bool {
        let Some(data) = self.as_element(*element) else {
            return false;
        };
        let namespace_matches = match namespace {
            None => true,
            Some("") => data.namespace.is_none(),
            Some(ns) => data.namespace.as_deref() == Some(ns),
        };
        namespace_matches && data.tag_name.eq_ignore_ascii_case(name)
    }

    fn has_pseudo_class(&self, element: &NodeId, name: &str) -> bool {
        self.as_element(*element)
            .is_some_and(|data| pseudo_class_matches(self, *element, data, name))
    }

    fn has_attribute(&self, element: &NodeId, namespace: Option<&str>, name: &str) -> bool {
        attribute(self, *element, namespace, name).is_some()
    }

    fn attribute_value_equals(
        &self,
        element: &NodeId,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> bool {
        attribute(self, *element, namespace, name).is_some_and(|actual| actual == value)
    }

    /// "If 'val' is the empty string then the selector does not represent anything."
    fn attribute_value_starts_with(
        &self,
        element: &NodeId,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> bool {
        !value.is_empty()
            && attribute(self, *element, namespace, name)
                .is_some_and(|actual| actual.starts_with(value))
    }

    /// "If 'val' is the empty string then the selector does not represent anything."
    fn attribute_value_ends_with(
        &self,
        element: &NodeId,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> bool {
        !value.is_empty()
            && attribute(self, *element, namespace, name)
                .is_some_and(|actual| actual.ends_with(value))
    }

    /// "If 'val' is the empty string then the selector does not represent anything."
    fn attribute_value_contains(
        &self,
        element: &NodeId,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> bool {
        !value.is_empty()
            && attribute(self, *element, namespace, name)
                .is_some_and(|actual| actual.contains(value))
    }

    /// "If 'val' contains whitespace, it will never represent anything (since
    /// the words are separated by spaces). Also if 'val' is the empty string,
    /// it will never represent anything."
    fn attribute_value_contains_word(
        &self,
        element: &NodeId,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> bool {
        !value.is_empty()
            && !value.contains(|c: char| c.is_ascii_whitespace())
            && attribute(self, *element, namespace, name)
                .is_some_and(|actual| actual.split_ascii_whitespace().any(|word| word == value))
    }
}

/// [§ 6.2 Attribute selectors and namespaces](https://www.w3.org/TR/selectors-4/#attrnmsp)
///
/// Namespaced attributes are stored as `prefix:name`. `None` accepts the
/// attribute in any namespace, `Some("")` only the unprefixed one.
fn attribute<'a>(
    tree: &'a DomTree,
    element: NodeId,
    namespace: Option<&str>,
    name: &str,
) -> Option<&'a str> {
    let attrs = &tree.as_element(element)?.attrs;
    let value = match namespace {
        Some("") => attrs.get(name),
        Some(ns) => attrs.get(&format!("{ns}:{name}")),
        None => attrs.get(name).or_else(|| {
            attrs
                .iter()
                .find(|(key, _)| {
                    key.split_once(':')
                        .is_some_and(|(_, local)| local == name)
                })
                .map(|(_, value)| value)
        }),
    };
    value.map(String::as_str)
}

/// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// Structural pseudo-classes are answered from the tree. Any other name is
/// looked up in the element's dynamic states.
fn pseudo_class_matches(
    tree: &DomTree,
    node_id: NodeId,
    element: &ElementData,
    name: &str,
) -> bool {
    match name {
        // [§ 4.4 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
        // "The :root pseudo-class represents an element that is the root of the document."
        "root" => tree.document_element() == Some(node_id),

        // [§ 4.12 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
        // "The :first-child pseudo-class represents an element that is first among its
        // inclusive siblings."
        "first-child" => tree
            .parent(node_id)
            .is_some_and(|parent| tree.element_children(parent).next() == Some(node_id)),

        // [§ 4.12 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
        "last-child" => tree
            .parent(node_id)
            .is_some_and(|parent| tree.element_children(parent).last() == Some(node_id)),

        // [§ 4.12 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
        // "The :only-child pseudo-class represents an element that has no siblings."
        "only-child" => tree
            .parent(node_id)
            .is_some_and(|parent| tree.element_children(parent).count() == 1),

        // [§ 4.11 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
        "first-of-type" => tree.parent(node_id).is_some_and(|parent| {
            tree.element_children(parent)
                .find(|&c| same_type(tree, c, element))
                == Some(node_id)
        }),

        // [§ 4.11 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
        "last-of-type" => tree.parent(node_id).is_some_and(|parent| {
            tree.element_children(parent)
                .filter(|&c| same_type(tree, c, element))
                .last()
                == Some(node_id)
        }),

        // [§ 4.5 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
        // "The :empty pseudo-class represents an element that has no children at all."
        "empty" => tree
            .children(node_id)
            .iter()
            .all(|&c| match tree.get(c).map(|n| &n.node_type) {
                Some(NodeType::Text(t)) => t.trim().is_empty(),
                Some(NodeType::Comment(_)) => true,
                _ => false,
            }),

        // [§ 4.6 :link](https://www.w3.org/TR/selectors-4/#the-link-pseudo)
        // Every link is unvisited.
        "link" | "any-link" => {
            (element.tag_name.eq_ignore_ascii_case("a")
                || element.tag_name.eq_ignore_ascii_case("area"))
                && element.attrs.contains_key("href")
        }

        "disabled" => element.attrs.contains_key("disabled") || element.has_state(name),
        "enabled" => !element.attrs.contains_key("disabled") && !element.has_state("disabled"),

        _ => element.has_state(name),
    }
}

fn same_type(tree: &DomTree, candidate: NodeId, element: &ElementData) -> bool {
    tree.as_element(candidate).is_some_and(|other| {
        other.namespace == element.namespace
            && other.tag_name.eq_ignore_ascii_case(&element.tag_name)
    })
}
