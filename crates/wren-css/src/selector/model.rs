//! The capability interface selectors are matched through.

use crate::tokenizer::Token;

/// Default number of hops a descendant or general-sibling walk may take.
pub const DEFAULT_WALK_LIMIT: usize = 65_536;

/// [§ 3.1 Structure and Terminology](https://www.w3.org/TR/selectors-4/#structure)
///
/// "Selectors are matched against elements in a document tree."
///
/// The queries a selector needs to ask about an element and its surroundings.
/// Any tree-shaped collection of elements can be styled by implementing this
/// trait; the matcher never mutates the model and never needs a concrete
/// element type.
///
/// Every query is total: an element that lacks the attribute, class or state
/// being asked about simply answers `false`. Implementations shared between
/// threads must answer consistently for concurrent readers.
pub trait SelectorModel {
    /// A handle to an element of the model.
    type Element: Clone;

    /// The element's parent element, or `None` at the root.
    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// The element sibling immediately before `element`, or `None` if it is
    /// the first.
    fn previous_sibling(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Whether the element's id is `id`.
    fn has_id(&self, element: &Self::Element, id: &str) -> bool;

    /// Whether the element's class list contains `class`.
    fn has_style_class(&self, element: &Self::Element, class: &str) -> bool;

    /// Whether the element's type is `name`.
    ///
    /// `namespace` is `None` when any namespace is acceptable and `Some("")`
    /// when the element must not be in a namespace.
    fn has_type(&self, element: &Self::Element, namespace: Option<&str>, name: &str) -> bool;

    /// Whether the element is in the state named by a pseudo-class.
    fn has_pseudo_class(&self, element: &Self::Element, name: &str) -> bool;

    /// Whether the element satisfies a functional pseudo-class.
    ///
    /// Arguments are passed through as written; evaluating them is up to the
    /// model. The default ignores them.
    fn has_function_pseudo_class(
        &self,
        element: &Self::Element,
        name: &str,
        _arguments: &[Token],
    ) -> bool {
        self.has_pseudo_class(element, name)
    }

    /// Whether the element has the attribute at all.
    fn has_attribute(&self, element: &Self::Element, namespace: Option<&str>, name: &str) -> bool;

    /// Whether the attribute's value is exactly `value`.
    fn attribute_value_equals(
        &self,
        element: &Self::Element,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> bool;

    /// Whether the attribute's value begins with `value`.
    fn attribute_value_starts_with(
        &self,
        element: &Self::Element,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> bool;

    /// Whether the attribute's value ends with `value`.
    fn attribute_value_ends_with(
        &self,
        element: &Self::Element,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> bool;

    /// Whether the attribute's value contains `value` as a substring.
    fn attribute_value_contains(
        &self,
        element: &Self::Element,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> bool;

    /// Whether the attribute's value, split on whitespace, contains the word
    /// `value`.
    fn attribute_value_contains_word(
        &self,
        element: &Self::Element,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> bool;

    /// The most parent or previous-sibling hops a single descendant or
    /// general-sibling walk performs before it gives up without a match.
    fn walk_limit(&self) -> usize {
        DEFAULT_WALK_LIMIT
    }
}
