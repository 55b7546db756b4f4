//! Simple selectors: single conditions on one element.

use core::fmt;

use serde::Serialize;

use super::Specificity;
use super::model::SelectorModel;
use crate::tokenizer::{Token, serialize_identifier, serialize_string};

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimpleSelector {
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    ///
    /// Example: `*`
    Universal,

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// Examples: `div`, `svg|rect`, `|rect`
    Type {
        /// [§ 5.3 Namespaces](https://www.w3.org/TR/selectors-4/#type-nmsp)
        /// `None` for any namespace (`rect`, `*|rect`), `Some("")` for no
        /// namespace (`|rect`).
        namespace: Option<String>,
        /// The element type name.
        name: String,
    },

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    ///
    /// Examples: `#main`, `#nav-bar`
    Id(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    ///
    /// Examples: `.highlight`, `.nav-item`
    Class(String),

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// "Pseudo-classes are simple selectors that permit selection based on
    /// information that lies outside of the document tree or that can be
    /// awkward or impossible to express using the other simple selectors."
    ///
    /// Examples: `:hover`, `:first-child`
    PseudoClass(String),

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// "Functional pseudo-classes ... are represented by a function token
    /// followed by its arguments."
    ///
    /// Examples: `:nth-child(2n+1)`, `:lang(en)`
    FunctionPseudoClass {
        /// The function name, without `(`.
        name: String,
        /// The argument tokens as written, without the closing `)`.
        arguments: Vec<Token>,
    },

    /// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
    ///
    /// Examples: `[href]`, `[lang|=en]`, `[src$=".png"]`
    Attribute(AttributeSelector),

    /// A selector that never matches anything.
    ///
    /// Stands in for alternatives that could not be parsed and for
    /// pseudo-elements, so that one bad selector does not drop its whole rule.
    SelectNothing,
}

/// [§ 6.1](https://www.w3.org/TR/selectors-4/#attribute-representation)
///
/// How an attribute's value is compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttributeOperator {
    /// `[att]` "Represents an element with the att attribute, whatever the
    /// value of the attribute."
    Exists,

    /// `[att=val]` "Represents an element with the att attribute whose value
    /// is exactly 'val'."
    Equals(String),

    /// `[att~=val]` "Represents an element with the att attribute whose value
    /// is a whitespace-separated list of words, one of which is exactly 'val'."
    IncludesWord(String),

    /// `[att|=val]` "Represents an element with the att attribute, its value
    /// either being exactly 'val' or beginning with 'val' immediately followed
    /// by '-' (U+002D)."
    DashMatch(String),

    /// `[att^=val]` "Represents an element with the att attribute whose value
    /// begins with the prefix 'val'."
    PrefixMatch(String),

    /// `[att$=val]` "Represents an element with the att attribute whose value
    /// ends with the suffix 'val'."
    SuffixMatch(String),

    /// `[att*=val]` "Represents an element with the att attribute whose value
    /// contains at least one instance of the substring 'val'."
    SubstringMatch(String),
}

impl AttributeOperator {
    /// The operator as written between the name and the value (empty for
    /// [`AttributeOperator::Exists`]) and the comparison value, if any.
    #[must_use]
    pub fn parts(&self) -> (&'static str, Option<&str>) {
        match self {
            Self::Exists => ("", None),
            Self::Equals(v) => ("=", Some(v)),
            Self::IncludesWord(v) => ("~=", Some(v)),
            Self::DashMatch(v) => ("|=", Some(v)),
            Self::PrefixMatch(v) => ("^=", Some(v)),
            Self::SuffixMatch(v) => ("$=", Some(v)),
            Self::SubstringMatch(v) => ("*=", Some(v)),
        }
    }
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// An attribute selector: an optionally namespaced attribute name and the way
/// its value is tested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSelector {
    namespace: Option<String>,
    name: String,
    operator: AttributeOperator,
}

impl AttributeSelector {
    /// Create an attribute selector in any namespace.
    #[must_use]
    pub fn new(name: impl Into<String>, operator: AttributeOperator) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            operator,
        }
    }

    /// `[name]`
    #[must_use]
    pub fn exists(name: impl Into<String>) -> Self {
        Self::new(name, AttributeOperator::Exists)
    }

    /// `[name=value]`
    #[must_use]
    pub fn equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, AttributeOperator::Equals(value.into()))
    }

    /// `[name~=value]`
    #[must_use]
    pub fn includes_word(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, AttributeOperator::IncludesWord(value.into()))
    }

    /// `[name|=value]`
    #[must_use]
    pub fn dash_match(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, AttributeOperator::DashMatch(value.into()))
    }

    /// `[name^=value]`
    #[must_use]
    pub fn prefix_match(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, AttributeOperator::PrefixMatch(value.into()))
    }

    /// `[name$=value]`
    #[must_use]
    pub fn suffix_match(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, AttributeOperator::SuffixMatch(value.into()))
    }

    /// `[name*=value]`
    #[must_use]
    pub fn substring_match(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, AttributeOperator::SubstringMatch(value.into()))
    }

    /// Restrict the attribute to a namespace; `""` means no namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// The attribute namespace, `None` meaning any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How the value is tested.
    #[must_use]
    pub const fn operator(&self) -> &AttributeOperator {
        &self.operator
    }

    /// Test the attribute on `element`.
    pub fn matches<M: SelectorModel + ?Sized>(&self, model: &M, element: &M::Element) -> bool {
        let ns = self.namespace();
        let name = self.name.as_str();
        match &self.operator {
            AttributeOperator::Exists => model.has_attribute(element, ns, name),
            AttributeOperator::Equals(v) => model.attribute_value_equals(element, ns, name, v),
            AttributeOperator::IncludesWord(v) => {
                model.attribute_value_contains_word(element, ns, name, v)
            }
            // "exactly 'val' or beginning with 'val' immediately followed by '-'"
            AttributeOperator::DashMatch(v) => {
                model.attribute_value_equals(element, ns, name, v)
                    || model.attribute_value_starts_with(element, ns, name, &format!("{v}-"))
            }
            AttributeOperator::PrefixMatch(v) => {
                model.attribute_value_starts_with(element, ns, name, v)
            }
            AttributeOperator::SuffixMatch(v) => {
                model.attribute_value_ends_with(element, ns, name, v)
            }
            AttributeOperator::SubstringMatch(v) => {
                model.attribute_value_contains(element, ns, name, v)
            }
        }
    }
}

impl SimpleSelector {
    /// Shorthand for a type selector in any namespace.
    #[must_use]
    pub fn type_selector(name: impl Into<String>) -> Self {
        Self::Type {
            namespace: None,
            name: name.into(),
        }
    }

    /// Shorthand for an id selector.
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Shorthand for a class selector.
    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// Shorthand for a pseudo-class selector.
    #[must_use]
    pub fn pseudo_class(name: impl Into<String>) -> Self {
        Self::PseudoClass(name.into())
    }

    /// Returns `element` itself if it satisfies this selector.
    pub fn match_element<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        element: &M::Element,
    ) -> Option<M::Element> {
        self.matches(model, element).then(|| element.clone())
    }

    /// Whether `element` satisfies this selector.
    pub fn matches<M: SelectorModel + ?Sized>(&self, model: &M, element: &M::Element) -> bool {
        match self {
            Self::Universal => true,
            Self::SelectNothing => false,
            Self::Type { namespace, name } => model.has_type(element, namespace.as_deref(), name),
            Self::Id(id) => model.has_id(element, id),
            Self::Class(class) => model.has_style_class(element, class),
            Self::PseudoClass(name) => model.has_pseudo_class(element, name),
            Self::FunctionPseudoClass { name, arguments } => {
                model.has_function_pseudo_class(element, name, arguments)
            }
            Self::Attribute(attribute) => attribute.matches(model, element),
        }
    }

    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// "count the number of ID selectors in the selector (= A) ... count the
    /// number of class selectors, attributes selectors, and pseudo-classes in
    /// the selector (= B) ... count the number of type selectors and
    /// pseudo-elements in the selector (= C) ... ignore the universal selector"
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        match self {
            Self::Id(_) => Specificity::ID,
            Self::Class(_)
            | Self::PseudoClass(_)
            | Self::FunctionPseudoClass { .. }
            | Self::Attribute(_) => Specificity::CLASS,
            Self::Type { .. } => Specificity::TYPE,
            Self::Universal | Self::SelectNothing => Specificity::ZERO,
        }
    }

    pub(crate) fn write_css(&self, out: &mut String) {
        match self {
            Self::Universal => out.push('*'),
            Self::Type { namespace, name } => {
                if let Some(ns) = namespace {
                    serialize_identifier(out, ns);
                    out.push('|');
                }
                serialize_identifier(out, name);
            }
            Self::Id(id) => {
                out.push('#');
                serialize_identifier(out, id);
            }
            Self::Class(class) => {
                out.push('.');
                serialize_identifier(out, class);
            }
            Self::PseudoClass(name) => {
                out.push(':');
                serialize_identifier(out, name);
            }
            Self::FunctionPseudoClass { name, arguments } => {
                out.push(':');
                serialize_identifier(out, name);
                out.push('(');
                for token in arguments {
                    out.push_str(&token.to_css());
                }
                out.push(')');
            }
            Self::Attribute(attribute) => {
                out.push('[');
                if let Some(ns) = attribute.namespace() {
                    serialize_identifier(out, ns);
                    out.push('|');
                }
                serialize_identifier(out, attribute.name());
                let (op, value) = attribute.operator().parts();
                out.push_str(op);
                if let Some(value) = value {
                    serialize_string(out, value, None);
                }
                out.push(']');
            }
            // `:not(*)` also never matches, and the parser reads it back as
            // `SelectNothing`.
            Self::SelectNothing => out.push_str(":not(*)"),
        }
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_css(&mut out);
        f.write_str(&out)
    }
}
