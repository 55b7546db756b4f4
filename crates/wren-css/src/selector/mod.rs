//! CSS Selector matching
//!
//! This module implements selector matching per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) over any document
//! model that implements [`SelectorModel`].
//!
//! A selector is either a [`SimpleSelector`] or a [`Combinator`] whose left
//! operand is simple and whose right operand is another selector. Matching
//! runs right to left: the right-most simple selector is tested against the
//! queried element and each combinator then moves outward through the tree.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use serde::Serialize;

/// Combinators and their matching walk.
pub mod combinator;
/// Selector lists.
pub mod group;
/// The document model capability trait.
pub mod model;
/// Simple selectors.
pub mod simple;

pub use combinator::{Combinator, CombinatorKind};
pub use group::SelectorGroup;
pub use model::{DEFAULT_WALK_LIMIT, SelectorModel};
pub use simple::{AttributeOperator, AttributeSelector, SimpleSelector};

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the selector (= C)"
///
/// The three counts are folded into one weighted sum, `100·A + 10·B + C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32);

impl Specificity {
    /// Universal selector and select-nothing.
    pub const ZERO: Self = Self(0);
    /// Type selectors.
    pub const TYPE: Self = Self(1);
    /// Class, attribute and pseudo-class selectors.
    pub const CLASS: Self = Self(10);
    /// Id selectors.
    pub const ID: Self = Self(100);
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Specificity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A complete selector: one simple selector, or a combinator chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Selector {
    /// A single condition on the subject element.
    Simple(SimpleSelector),
    /// A simple selector related to the rest of the chain.
    Combinator(Combinator),
}

impl Selector {
    /// Returns a matched element if `element` satisfies the selector.
    ///
    /// For a simple selector this is `element` itself. For a combinator it is
    /// the left-most element the chain reached, which the enclosing
    /// combinator continues from.
    pub fn match_element<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        element: &M::Element,
    ) -> Option<M::Element> {
        match self {
            Self::Simple(simple) => simple.match_element(model, element),
            Self::Combinator(combinator) => combinator.match_element(model, element),
        }
    }

    /// Whether `element` satisfies the selector.
    pub fn matches<M: SelectorModel + ?Sized>(&self, model: &M, element: &M::Element) -> bool {
        match self {
            Self::Simple(simple) => simple.matches(model, element),
            Self::Combinator(combinator) => combinator.match_element(model, element).is_some(),
        }
    }

    /// [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules)
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        match self {
            Self::Simple(simple) => simple.specificity(),
            Self::Combinator(combinator) => combinator.specificity(),
        }
    }

    pub(crate) fn write_css(&self, out: &mut String) {
        match self {
            Self::Simple(simple) => simple.write_css(out),
            Self::Combinator(combinator) => combinator.write_css(out),
        }
    }
}

impl From<SimpleSelector> for Selector {
    fn from(simple: SimpleSelector) -> Self {
        Self::Simple(simple)
    }
}

impl From<Combinator> for Selector {
    fn from(combinator: Combinator) -> Self {
        Self::Combinator(combinator)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_css(&mut out);
        f.write_str(&out)
    }
}
