//! Combinators: a simple selector related to the rest of a selector chain.

use core::fmt;

use serde::Serialize;
use strum_macros::Display;
use wren_common::warning::warn_once;

use super::model::SelectorModel;
use super::simple::SimpleSelector;
use super::{Selector, Specificity};

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
///
/// `And` joins the simple selectors of one compound selector; the others
/// relate two compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum CombinatorKind {
    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    /// "A compound selector ... represents a set of simultaneous conditions
    /// on a single element."
    And,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    Child,

    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    AdjacentSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that follows
    /// element A (not necessarily immediately), where A and B share the same
    /// parent."
    GeneralSibling,
}

impl CombinatorKind {
    /// The text written between the two operands.
    #[must_use]
    pub const fn separator(self) -> &'static str {
        match self {
            Self::And => "",
            Self::Child => " > ",
            Self::Descendant => " ",
            Self::AdjacentSibling => " + ",
            Self::GeneralSibling => " ~ ",
        }
    }
}

/// A binary composition `first <kind> second`.
///
/// `first` is always a simple selector; longer chains nest through `second`,
/// so `a.x > b c` is `And(a, Child(.x, Descendant(b, c)))`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combinator {
    kind: CombinatorKind,
    first: SimpleSelector,
    second: Box<Selector>,
}

impl Combinator {
    /// Create a combinator.
    #[must_use]
    pub fn new(kind: CombinatorKind, first: SimpleSelector, second: impl Into<Selector>) -> Self {
        Self {
            kind,
            first,
            second: Box::new(second.into()),
        }
    }

    /// The relationship between the operands.
    #[must_use]
    pub const fn kind(&self) -> CombinatorKind {
        self.kind
    }

    /// The left operand.
    #[must_use]
    pub const fn first(&self) -> &SimpleSelector {
        &self.first
    }

    /// The right operand.
    #[must_use]
    pub fn second(&self) -> &Selector {
        &self.second
    }

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    ///
    /// Matches right to left. `second` is tested against `element` first, and
    /// when it fails the tree is never walked. Otherwise the related element
    /// is looked up from the element `second` returned (the left-most element
    /// its chain reached) and tested against `first`.
    ///
    /// Descendant and general-sibling walks take the nearest match and do not
    /// backtrack into `second`.
    pub fn match_element<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        element: &M::Element,
    ) -> Option<M::Element> {
        let anchor = self.second.match_element(model, element)?;

        match self.kind {
            CombinatorKind::And => self.first.match_element(model, &anchor),
            CombinatorKind::Child => model
                .parent(&anchor)
                .and_then(|parent| self.first.match_element(model, &parent)),
            CombinatorKind::AdjacentSibling => model
                .previous_sibling(&anchor)
                .and_then(|sibling| self.first.match_element(model, &sibling)),
            CombinatorKind::Descendant => self.walk(model, &anchor, |e| model.parent(e)),
            CombinatorKind::GeneralSibling => {
                self.walk(model, &anchor, |e| model.previous_sibling(e))
            }
        }
    }

    /// Follow `step` from `start` until `first` matches, the chain ends, or
    /// `walk_limit()` candidates have been tried. Only a walk cut short while
    /// the chain still continues is reported.
    fn walk<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        start: &M::Element,
        step: impl Fn(&M::Element) -> Option<M::Element>,
    ) -> Option<M::Element> {
        let limit = model.walk_limit();
        let mut current = step(start);

        for _ in 0..limit {
            let candidate = current?;
            if let Some(found) = self.first.match_element(model, &candidate) {
                return Some(found);
            }
            current = step(&candidate);
        }

        if current.is_some() {
            warn_once(
                "CSS",
                &format!("{} walk gave up after {limit} steps", self.kind),
            );
        }
        None
    }

    /// Sum of both operands.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.first.specificity() + self.second.specificity()
    }

    pub(crate) fn write_css(&self, out: &mut String) {
        self.first.write_css(out);
        out.push_str(self.kind.separator());
        self.second.write_css(out);
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_css(&mut out);
        f.write_str(&out)
    }
}
