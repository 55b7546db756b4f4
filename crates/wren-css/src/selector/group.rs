use core::fmt;

use serde::Serialize;

use super::Selector;
use super::model::SelectorModel;
use crate::error::{CssError, Result};

/// [§ 4.1 Selector Lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// "A comma-separated list of selectors represents the union of all elements
/// selected by each of the individual selectors in the selector list."
///
/// Alternatives keep their source order; there is always at least one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorGroup {
    selectors: Vec<Selector>,
}

impl SelectorGroup {
    /// Create a group from its alternatives.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::EmptySelectorGroup`] if `selectors` is empty.
    pub fn new(selectors: Vec<Selector>) -> Result<Self> {
        if selectors.is_empty() {
            return Err(CssError::EmptySelectorGroup);
        }
        Ok(Self { selectors })
    }

    /// The alternatives in source order.
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// The first alternative, in source order, that matches `element`.
    ///
    /// Callers read the specificity of the returned selector; a group has no
    /// specificity of its own.
    pub fn match_element<M: SelectorModel + ?Sized>(
        &self,
        model: &M,
        element: &M::Element,
    ) -> Option<&Selector> {
        self.selectors
            .iter()
            .find(|selector| selector.matches(model, element))
    }

    /// Whether any alternative matches `element`.
    pub fn matches<M: SelectorModel + ?Sized>(&self, model: &M, element: &M::Element) -> bool {
        self.match_element(model, element).is_some()
    }
}

impl fmt::Display for SelectorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}
