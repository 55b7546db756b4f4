//! CSS Cascade ordering
//!
//! This module orders the rules of a stylesheet that apply to one element per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/).
//! It only reports what applies and in which order; it computes no values.

use crate::selector::{Selector, SelectorModel, Specificity};
use crate::stylesheet::{Declaration, Rule, StyleRule, Stylesheet};

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// A matched rule with its specificity for cascade ordering.
#[derive(Debug, Clone, Copy)]
pub struct MatchedRule<'a> {
    /// The alternative of the rule's group that matched.
    pub selector: &'a Selector,
    /// The specificity of `selector`.
    pub specificity: Specificity,
    /// The rule itself.
    pub rule: &'a StyleRule,
    /// Position of the rule among all rules of the stylesheet.
    pub source_index: usize,
}

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Every style rule whose selector group matches `element`, ordered by
/// ascending specificity. Rules of equal specificity stay in source order, so
/// applying the result front to back lets the later rule win.
pub fn matching_rules<'a, M: SelectorModel + ?Sized>(
    stylesheet: &'a Stylesheet,
    model: &M,
    element: &M::Element,
) -> Vec<MatchedRule<'a>> {
    let mut matched: Vec<MatchedRule<'a>> = stylesheet
        .rules()
        .iter()
        .enumerate()
        .filter_map(|(source_index, rule)| match rule {
            Rule::Style(style) => style
                .selectors()
                .match_element(model, element)
                .map(|selector| MatchedRule {
                    selector,
                    specificity: selector.specificity(),
                    rule: style,
                    source_index,
                }),
            Rule::At(_) => None,
        })
        .collect();

    // [§ 6.4.3 Specificity](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
    // Sort by specificity (lower first, so later ones override). The sort is
    // stable, which keeps source order among equals.
    matched.sort_by_key(|m| m.specificity);
    matched
}

/// [§ 6.4.2 Importance](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// The declarations that apply to `element`, in the order they should be
/// applied: all normal declarations of the matching rules, then all
/// `!important` ones, each in [`matching_rules`] order. Declarations without
/// terms are skipped.
pub fn cascaded_declarations<'a, M: SelectorModel + ?Sized>(
    stylesheet: &'a Stylesheet,
    model: &M,
    element: &M::Element,
) -> Vec<&'a Declaration> {
    let matched = matching_rules(stylesheet, model, element);
    let declarations = || {
        matched
            .iter()
            .flat_map(|m| m.rule.declarations())
            .filter(|d| !d.terms().is_empty())
    };

    declarations()
        .filter(|d| !d.important())
        .chain(declarations().filter(|d| d.important()))
        .collect()
}
