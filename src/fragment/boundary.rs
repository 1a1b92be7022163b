//! Boundary exclusion rules
//!
//! A candidate fragment is skipped when its first or last token is rejected
//! by the fragmenter's `BoundaryRule`. Two rules are provided and they are
//! not equivalent: `UnwantedAffixes` rejects a small word list (AND, OF, THE)
//! while `SingleCharacter` rejects any one-character token. Exactly one is
//! active per fragmenter.

use serde::Deserialize;
use std::collections::HashSet;

use super::lexicon::UNWANTED_AFFIXES;

/// Predicate deciding whether a token may open or close a fragment
pub trait BoundaryRule: Send + Sync {
    /// Returns true if `token` must not sit at either end of a fragment
    fn rejects(&self, token: &str) -> bool;
}

/// Rejects tokens from a fixed affix list
#[derive(Debug, Clone)]
pub struct UnwantedAffixes {
    affixes: HashSet<String>,
}

impl UnwantedAffixes {
    pub fn new<I>(affixes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            affixes: affixes.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for UnwantedAffixes {
    fn default() -> Self {
        Self::new(UNWANTED_AFFIXES.iter().copied())
    }
}

impl BoundaryRule for UnwantedAffixes {
    fn rejects(&self, token: &str) -> bool {
        self.affixes.contains(token)
    }
}

/// Rejects every single-character token
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleCharacter;

impl BoundaryRule for SingleCharacter {
    fn rejects(&self, token: &str) -> bool {
        let mut chars = token.chars();
        chars.next().is_some() && chars.next().is_none()
    }
}

/// Configurable selection of the boundary rule
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryRuleKind {
    /// Skip fragments that start or end with AND, OF or THE
    #[default]
    UnwantedAffixes,
    /// Skip fragments that start or end with a one-character token
    SingleCharacter,
}

impl BoundaryRuleKind {
    /// Build the rule, using `affixes` for `UnwantedAffixes` when given
    pub fn build(self, affixes: Option<&[String]>) -> Box<dyn BoundaryRule> {
        match self {
            BoundaryRuleKind::UnwantedAffixes => match affixes {
                Some(list) => Box::new(UnwantedAffixes::new(list.iter().cloned())),
                None => Box::new(UnwantedAffixes::default()),
            },
            BoundaryRuleKind::SingleCharacter => Box::new(SingleCharacter),
        }
    }
}
