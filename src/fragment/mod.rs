//! Name fragmentation: tokenizing, stripping and substring generation

pub mod boundary;
pub mod fragmenter;
pub mod lexicon;

pub use boundary::{BoundaryRule, BoundaryRuleKind, SingleCharacter, UnwantedAffixes};
pub use fragmenter::{fragment, tokenize, Fragmenter};
pub use lexicon::{Lexicon, ARTICLES, ORGANIZATION_DESCRIPTORS, UNWANTED_AFFIXES};
