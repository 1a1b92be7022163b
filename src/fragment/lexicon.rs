//! Fixed token tables used when stripping a name down to its interior
//!
//! Articles may only be removed from the front of a name and organization
//! descriptors only from the back. Both are matched against punctuation
//! trimmed tokens, so the dotted spellings below only matter when a token
//! carries interior punctuation (e.g. "CO.,LTD.").

use std::collections::HashSet;

/// Articles stripped from the front of a name
pub const ARTICLES: &[&str] = &["AN", "THE", "LE", "LES"];

/// Organization descriptors stripped from the back of a name
pub const ORGANIZATION_DESCRIPTORS: &[&str] = &[
    "A",
    "ASSOCIACAO",
    "ASSOCIATION",
    "CO",
    "CO.,LTD.",
    "COMPANY",
    "CORP",
    "CORPORATION",
    "FIRMA",
    "GMBH",
    "INC",
    "INC.",
    "INCORPORATED",
    "LTD",
    "LTD.",
    "LLC",
    "LTDA",
    "O",
    "OOO",
    "SP",
    "W",
    "Z",
];

/// Words that may not open or close a fragment
pub const UNWANTED_AFFIXES: &[&str] = &["AND", "OF", "THE"];

/// Article and descriptor tables for one fragmenter
#[derive(Debug, Clone)]
pub struct Lexicon {
    articles: HashSet<String>,
    descriptors: HashSet<String>,
}

impl Lexicon {
    /// Build a lexicon from explicit token lists
    pub fn new<A, D>(articles: A, descriptors: D) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            articles: articles.into_iter().map(Into::into).collect(),
            descriptors: descriptors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_article(&self, token: &str) -> bool {
        self.articles.contains(token)
    }

    pub fn is_descriptor(&self, token: &str) -> bool {
        self.descriptors.contains(token)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(
            ARTICLES.iter().copied(),
            ORGANIZATION_DESCRIPTORS.iter().copied(),
        )
    }
}
