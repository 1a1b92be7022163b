//! Name fragmentation
//!
//! Turns one organization name into the set of search keys written for it:
//! the unmodified name plus every contiguous run of interior tokens that
//! survives the boundary rule and the stopword list.
//!
//! ```text
//!  "THE SMITH FAMILY FOUNDATION INC"
//!    tokens   THE | SMITH FAMILY FOUNDATION | INC
//!             ^article   ^interior             ^descriptor
//!    runs     SMITH, SMITH FAMILY, SMITH FAMILY FOUNDATION,
//!             FAMILY, FAMILY FOUNDATION, FOUNDATION
//! ```

use std::collections::HashSet;
use std::sync::OnceLock;

use super::boundary::{BoundaryRule, UnwantedAffixes};
use super::lexicon::Lexicon;

/// Characters trimmed from both ends of every token
const TRIM_CHARS: &[char] = &[' ', '.', ','];

/// Split a name into punctuation-trimmed, non-empty tokens
pub fn tokenize(name: &str) -> Vec<&str> {
    name.split_whitespace()
        .map(|token| token.trim_matches(TRIM_CHARS))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Fragment a name with the default lexicon and boundary rule
pub fn fragment(name: &str, stopwords: &HashSet<String>) -> HashSet<String> {
    static LEXICON: OnceLock<Lexicon> = OnceLock::new();
    static AFFIXES: OnceLock<UnwantedAffixes> = OnceLock::new();

    expand(
        name,
        stopwords,
        LEXICON.get_or_init(Lexicon::default),
        AFFIXES.get_or_init(UnwantedAffixes::default),
    )
}

/// Fragmenter bound to one run's stopword set
pub struct Fragmenter {
    stopwords: HashSet<String>,
    lexicon: Lexicon,
    boundary: Box<dyn BoundaryRule>,
}

impl Fragmenter {
    /// Create a fragmenter with the default lexicon and `UnwantedAffixes` rule
    pub fn new(stopwords: HashSet<String>) -> Self {
        Self {
            stopwords,
            lexicon: Lexicon::default(),
            boundary: Box::new(UnwantedAffixes::default()),
        }
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_boundary_rule(mut self, boundary: Box<dyn BoundaryRule>) -> Self {
        self.boundary = boundary;
        self
    }

    /// Number of stopwords this fragmenter filters against
    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    /// Compute the fragment set for a single name
    ///
    /// The result always contains `name` itself, even when it is a stopword.
    pub fn fragment(&self, name: &str) -> HashSet<String> {
        expand(name, &self.stopwords, &self.lexicon, self.boundary.as_ref())
    }
}

impl std::fmt::Debug for Fragmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fragmenter")
            .field("stopwords", &self.stopwords.len())
            .field("lexicon", &self.lexicon)
            .finish_non_exhaustive()
    }
}

/// Expand `name` into itself plus every surviving interior run
///
/// Runs are slices `tokens[i..=j]` with `start <= i <= j < end`, and
/// `end <= tokens.len()` holds by construction, so slicing cannot go out of
/// range.
fn expand(
    name: &str,
    stopwords: &HashSet<String>,
    lexicon: &Lexicon,
    boundary: &dyn BoundaryRule,
) -> HashSet<String> {
    let tokens = tokenize(name);

    let mut variants = HashSet::new();
    variants.insert(name.to_string());

    // First valid token: skip leading articles
    let start = tokens
        .iter()
        .take_while(|token| lexicon.is_article(token))
        .count();
    if start == tokens.len() {
        return variants;
    }

    // One past the last valid token: drop trailing descriptors
    let end = tokens.len()
        - tokens[start..]
            .iter()
            .rev()
            .take_while(|token| lexicon.is_descriptor(token))
            .count();

    for (i, first) in tokens.iter().enumerate().take(end).skip(start) {
        if boundary.rejects(first) {
            continue;
        }
        for (j, last) in tokens.iter().enumerate().take(end).skip(i) {
            if boundary.rejects(last) {
                continue;
            }
            let candidate = tokens[i..=j].join(" ");
            if !stopwords.contains(&candidate) {
                variants.insert(candidate);
            }
        }
    }

    variants
}
