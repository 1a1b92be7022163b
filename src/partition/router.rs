//! Leading-character routing of fragments to output partitions

use std::fmt;

const LETTER_KEYS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z",
];

/// One of the 28 output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    /// Digits and symbols sorting before `A` (key "1")
    Numeric,
    /// Uppercase ASCII letter, stored as its offset from `A`
    Letter(u8),
    /// Everything else: lowercase, non-ASCII, symbols after `Z` (key "MV")
    Other,
}

impl Partition {
    /// Total number of partitions
    pub const COUNT: usize = 28;

    /// All partitions in file-table order: "1", A..Z, "MV"
    pub fn all() -> impl Iterator<Item = Partition> {
        std::iter::once(Partition::Numeric)
            .chain((0..26u8).map(Partition::Letter))
            .chain(std::iter::once(Partition::Other))
    }

    /// Partition key as used in file names and statistics
    pub fn key(self) -> &'static str {
        match self {
            Partition::Numeric => "1",
            Partition::Letter(offset) => LETTER_KEYS[usize::from(offset) % 26],
            Partition::Other => "MV",
        }
    }

    /// Output file name for this partition
    pub fn file_name(self) -> String {
        format!("{}.txt", self.key())
    }

    /// Position in `Partition::all()`
    pub fn index(self) -> usize {
        match self {
            Partition::Numeric => 0,
            Partition::Letter(offset) => 1 + usize::from(offset % 26),
            Partition::Other => Self::COUNT - 1,
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Route a fragment by its first character
///
/// The empty string routes to `Numeric`, since it sorts before `A`.
pub fn route(fragment: &str) -> Partition {
    match fragment.chars().next() {
        Some(c @ 'A'..='Z') => Partition::Letter(c as u8 - b'A'),
        Some(c) if c < 'A' => Partition::Numeric,
        Some(_) => Partition::Other,
        None => Partition::Numeric,
    }
}
