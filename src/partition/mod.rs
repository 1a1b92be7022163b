//! Partitioned output
//!
//! Fragments are spread over 28 files by their leading character:
//! `1.txt` for digits and symbols, `A.txt` through `Z.txt`, and `MV.txt`
//! for everything else.

pub mod router;
pub mod writer;

pub use router::{route, Partition};
pub use writer::{OutputMode, PartitionSet};
