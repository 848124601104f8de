//! Lazy combinators over ordered key-value sequences: an order-preserving
//! merge (binary and k-way), a hash-based left-outer join, and a per-pair
//! projection. All combinators consume and produce the same [`sequence::Sequence`]
//! contract, so outputs compose as inputs without materializing streams.

pub mod error;
pub mod lookup;
pub mod merge;
pub mod project;
pub mod pull;
pub mod sequence;
pub mod trace;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// Errors and trace plumbing stay behind their module paths.
///

pub mod prelude {
    pub use crate::{
        lookup::{Joined, Lookup, MatchList, lookup},
        merge::{Merge2, MergeN, merge, merge_all},
        project::{PairMapper, Project, project},
        sequence::{IterSequence, Sequence, SequenceBox, VecSequence, collect_pairs},
    };
}
