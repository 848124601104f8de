//! Lazy order-preserving merges over non-decreasing sequences.

mod binary;
mod kway;


pub use binary::Merge2;
pub use kway::MergeN;

use crate::sequence::Sequence;

/// Merge two non-decreasing sequences into one non-decreasing sequence.
/// On equal keys the pair from `a` is yielded first.
#[must_use]
pub const fn merge<A, B>(a: A, b: B) -> Merge2<A, B>
where
    A: Sequence,
    B: Sequence<Key = A::Key, Value = A::Value>,
    A::Key: Ord + Clone,
{
    Merge2::new(a, b)
}

/// Merge any number of non-decreasing sequences into one non-decreasing
/// sequence. On equal keys the source with the lowest list index wins, so
/// the caller-supplied order defines tie-break priority.
#[must_use]
pub fn merge_all<S>(sources: Vec<S>) -> MergeN<S>
where
    S: Sequence,
    S::Key: Ord + Clone,
{
    MergeN::new(sources)
}
