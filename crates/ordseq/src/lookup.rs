use crate::{
    error::SequenceError,
    sequence::Sequence,
    trace::{TraceEvent, TraceSink, emit},
};
use derive_more::{Deref, IntoIterator};
use std::{collections::HashMap, hash::Hash};

///
/// MatchList
///
/// Insertion-ordered, duplicate-friendly list of right-side values matched
/// for one key. Order is the right sequence's encounter order. Empty when
/// the key had no match.
///
/// Mutation is append-only; `MatchList` does not expose `DerefMut`.
///

#[repr(transparent)]
#[derive(Clone, Debug, Deref, Eq, IntoIterator, PartialEq)]
#[into_iterator(owned, ref)]
pub struct MatchList<V>(Vec<V>);

// Manual impl: deriving `Default` would require `V: Default`, but an empty
// list needs no such bound.
impl<V> Default for MatchList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MatchList<V> {
    /// Create an empty match list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a match list from an existing vector.
    #[must_use]
    pub const fn from_vec(values: Vec<V>) -> Self {
        Self(values)
    }

    /// Return the number of matched values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no value matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return an iterator over the matched values.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.0.iter()
    }

    /// Append a matched value.
    pub fn push(&mut self, value: V) {
        self.0.push(value);
    }
}

///
/// Joined
///
/// One left-outer-join output row: a single left value plus every right
/// value matched under the same key.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Joined<V1, V2> {
    pub left: V1,
    pub matches: MatchList<V2>,
}

///
/// Lookup
///
/// Hash-based left-outer join. The right sequence is drained in full into
/// a key-indexed table on first demand (it must be finite), then released;
/// the left sequence is streamed lazily and drives output order and count.
/// Neither input needs to be ordered; repeated right-side keys are all
/// retained in encounter order.
///

pub struct Lookup<A, B>
where
    A: Sequence,
    B: Sequence<Key = A::Key>,
{
    left: A,
    right: Option<B>,
    table: Option<HashMap<A::Key, MatchList<B::Value>>>,
    done: bool,
    cancelled: bool,
    trace: Option<&'static dyn TraceSink>,
}

impl<A, B> Lookup<A, B>
where
    A: Sequence,
    B: Sequence<Key = A::Key>,
{
    /// Cancel both sources. Idempotent; shared by `cancel` and `Drop`.
    fn release(&mut self) {
        if self.cancelled {
            return;
        }

        self.cancelled = true;
        self.done = true;
        self.left.cancel();
        if let Some(right) = self.right.as_mut() {
            right.cancel();
        }
    }
}

impl<A, B> Lookup<A, B>
where
    A: Sequence,
    B: Sequence<Key = A::Key>,
    A::Key: Eq + Hash,
    B::Value: Clone,
{
    #[must_use]
    pub const fn new(left: A, right: B) -> Self {
        Self {
            left,
            right: Some(right),
            table: None,
            done: false,
            cancelled: false,
            trace: None,
        }
    }

    #[must_use]
    pub const fn with_trace(mut self, trace: &'static dyn TraceSink) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Drain the right sequence into the match table. Runs once, on first
    /// demand; the right source is cancelled as soon as the build ends.
    fn build(&mut self) -> Result<(), SequenceError> {
        if self.table.is_some() {
            return Ok(());
        }

        let mut table: HashMap<A::Key, MatchList<B::Value>> = HashMap::new();
        let mut rows: usize = 0;

        if let Some(mut right) = self.right.take() {
            loop {
                match right.next_pair() {
                    Ok(Some((key, value))) => {
                        rows += 1;
                        table.entry(key).or_default().push(value);
                    }
                    Ok(None) => break,
                    Err(err) => {
                        right.cancel();
                        self.release();
                        return Err(err);
                    }
                }
            }
            right.cancel();
        }

        emit(
            self.trace,
            TraceEvent::LookupBuildFinish {
                keys: table.len(),
                rows,
            },
        );
        self.table = Some(table);

        Ok(())
    }
}

impl<A, B> Sequence for Lookup<A, B>
where
    A: Sequence,
    B: Sequence<Key = A::Key>,
    A::Key: Eq + Hash,
    B::Value: Clone,
{
    type Key = A::Key;
    type Value = Joined<A::Value, B::Value>;

    fn next_pair(&mut self) -> Result<Option<(Self::Key, Self::Value)>, SequenceError> {
        if self.done {
            return Ok(None);
        }

        self.build()?;

        match self.left.next_pair() {
            Ok(Some((key, left))) => {
                let matches = self
                    .table
                    .as_ref()
                    .and_then(|table| table.get(&key))
                    .cloned()
                    .unwrap_or_default();

                Ok(Some((key, Joined { left, matches })))
            }
            Ok(None) => {
                self.release();
                Ok(None)
            }
            Err(err) => {
                self.release();
                Err(err)
            }
        }
    }

    fn cancel(&mut self) {
        self.release();
    }
}

impl<A, B> Drop for Lookup<A, B>
where
    A: Sequence,
    B: Sequence<Key = A::Key>,
{
    fn drop(&mut self) {
        self.release();
    }
}

/// Left-outer join `a` against `b` by key. Output order and count mirror
/// `a`; memory cost is proportional to `b`.
#[must_use]
pub const fn lookup<A, B>(a: A, b: B) -> Lookup<A, B>
where
    A: Sequence,
    B: Sequence<Key = A::Key>,
    A::Key: Eq + Hash,
    B::Value: Clone,
{
    Lookup::new(a, b)
}

///
/// TESTS
///
