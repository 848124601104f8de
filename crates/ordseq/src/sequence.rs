use crate::error::SequenceError;
use std::iter::Fuse;

///
/// Sequence
///
/// Pull-based contract for a lazy, single-pass producer of key-value pairs.
/// A sequence may be finite or infinite and is never restartable once
/// consumed; restarting means constructing a new instance from the original
/// producer.
///
/// `cancel` is the cooperative release hook: a consumer that abandons the
/// sequence before exhaustion calls it so the producer can stop and free
/// whatever it holds. It must be idempotent. Producers with nothing to
/// release keep the default no-op.
///

pub trait Sequence {
    type Key;
    type Value;

    /// Produce the next pair, or `None` once the sequence is exhausted.
    fn next_pair(&mut self) -> Result<Option<(Self::Key, Self::Value)>, SequenceError>;

    /// Stop producing and release held resources. Idempotent.
    fn cancel(&mut self) {}
}

pub type SequenceBox<K, V> = Box<dyn Sequence<Key = K, Value = V>>;

impl<T> Sequence for Box<T>
where
    T: Sequence + ?Sized,
{
    type Key = T::Key;
    type Value = T::Value;

    fn next_pair(&mut self) -> Result<Option<(Self::Key, Self::Value)>, SequenceError> {
        self.as_mut().next_pair()
    }

    fn cancel(&mut self) {
        self.as_mut().cancel();
    }
}

/// Drain a sequence to completion, collecting every yielded pair.
pub fn collect_pairs<S>(mut seq: S) -> Result<Vec<(S::Key, S::Value)>, SequenceError>
where
    S: Sequence,
{
    let mut out = Vec::new();
    while let Some(pair) = seq.next_pair()? {
        out.push(pair);
    }

    Ok(out)
}

///
/// VecSequence
///
/// In-memory source backed by a vector of pairs, yielded in input order.
///

#[derive(Debug)]
pub struct VecSequence<K, V> {
    pairs: std::vec::IntoIter<(K, V)>,
    cancelled: bool,
}

impl<K, V> VecSequence<K, V> {
    #[must_use]
    pub fn from_pairs(pairs: Vec<(K, V)>) -> Self {
        Self {
            pairs: pairs.into_iter(),
            cancelled: false,
        }
    }
}

impl<K, V> Sequence for VecSequence<K, V> {
    type Key = K;
    type Value = V;

    fn next_pair(&mut self) -> Result<Option<(K, V)>, SequenceError> {
        if self.cancelled {
            return Ok(None);
        }

        Ok(self.pairs.next())
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }
}

///
/// IterSequence
///
/// Adapter exposing any `Iterator` of pairs through the `Sequence`
/// interface. The iterator is fused so exhaustion stays terminal.
///

#[derive(Debug)]
pub struct IterSequence<I: Iterator> {
    inner: Fuse<I>,
    cancelled: bool,
}

impl<K, V, I> IterSequence<I>
where
    I: Iterator<Item = (K, V)>,
{
    pub fn new(iter: I) -> Self {
        Self {
            inner: iter.fuse(),
            cancelled: false,
        }
    }
}

impl<K, V, I> Sequence for IterSequence<I>
where
    I: Iterator<Item = (K, V)>,
{
    type Key = K;
    type Value = V;

    fn next_pair(&mut self) -> Result<Option<(K, V)>, SequenceError> {
        if self.cancelled {
            return Ok(None);
        }

        Ok(self.inner.next())
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }
}

///
/// TESTS
///
