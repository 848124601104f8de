use crate::{error::SequenceError, sequence::Sequence};

///
/// PairMapper
///
/// Pure per-pair transform from `(K, V)` to a new pair of possibly
/// different types. Blanket-implemented for closures, so callers pass
/// `|k, v| (...)` directly.
///

pub trait PairMapper<K, V> {
    type OutKey;
    type OutValue;

    fn map(&mut self, key: K, value: V) -> (Self::OutKey, Self::OutValue);
}

impl<K, V, K2, V2, F> PairMapper<K, V> for F
where
    F: FnMut(K, V) -> (K2, V2),
{
    type OutKey = K2;
    type OutValue = V2;

    fn map(&mut self, key: K, value: V) -> (K2, V2) {
        self(key, value)
    }
}

///
/// Project
///
/// Stateless per-element projection over one sequence: no buffering, no
/// reordering, one output pair per input pair. The mapper is held as an
/// optional slot for callers wiring pipelines dynamically; demanding a
/// pair without a mapper installed fails with
/// [`SequenceError::NilProjection`] before any element of the source is
/// consumed, even on an empty source.
///

pub struct Project<S: Sequence, F> {
    source: S,
    mapper: Option<F>,
    done: bool,
    cancelled: bool,
}

impl<S: Sequence, F> Project<S, F> {
    #[must_use]
    pub const fn new(source: S, mapper: F) -> Self {
        Self {
            source,
            mapper: Some(mapper),
            done: false,
            cancelled: false,
        }
    }

    /// Construct with a mapper that may be unset. Iteration with `None`
    /// fails with [`SequenceError::NilProjection`] on first demand.
    #[must_use]
    pub const fn with_optional_mapper(source: S, mapper: Option<F>) -> Self {
        Self {
            source,
            mapper,
            done: false,
            cancelled: false,
        }
    }

    /// Cancel the source. Idempotent; shared by `cancel` and `Drop`.
    fn release(&mut self) {
        if self.cancelled {
            return;
        }

        self.cancelled = true;
        self.done = true;
        self.source.cancel();
    }
}

impl<S, F> Sequence for Project<S, F>
where
    S: Sequence,
    F: PairMapper<S::Key, S::Value>,
{
    type Key = F::OutKey;
    type Value = F::OutValue;

    fn next_pair(&mut self) -> Result<Option<(Self::Key, Self::Value)>, SequenceError> {
        if self.done {
            return Ok(None);
        }

        let Some(mapper) = self.mapper.as_mut() else {
            self.release();
            return Err(SequenceError::NilProjection);
        };

        match self.source.next_pair() {
            Ok(Some((key, value))) => Ok(Some(mapper.map(key, value))),
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

impl<S: Sequence, F> Drop for Project<S, F> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Lazily apply `prj` to every pair of `a`.
#[must_use]
pub const fn project<S, F>(a: S, prj: F) -> Project<S, F>
where
    S: Sequence,
    F: PairMapper<S::Key, S::Value>,
{
    Project::new(a, prj)
}

///
/// TESTS
///
