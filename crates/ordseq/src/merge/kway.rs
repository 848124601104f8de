use crate::{
    error::SequenceError,
    pull::PullAdapter,
    sequence::Sequence,
    trace::{TraceEvent, TraceSink, emit},
};

///
/// MergeN
///
/// K-way lazy merge over a list of individually non-decreasing sequences.
/// Each round refills every source that has no buffered pair, scans left to
/// right for the minimum buffered key, and yields from the winner. On equal
/// keys the lowest list index wins: the caller-supplied source order defines
/// tie-break priority outright, so `merge_all(vec![a, b])` agrees with the
/// binary merge of `a` and `b`.
///
/// The chosen key is validated against the last globally yielded key; a
/// smaller key aborts the merge with [`SequenceError::OrderViolation`]
/// naming the winning source. All adapters are cancelled on every
/// termination path.
///

pub struct MergeN<S: Sequence> {
    slots: Vec<PullAdapter<S>>,
    source_count: usize,
    last_key: Option<S::Key>,
    yielded: u64,
    started: bool,
    done: bool,
    trace: Option<&'static dyn TraceSink>,
}

impl<S> MergeN<S>
where
    S: Sequence,
    S::Key: Ord + Clone,
{
    #[must_use]
    pub fn new(sources: Vec<S>) -> Self {
        let slots: Vec<_> = sources.into_iter().map(PullAdapter::new).collect();
        let source_count = slots.len();

        Self {
            slots,
            source_count,
            last_key: None,
            yielded: 0,
            started: false,
            done: false,
            trace: None,
        }
    }

    #[must_use]
    pub const fn with_trace(mut self, trace: &'static dyn TraceSink) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Cancel every adapter and make every later call return `Ok(None)`.
    fn finish(&mut self) {
        self.done = true;
        for slot in &mut self.slots {
            slot.cancel();
        }
    }

    /// Refill every source without a buffered pair.
    fn refill_all(&mut self) -> Result<(), SequenceError> {
        for slot in &mut self.slots {
            if slot.is_ready() {
                continue;
            }
            slot.ensure_ready()?;
        }

        Ok(())
    }

    /// Left-to-right scan for the lowest buffered key. Strict comparison
    /// keeps the lowest index on ties.
    fn min_ready_index(&self) -> Option<usize> {
        let mut winner: Option<usize> = None;

        for index in 0..self.slots.len() {
            let Some(key) = self.slots[index].peek_key() else {
                continue;
            };
            let better = match winner {
                None => true,
                Some(at) => match self.slots[at].peek_key() {
                    Some(best) => key < best,
                    None => true,
                },
            };
            if better {
                winner = Some(index);
            }
        }

        winner
    }
}

impl<S> Sequence for MergeN<S>
where
    S: Sequence,
    S::Key: Ord + Clone,
{
    type Key = S::Key;
    type Value = S::Value;

    fn next_pair(&mut self) -> Result<Option<(Self::Key, Self::Value)>, SequenceError> {
        if self.done {
            return Ok(None);
        }
        if self.slots.len() != self.source_count {
            self.finish();
            return Err(SequenceError::invariant(
                "per-source state list changed length mid-merge",
            ));
        }
        if !self.started {
            self.started = true;
            emit(
                self.trace,
                TraceEvent::MergeStart {
                    sources: self.source_count,
                },
            );
        }

        if let Err(err) = self.refill_all() {
            self.finish();
            return Err(err);
        }

        let Some(winner) = self.min_ready_index() else {
            emit(
                self.trace,
                TraceEvent::MergeFinish {
                    yielded: self.yielded,
                },
            );
            self.finish();
            return Ok(None);
        };

        if let (Some(key), Some(last)) = (self.slots[winner].peek_key(), self.last_key.as_ref()) {
            if key < last {
                emit(self.trace, TraceEvent::MergeAbort { source: winner });
                self.finish();
                return Err(SequenceError::order_violation(winner));
            }
        }

        let Some((key, value)) = self.slots[winner].take() else {
            self.finish();
            return Err(SequenceError::invariant(
                "merge scan selected a source with no buffered pair",
            ));
        };

        self.last_key = Some(key.clone());
        self.yielded += 1;
        emit(self.trace, TraceEvent::MergeYield { source: winner });

        Ok(Some((key, value)))
    }

    fn cancel(&mut self) {
        self.finish();
    }
}
