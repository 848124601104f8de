use crate::{
    error::SequenceError,
    pull::PullAdapter,
    sequence::Sequence,
    trace::{TraceEvent, TraceSink, emit},
};

const SOURCE_A: usize = 0;
const SOURCE_B: usize = 1;

///
/// Merge2
///
/// Binary lazy merge of two individually non-decreasing sequences into one
/// non-decreasing sequence. On equal keys side `a` wins, so the merge is
/// stable with left preference. A source key that falls below the last
/// globally yielded key aborts the merge with
/// [`SequenceError::OrderViolation`]; both sources are cancelled on every
/// termination path, including an early consumer drop.
///

pub struct Merge2<A, B>
where
    A: Sequence,
    B: Sequence<Key = A::Key, Value = A::Value>,
{
    a: PullAdapter<A>,
    b: PullAdapter<B>,
    last_key: Option<A::Key>,
    yielded: u64,
    started: bool,
    done: bool,
    trace: Option<&'static dyn TraceSink>,
}

impl<A, B> Merge2<A, B>
where
    A: Sequence,
    B: Sequence<Key = A::Key, Value = A::Value>,
    A::Key: Ord + Clone,
{
    #[must_use]
    pub const fn new(a: A, b: B) -> Self {
        Self {
            a: PullAdapter::new(a),
            b: PullAdapter::new(b),
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

    /// Cancel both adapters and make every later call return `Ok(None)`.
    fn finish(&mut self) {
        self.done = true;
        self.a.cancel();
        self.b.cancel();
    }

    fn abort_order(&mut self, source: usize) -> SequenceError {
        emit(self.trace, TraceEvent::MergeAbort { source });
        self.finish();

        SequenceError::order_violation(source)
    }

    /// Refill one side and validate the newly pulled key against the merge
    /// lower bound. Validation only applies once a first pair has been
    /// yielded; before that any key is acceptable.
    fn refill_a(&mut self) -> Result<(), SequenceError> {
        if self.a.is_ready() {
            return Ok(());
        }
        if let Err(err) = self.a.ensure_ready() {
            self.finish();
            return Err(err);
        }
        if let (Some(key), Some(last)) = (self.a.peek_key(), self.last_key.as_ref()) {
            if key < last {
                return Err(self.abort_order(SOURCE_A));
            }
        }

        Ok(())
    }

    fn refill_b(&mut self) -> Result<(), SequenceError> {
        if self.b.is_ready() {
            return Ok(());
        }
        if let Err(err) = self.b.ensure_ready() {
            self.finish();
            return Err(err);
        }
        if let (Some(key), Some(last)) = (self.b.peek_key(), self.last_key.as_ref()) {
            if key < last {
                return Err(self.abort_order(SOURCE_B));
            }
        }

        Ok(())
    }
}

impl<A, B> Sequence for Merge2<A, B>
where
    A: Sequence,
    B: Sequence<Key = A::Key, Value = A::Value>,
    A::Key: Ord + Clone,
{
    type Key = A::Key;
    type Value = A::Value;

    fn next_pair(&mut self) -> Result<Option<(Self::Key, Self::Value)>, SequenceError> {
        if self.done {
            return Ok(None);
        }
        if !self.started {
            self.started = true;
            emit(self.trace, TraceEvent::MergeStart { sources: 2 });
        }

        self.refill_a()?;
        self.refill_b()?;

        let pick_a = match (self.a.peek_key(), self.b.peek_key()) {
            (Some(key_a), Some(key_b)) => key_a <= key_b,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => {
                emit(
                    self.trace,
                    TraceEvent::MergeFinish {
                        yielded: self.yielded,
                    },
                );
                self.finish();
                return Ok(None);
            }
        };

        let taken = if pick_a { self.a.take() } else { self.b.take() };
        let Some((key, value)) = taken else {
            self.finish();
            return Err(SequenceError::invariant(
                "merge selected a side with no buffered pair",
            ));
        };

        self.last_key = Some(key.clone());
        self.yielded += 1;
        emit(
            self.trace,
            TraceEvent::MergeYield {
                source: if pick_a { SOURCE_A } else { SOURCE_B },
            },
        );

        Ok(Some((key, value)))
    }

    fn cancel(&mut self) {
        self.finish();
    }
}
