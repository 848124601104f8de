use crate::{error::SequenceError, sequence::Sequence};

///
/// PullAdapter
///
/// Demand-driven stepper over one source sequence, holding the per-source
/// pull state: at most one buffered pair (the lookahead), an exhausted flag,
/// and a cancelled flag. Stepping past exhaustion is safe and keeps
/// returning `None`; cancellation is idempotent and also runs on drop, so a
/// combinator that is abandoned mid-stream still releases its sources.
///

pub struct PullAdapter<S: Sequence> {
    source: S,
    buffered: Option<(S::Key, S::Value)>,
    exhausted: bool,
    cancelled: bool,
}

impl<S: Sequence> PullAdapter<S> {
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self {
            source,
            buffered: None,
            exhausted: false,
            cancelled: false,
        }
    }

    /// Fill the lookahead buffer from the source if it is empty and the
    /// source is not exhausted. No-op otherwise.
    pub fn ensure_ready(&mut self) -> Result<(), SequenceError> {
        if self.buffered.is_some() || self.exhausted {
            return Ok(());
        }

        match self.source.next_pair()? {
            Some(pair) => self.buffered = Some(pair),
            None => self.exhausted = true,
        }

        Ok(())
    }

    /// Whether a buffered pair is waiting to be consumed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.buffered.is_some()
    }

    /// Borrow the buffered key without consuming the pair.
    #[must_use]
    pub const fn peek_key(&self) -> Option<&S::Key> {
        match &self.buffered {
            Some((key, _)) => Some(key),
            None => None,
        }
    }

    /// Consume and return the buffered pair, clearing the ready state.
    pub fn take(&mut self) -> Option<(S::Key, S::Value)> {
        self.buffered.take()
    }

    /// Produce the next pair on demand: fill the buffer, then consume it.
    /// Fused; keeps returning `None` after exhaustion or cancellation.
    pub fn step(&mut self) -> Result<Option<(S::Key, S::Value)>, SequenceError> {
        self.ensure_ready()?;

        Ok(self.take())
    }

    /// Signal the source to stop and release its resources. Idempotent;
    /// the source's own `cancel` is forwarded to exactly once. Any buffered
    /// pair is discarded.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }

        self.cancelled = true;
        self.exhausted = true;
        self.buffered = None;
        self.source.cancel();
    }
}

impl<S: Sequence> Drop for PullAdapter<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

///
/// TESTS
///
