//! Shared test fixtures: instrumented sources for cancellation and
//! error-propagation assertions.

use crate::{error::SequenceError, sequence::Sequence};
use std::{cell::Cell, rc::Rc};

///
/// SourceProbe
///
/// Shared observation point for one [`ProbeSequence`]. Tests keep the `Rc`
/// and inspect it after the combinator under test has consumed or dropped
/// the source.
///

#[derive(Debug, Default)]
pub(crate) struct SourceProbe {
    pulls: Cell<usize>,
    cancels: Cell<usize>,
    exhausted: Cell<bool>,
}

impl SourceProbe {
    pub(crate) fn pulls(&self) -> usize {
        self.pulls.get()
    }

    pub(crate) fn cancels(&self) -> usize {
        self.cancels.get()
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.exhausted.get()
    }
}

///
/// ProbeSequence
///
/// Counting source: records every pull and every cancel so tests can
/// confirm a combinator released it without driving it to exhaustion.
///

pub(crate) struct ProbeSequence<K, V> {
    pairs: std::vec::IntoIter<(K, V)>,
    probe: Rc<SourceProbe>,
    cancelled: bool,
}

impl<K, V> ProbeSequence<K, V> {
    pub(crate) fn new(pairs: Vec<(K, V)>) -> (Self, Rc<SourceProbe>) {
        let probe = Rc::new(SourceProbe::default());
        let seq = Self {
            pairs: pairs.into_iter(),
            probe: Rc::clone(&probe),
            cancelled: false,
        };

        (seq, probe)
    }
}

impl<K, V> Sequence for ProbeSequence<K, V> {
    type Key = K;
    type Value = V;

    fn next_pair(&mut self) -> Result<Option<(K, V)>, SequenceError> {
        if self.cancelled {
            return Ok(None);
        }

        self.probe.pulls.set(self.probe.pulls.get() + 1);
        let next = self.pairs.next();
        if next.is_none() {
            self.probe.exhausted.set(true);
        }

        Ok(next)
    }

    fn cancel(&mut self) {
        self.cancelled = true;
        self.probe.cancels.set(self.probe.cancels.get() + 1);
    }
}

///
/// FailingSequence
///
/// Source that yields pairs until a configured position, then fails.
///

pub(crate) struct FailingSequence<K, V> {
    pairs: std::vec::IntoIter<(K, V)>,
    index: usize,
    fail_at: usize,
}

impl<K, V> FailingSequence<K, V> {
    pub(crate) fn new(pairs: Vec<(K, V)>, fail_at: usize) -> Self {
        Self {
            pairs: pairs.into_iter(),
            index: 0,
            fail_at,
        }
    }
}

impl<K, V> Sequence for FailingSequence<K, V> {
    type Key = K;
    type Value = V;

    fn next_pair(&mut self) -> Result<Option<(K, V)>, SequenceError> {
        if self.index == self.fail_at {
            return Err(SequenceError::invariant("forced source failure"));
        }
        self.index += 1;

        Ok(self.pairs.next())
    }
}
