//! Combinator tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect
//! combinator semantics. Events carry only counts and source indices,
//! never keys or values.

///
/// TraceSink
///

pub trait TraceSink: Send + Sync {
    fn on_event(&self, event: TraceEvent);
}

///
/// TraceEvent
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TraceEvent {
    /// Lookup finished buffering its right side.
    LookupBuildFinish { keys: usize, rows: usize },
    /// A merge aborted on an order violation from `source`.
    MergeAbort { source: usize },
    /// A merge reached its clean end.
    MergeFinish { yielded: u64 },
    /// A merge produced its first demand-driven round.
    MergeStart { sources: usize },
    /// A merge yielded one pair from `source`.
    MergeYield { source: usize },
}

/// Emit an event into an optional sink.
pub(crate) fn emit(trace: Option<&'static dyn TraceSink>, event: TraceEvent) {
    if let Some(sink) = trace {
        sink.on_event(event);
    }
}
