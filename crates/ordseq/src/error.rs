///
/// SequenceError
///
/// Structured failure signal shared by every combinator in the crate.
/// All variants are fatal: no combinator catches or retries internally,
/// and nothing after the point of detection is produced. Display strings
/// exist for operator convenience; callers should match on variants.
///

// Implemented by hand rather than via `thiserror` because the derive
// unconditionally treats a field named `source` as the error source, and
// `usize` is not an `Error`.
#[remain::sorted]
#[derive(Debug)]
pub enum SequenceError {
    /// Internal bookkeeping became inconsistent. Indicates a programming
    /// defect in this crate, not a problem with the input data.
    InvariantViolation { message: String },

    /// A projection was demanded without a mapping function installed.
    /// Raised before any element of the source is consumed.
    NilProjection,

    /// A merge source produced a key smaller than the last globally yielded
    /// key. `source` is the zero-based index of the offending source in the
    /// caller-supplied order.
    OrderViolation { source: usize },
}

impl core::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvariantViolation { message } => {
                write!(f, "sequence invariant violation: {message}")
            }
            Self::NilProjection => {
                write!(f, "projection demanded without a mapping function")
            }
            Self::OrderViolation { source } => {
                write!(
                    f,
                    "merge source {source} yielded a key below the merge lower bound"
                )
            }
        }
    }
}

impl std::error::Error for SequenceError {}

impl SequenceError {
    /// Construct an invariant violation.
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Construct an order violation for the given source index.
    #[must_use]
    pub(crate) const fn order_violation(source: usize) -> Self {
        Self::OrderViolation { source }
    }

    #[must_use]
    pub const fn is_order_violation(&self) -> bool {
        matches!(self, Self::OrderViolation { .. })
    }

    #[must_use]
    pub const fn is_nil_projection(&self) -> bool {
        matches!(self, Self::NilProjection)
    }
}
