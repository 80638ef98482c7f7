//! The Outcome algebra — the typed success/failure result every Op produces.

use std::fmt;

/// A tagged union of exactly one of two variants. A consumer can always
/// discriminate by [`Outcome::is_success`] or by matching.
///
/// `T` and `F` are independent — a given Op declares both on its own terms.
#[derive(Debug, Clone)]
pub enum Outcome<T, F: FailureTag> {
    /// The Op completed normally, carrying a payload of arbitrary type `T`.
    Success(T),
    /// The Op did not complete as requested. `tag` is the enumerated failure
    /// label; `debug` is an optional free-form string for diagnostics, not
    /// meant for exhaustive matching.
    Failure {
        /// The failure tag.
        tag: F,
        /// Optional free-form debug string (e.g. an exception message).
        debug: Option<String>,
    },
}

impl<T, F: FailureTag> Outcome<T, F> {
    /// True if this is the `Success` variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// True if this is a `Failure` whose tag is the distinguished
    /// `canceled` tag.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Outcome::Failure { tag, .. } if tag.is_canceled())
    }

    /// Map the success payload, leaving a failure untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, F> {
        match self {
            Outcome::Success(v) => Outcome::Success(f(v)),
            Outcome::Failure { tag, debug } => Outcome::Failure { tag, debug },
        }
    }
}

/// The contract every Op's declared failure type must satisfy.
///
/// An Op's failure type must enumerate every failure tag `run` can
/// produce — the exhaustiveness contract from the Op specification.
/// Every such type must also be able to produce the two distinguished
/// tags every Op shares: `canceled` (the user explicitly aborted) and
/// `unknown_error` (the catch-all for an uncaught exception inside `run`).
///
/// Implementations are expected to be `#[non_exhaustive]` `thiserror`
/// enums with a `Canceled` and an `UnknownError(String)` variant among
/// their own domain-specific tags.
pub trait FailureTag: fmt::Debug + fmt::Display + Clone + Send + Sync + 'static {
    /// Construct the distinguished "user canceled" tag.
    fn canceled() -> Self;

    /// Construct the distinguished catch-all tag, carrying the message of
    /// whatever was caught.
    fn unknown_error(message: impl Into<String>) -> Self;

    /// True if this value is the distinguished "user canceled" tag.
    fn is_canceled(&self) -> bool;
}

/// The minimal failure tag for Ops that have no domain-specific failure
/// modes of their own — just the two distinguished tags every Op shares.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreFailure {
    /// The user explicitly aborted the operation.
    #[error("canceled")]
    Canceled,
    /// An uncaught exception escaped `run`.
    #[error("unknown error: {0}")]
    UnknownError(String),
}

impl FailureTag for CoreFailure {
    fn canceled() -> Self {
        Self::Canceled
    }

    fn unknown_error(message: impl Into<String>) -> Self {
        Self::UnknownError(message.into())
    }

    fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}
