//! Failure policy — what a call does once every endpoint has been tried
//! without a usable response.
//!
//! ```text
//! Propagate → return RemoteCallFailure to the caller
//! Abort     → emit a diagnostic trace, then exit the process
//! ```

use std::fmt;

/// Process exit status used by [`FailurePolicy::Abort`].
pub const ABORT_EXIT_CODE: i32 = 1;

/// Selects how an unusable final response is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Return a typed [`RemoteCallFailure`](crate::error::RemoteCallFailure).
    #[default]
    Propagate,
    /// Log the failure and terminate the process. Suited to one-shot
    /// scripts only; the caller never regains control.
    Abort,
}

impl FailurePolicy {
    /// Map the `throw_exception` option onto a policy.
    pub fn from_throw_exception(throw_exception: bool) -> Self {
        if throw_exception {
            Self::Propagate
        } else {
            Self::Abort
        }
    }

    pub fn is_abort(self) -> bool {
        self == Self::Abort
    }
}

impl From<bool> for FailurePolicy {
    fn from(throw_exception: bool) -> Self {
        Self::from_throw_exception(throw_exception)
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Propagate => write!(f, "propagate"),
            Self::Abort => write!(f, "abort"),
        }
    }
}
