//! The three-tier failure taxonomy surfaced by [`crate::lab::Lab::transmute`].
//!
//! Severity increases top to bottom: a missing reagent is a registry defect
//! caught before any search runs; a missing chain is a reachability defect
//! caught after search exhausts both frontiers; a command failure is a
//! runtime defect in a reagent's own function, caught during execution and
//! only reported once the retry budget is spent.

use serde::Serialize;
use thiserror::Error;

/// An opaque record of a single reagent function's failure.
///
/// Reagent functions return `Result`, not `Option` or a bare panic, so their
/// failures are always captured here rather than unwound through
/// `catch_unwind` — the executor trusts reagents to report their own errors
/// at the boundary they control. `Serialize` so a bundle of these can be
/// emitted as the demonstration binary's `--format json` output.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct ReagentFailure {
    /// A short, stable name for the failure (e.g. the source error's type name).
    pub kind: String,
    /// A human-readable description of what went wrong.
    pub message: String,
    /// Additional context (e.g. a `Debug` rendering of the source error, or a
    /// chain position) useful when the failure is bundled into a report.
    pub context: String,
}

impl ReagentFailure {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            context: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Capture an arbitrary `std::error::Error` as a `ReagentFailure`, the
    /// way a reagent body would when propagating a failure from a fallible
    /// operation it performs internally. `kind` is caller-supplied since
    /// `std::error::Error` gives no portable way to recover a type name.
    pub fn from_error(kind: impl Into<String>, err: &(dyn std::error::Error + 'static)) -> Self {
        Self {
            kind: kind.into(),
            message: err.to_string(),
            context: format!("{err:?}"),
        }
    }
}

/// The failure kinds a [`crate::lab::Lab::transmute`] call can raise.
#[derive(Debug, Error)]
pub enum LabError {
    /// No reagent starts at the requested source substance with a satisfiable
    /// dependency set, or none ends at the requested destination substance.
    #[error("no reagent can start from or terminate at the requested substance")]
    LackingReagent,

    /// Both a starting and a terminating reagent exist, but no dependency-
    /// respecting chain connects them.
    #[error("no chain of reagents connects the requested substances")]
    NoChain,

    /// The retry budget was exhausted; every attempted chain failed during
    /// execution. Bundles every reagent failure observed across retries.
    #[error("execution failed after exhausting the retry budget: {attempts:?}")]
    CommandFailure { attempts: Vec<ReagentFailure> },
}

impl LabError {
    /// Every reagent failure recorded before this error was returned, in the
    /// order they occurred. Empty for [`LabError::LackingReagent`] and
    /// [`LabError::NoChain`], which are raised before any execution attempt.
    pub fn attempts(&self) -> &[ReagentFailure] {
        match self {
            LabError::CommandFailure { attempts } => attempts,
            LabError::LackingReagent | LabError::NoChain => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failure_lists_every_attempt() {
        let err = LabError::CommandFailure {
            attempts: vec![
                ReagentFailure::new("RuntimeError", "BAD STUFF"),
                ReagentFailure::new("RuntimeError", "BAD STUFF AGAIN"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("BAD STUFF AGAIN"));
        assert_eq!(err.attempts().len(), 2);
    }
}
