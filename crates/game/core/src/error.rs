//! Common error infrastructure for vanguard-core.
//!
//! Every rejection surfaced by the engine carries two classifications:
//!
//! - an [`ErrorKind`], the stable taxonomy clients branch on
//!   (`NotFound`, `InvalidPhase`, `NotYourTurn`, ...), and
//! - an [`ErrorSeverity`], which tells the caller whether retrying with a
//!   different command can succeed.
//!
//! Domain-specific errors (e.g. [`ActionError`](crate::action::ActionError),
//! [`StateError`](crate::state::StateError)) live next to the code that
//! raises them and implement [`GameError`].

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the same player can try another command.
    ///
    /// Examples: destination occupied, no action points left
    Recoverable,

    /// Validation error - the command itself is malformed or references
    /// something that does not exist.
    ///
    /// Examples: unknown piece id, deck of the wrong size
    Validation,

    /// Internal error - the engine produced an inconsistent state.
    ///
    /// Examples: piece present in two locations, queue numbering gap
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Rejection taxonomy shared by every command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// A referenced piece or game does not exist.
    NotFound,
    /// The command is not accepted in the current phase.
    InvalidPhase,
    /// The caller is not the current player.
    NotYourTurn,
    /// No action points or ability charges remain.
    OutOfResource,
    /// The target violates a zone, ownership, occupancy or slot rule.
    IllegalTarget,
    /// The command is structurally wrong (counts, duplicates, missing fields).
    MalformedCommand,
    /// The engine broke one of its own invariants.
    Internal,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidPhase => "invalid_phase",
            Self::NotYourTurn => "not_your_turn",
            Self::OutOfResource => "out_of_resource",
            Self::IllegalTarget => "illegal_target",
            Self::MalformedCommand => "malformed_command",
            Self::Internal => "internal",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common trait for all vanguard-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Keep `error_code` stable; clients match on it
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the rejection category of this error.
    fn kind(&self) -> ErrorKind;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
