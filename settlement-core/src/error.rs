//! Error types for the settlement engine

use crate::types::SettlementStatus;
use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
///
/// Admission rejection is deliberately not represented here: a blocked
/// creation is a normal terminal outcome (`NotAccepted`), not an error.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed creation input (non-positive shares/amount, missing field)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transition target is not a direct successor of the current status
    #[error("Invalid transition for {id}: {from} -> {to}")]
    InvalidTransition {
        /// Settlement ID
        id: String,
        /// Current status
        from: SettlementStatus,
        /// Requested status
        to: SettlementStatus,
    },

    /// Transition attempted on a terminal record
    #[error("Settlement {id} is in terminal state {status}")]
    TerminalState {
        /// Settlement ID
        id: String,
        /// Terminal status of the record
        status: SettlementStatus,
    },

    /// Settlement not found
    #[error("Settlement not found: {0}")]
    SettlementNotFound(String),

    /// Invalid admin settings; the previous configuration stays in effect
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (settings file loading)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
