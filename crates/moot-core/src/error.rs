//! Unified error types for Moot

use thiserror::Error;

/// Unified error type for all Moot operations
#[derive(Error, Debug)]
pub enum MootError {
    // Registration errors
    #[error("Participant already registered: {0}")]
    DuplicateParticipant(String),

    #[error("Registration closed: debate already started")]
    RegistrationClosed,

    #[error("Topology {topology} requires at least {required} participants, have {have}")]
    BelowTopologyMinimum {
        topology: String,
        required: usize,
        have: usize,
    },

    // Round errors
    #[error("Round {0} is out of range: debate is terminal")]
    RoundOutOfRange(u32),

    #[error("Cannot advance: round {0} is not complete")]
    RoundIncomplete(u32),

    #[error("Invalid round count: {0}")]
    InvalidRoundCount(u32),

    // History errors
    #[error("Sequence violation: {0}")]
    SequenceViolation(String),

    #[error("Unknown sender: {0}")]
    UnknownSender(String),

    // Turn errors
    #[error("Turn timed out for participant {participant} in round {round}")]
    TurnTimeout { participant: String, round: u32 },

    // Judgment errors
    #[error("Judgment input error: snapshot contains no messages")]
    EmptySnapshot,

    #[error("Judgment input error: no participant declared a final answer")]
    NoFinalAnswers,

    // Coordinator errors
    #[error("Debate aborted: {0}")]
    Aborted(String),

    #[error("Invalid debate state: {0}")]
    InvalidState(String),

    // Model backend errors
    #[error("Model backend error: {0}")]
    ModelBackend(String),

    #[error("Model backend unavailable: {0}")]
    ModelUnavailable(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using MootError
pub type Result<T> = std::result::Result<T, MootError>;
