//! # moot-core
//!
//! Core types for the Moot debate orchestration engine.
//!
//! Moot runs structured, multi-round exchanges among independent reasoning
//! participants over a question with a verifiable answer, then adjudicates a
//! final verdict. This crate holds the shared vocabulary:
//!
//! - The immutable [`Message`] model and [`HistorySnapshot`] views
//! - Topology, role, and round types
//! - Judgment result types shared by both adjudication strategies
//! - Capability traits implemented by external participants and judges
//! - Validated configuration values and the `moot.toml` settings layer
//!
//! The orchestration logic itself lives in `moot-orchestrator`; judgment
//! strategies in `moot-judge`.

mod capability;
mod config;
mod error;
mod judgment;
mod message;
mod report;
mod snapshot;
mod types;

pub use capability::{Adjudicator, Participant, Validator};
pub use config::{
    DebateConfig, JudgeMode, JudgeSettings, ModelConfig, ParticipantSpec, ReportSettings,
    Settings, TurnPolicy,
};
pub use error::{MootError, Result};
pub use judgment::{
    Adjudication, Ballot, Candidate, CandidateTally, FinalAnswers, JudgmentResult, Verdict,
    VoteRecord, VoteTally,
};
pub use message::{
    Message, MessageKind, ANSWER_KEY, BROADCAST, SENTINEL_CONTENT, SENTINEL_KEY,
};
pub use report::{
    DebateReport, ReportDebateConfig, ReportFinalResult, ReportHistory,
};
pub use snapshot::HistorySnapshot;
pub use types::{
    ParticipantId, ParticipantRecord, ParticipantSummary, Progress, Role, Round, RoundKind,
    RoundStatus, RoundSummary, Topology, Turn,
};
