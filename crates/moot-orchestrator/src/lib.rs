//! # moot-orchestrator
//!
//! Debate orchestration engine for Moot.
//!
//! This crate provides:
//! - [`HistoryStore`]: append-only, layered storage of debate messages with
//!   snapshots and topology-aware context views
//! - [`RoundController`]: the round state machine (gapless indices, debate
//!   and summary rounds, completion tracking)
//! - [`DebateCoordinator`]: the main loop driving turns through the
//!   configured topology and handing off to the judgment pipeline
//!
//! The coordinator is the single writer: every other component reads
//! immutable snapshots. Participant reasoning and judgment capabilities are
//! injected; see `moot-agent` for the LLM-backed implementations.

mod coordinator;
mod history;
mod rounds;

pub use coordinator::{DebateCoordinator, DebateOutcome, DebateState};
pub use history::{HistoryStatistics, HistoryStore};
pub use rounds::RoundController;
