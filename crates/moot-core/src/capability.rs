//! Capability interfaces implemented by external collaborators.
//!
//! The orchestration core never branches on who implements these traits: any
//! type that supplies the stated contract qualifies. Implementations live
//! outside the core (see the `moot-agent` crate for the LLM-backed ones).

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::judgment::{Adjudication, Ballot, Candidate};
use crate::message::Message;
use crate::snapshot::HistorySnapshot;
use crate::types::{ParticipantId, Role, Turn};

/// A debate participant.
///
/// `generate_response` must be safe to retry after a timeout: the coordinator
/// may call it again for the same turn, and no side effect beyond the returned
/// message is assumed.
#[async_trait]
pub trait Participant: Send {
    /// The participant's unique id
    fn id(&self) -> &str;

    /// The participant's role
    fn role(&self) -> Role;

    /// Produce the next message given the visible context and turn info.
    ///
    /// The returned message must carry the acting participant as sender and
    /// the turn's round number; anything else is rejected as a sequence
    /// violation and the turn is treated as failed.
    async fn generate_response(&mut self, context: &[Message], turn: &Turn) -> Result<Message>;

    /// Observe a recorded message (own or received) to maintain internal state
    async fn update_state(&mut self, message: &Message) -> Result<()>;
}

/// Direct adjudication capability: one evaluator, one verdict
#[async_trait]
pub trait Adjudicator: Send + Sync {
    /// Evaluate the finalized debate and produce a verdict with rationale
    async fn evaluate(
        &self,
        snapshot: &HistorySnapshot,
        final_answers: &BTreeMap<ParticipantId, Option<String>>,
    ) -> Result<Adjudication>;
}

/// Voting capability: one validator contributing a single weighted vote
#[async_trait]
pub trait Validator: Send + Sync {
    /// Stable validator id, recorded in the tally
    fn id(&self) -> &str;

    /// Cast a vote over the candidate answers extracted from the snapshot
    async fn vote(&self, snapshot: &HistorySnapshot, candidates: &[Candidate]) -> Result<Ballot>;
}
