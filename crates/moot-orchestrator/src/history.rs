//! Append-only, layered storage of debate messages
//!
//! The store is the single shared mutable resource of a debate instance. Only
//! the coordinator appends; every other component reads snapshots or the
//! read-only accessors here. Messages are indexed by round and by participant
//! at append time, atomically with respect to readers: a reader can never
//! observe a stored but partially-indexed message.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use moot_core::{
    HistorySnapshot, Message, MessageKind, MootError, ParticipantId, Result, RoundSummary,
    Topology,
};

/// Per-debate message totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStatistics {
    pub total_messages: usize,
    pub per_round: BTreeMap<u32, usize>,
    pub per_participant: BTreeMap<ParticipantId, usize>,
}

/// Append-only history store for one debate instance
#[derive(Debug, Default)]
pub struct HistoryStore {
    messages: Vec<Message>,
    by_round: BTreeMap<u32, Vec<usize>>,
    by_participant: BTreeMap<ParticipantId, Vec<usize>>,
    senders: BTreeSet<ParticipantId>,
    active_round: Option<u32>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow a participant id as a message sender
    pub fn register_sender(&mut self, id: impl Into<ParticipantId>) {
        self.senders.insert(id.into());
    }

    /// Open the given round for appends.
    ///
    /// Rounds must open gaplessly: 0 first, then each successor exactly once.
    pub fn begin_round(&mut self, index: u32) -> Result<()> {
        let valid = match self.active_round {
            None => index == 0,
            Some(current) => index == current + 1,
        };
        if !valid {
            return Err(MootError::SequenceViolation(format!(
                "cannot open round {} after {:?}",
                index, self.active_round
            )));
        }
        self.active_round = Some(index);
        Ok(())
    }

    pub fn active_round(&self) -> Option<u32> {
        self.active_round
    }

    /// Append a message in arrival order.
    ///
    /// Fails if the sender is unregistered or the message's round does not
    /// match the active round; rejected messages are never stored.
    pub fn append(&mut self, message: Message) -> Result<()> {
        if !self.senders.contains(&message.sender) {
            return Err(MootError::UnknownSender(message.sender));
        }
        match self.active_round {
            Some(round) if round == message.round => {}
            active => {
                return Err(MootError::SequenceViolation(format!(
                    "message for round {} while active round is {:?}",
                    message.round, active
                )));
            }
        }

        let pos = self.messages.len();
        self.by_round.entry(message.round).or_default().push(pos);
        self.by_participant
            .entry(message.sender.clone())
            .or_default()
            .push(pos);
        if !message.is_broadcast() && message.receiver != message.sender {
            self.by_participant
                .entry(message.receiver.clone())
                .or_default()
                .push(pos);
        }
        debug!("Recorded {}", message);
        self.messages.push(message);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Full ordered message sequence
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Immutable point-in-time view; later appends never alter it
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot::from_messages(self.messages.clone())
    }

    /// The ordered subsequence of messages visible to a participant under the
    /// topology's visibility rule.
    ///
    /// - single: the full global history
    /// - dual: messages the participant sent or received, plus broadcast and
    ///   system messages
    /// - multi: every message recorded so far; `window` limits the view to
    ///   the last N rounds when set
    pub fn get_context(
        &self,
        participant: &str,
        topology: Topology,
        window: Option<u32>,
    ) -> Vec<Message> {
        let visible = |msg: &Message| match topology {
            Topology::Single => true,
            Topology::Dual => {
                msg.sender == participant
                    || msg.receiver == participant
                    || msg.is_broadcast()
                    || msg.kind == MessageKind::System
            }
            Topology::Multi => match (window, self.active_round) {
                (Some(window), Some(current)) => {
                    msg.round + window > current
                }
                _ => true,
            },
        };

        self.messages.iter().filter(|m| visible(m)).cloned().collect()
    }

    /// Aggregate one round's messages plus any interim answers declared in it
    pub fn round_summary(&self, round: u32) -> RoundSummary {
        let mut summary = RoundSummary {
            round,
            ..RoundSummary::default()
        };

        let Some(positions) = self.by_round.get(&round) else {
            return summary;
        };
        for &pos in positions {
            let msg = &self.messages[pos];
            summary.message_count += 1;
            summary
                .messages_by_sender
                .entry(msg.sender.clone())
                .or_default()
                .push(msg.clone());
            if let Some(answer) = msg.declared_answer() {
                summary
                    .interim_answers
                    .insert(msg.sender.clone(), answer.to_string());
            }
        }
        summary
    }

    /// Message totals per round and per authoring participant
    pub fn statistics(&self) -> HistoryStatistics {
        let mut stats = HistoryStatistics {
            total_messages: self.messages.len(),
            ..HistoryStatistics::default()
        };
        for msg in &self.messages {
            *stats.per_round.entry(msg.round).or_default() += 1;
            *stats.per_participant.entry(msg.sender.clone()).or_default() += 1;
        }
        stats
    }
}
