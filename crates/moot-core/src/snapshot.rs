//! Immutable point-in-time views over recorded debate history

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::message::Message;
use crate::types::ParticipantId;

/// An immutable view of all messages recorded up to a point in time.
///
/// A snapshot owns its own copy of the message sequence plus derived indices
/// by round and by participant. Later appends to the live store never alter a
/// snapshot that has already been handed out; readers that need newer data
/// take a new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    messages: Vec<Message>,
    by_round: BTreeMap<u32, Vec<usize>>,
    by_participant: BTreeMap<ParticipantId, Vec<usize>>,
}

impl HistorySnapshot {
    /// Build a snapshot from an ordered message sequence.
    ///
    /// A message indexes under its sender and, when not broadcast, under its
    /// receiver as well.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        let mut by_round: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        let mut by_participant: BTreeMap<ParticipantId, Vec<usize>> = BTreeMap::new();

        for (pos, msg) in messages.iter().enumerate() {
            by_round.entry(msg.round).or_default().push(pos);
            by_participant
                .entry(msg.sender.clone())
                .or_default()
                .push(pos);
            if !msg.is_broadcast() && msg.receiver != msg.sender {
                by_participant
                    .entry(msg.receiver.clone())
                    .or_default()
                    .push(pos);
            }
        }

        Self {
            messages,
            by_round,
            by_participant,
        }
    }

    /// Full ordered message sequence
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages recorded in the given round, in arrival order
    pub fn round_messages(&self, round: u32) -> Vec<&Message> {
        self.by_round
            .get(&round)
            .map(|positions| positions.iter().map(|&p| &self.messages[p]).collect())
            .unwrap_or_default()
    }

    /// Messages the participant authored or received, in arrival order
    pub fn participant_messages(&self, id: &str) -> Vec<&Message> {
        self.by_participant
            .get(id)
            .map(|positions| positions.iter().map(|&p| &self.messages[p]).collect())
            .unwrap_or_default()
    }

    /// Rounds present in the snapshot, ascending
    pub fn rounds(&self) -> Vec<u32> {
        self.by_round.keys().copied().collect()
    }

    /// Position of the first message whose content or declared answer equals
    /// `answer`. Used by the voting pipeline's order-based tie-break.
    pub fn first_position_of_answer(&self, answer: &str) -> Option<usize> {
        self.messages.iter().position(|m| {
            m.declared_answer().map(|a| a == answer).unwrap_or(false) || m.content == answer
        })
    }
}
