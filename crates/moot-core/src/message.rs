//! Message model: the immutable unit of exchange between participants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Receiver id used for messages addressed to every participant
pub const BROADCAST: &str = "all";

/// Metadata key under which a participant declares an interim or final answer
pub const ANSWER_KEY: &str = "answer";

/// Metadata key marking a sentinel recorded in place of a failed turn
pub const SENTINEL_KEY: &str = "sentinel";

/// Content recorded for a skipped turn
pub const SENTINEL_CONTENT: &str = "no response";

/// Message kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// An utterance produced by a participant during a round
    #[default]
    Debate,
    /// Orchestration-level message (sentinels, notices)
    System,
    /// Output of the judgment pipeline
    Judge,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debate => write!(f, "debate"),
            Self::System => write!(f, "system"),
            Self::Judge => write!(f, "judge"),
        }
    }
}

impl std::str::FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debate" => Ok(Self::Debate),
            "system" => Ok(Self::System),
            "judge" => Ok(Self::Judge),
            _ => Err(format!("Invalid message kind: {}", s)),
        }
    }
}

/// One utterance in a debate.
///
/// Messages are immutable once appended to the history store; every field is
/// fixed at creation. The free-form `metadata` map carries participant-declared
/// values such as the [`ANSWER_KEY`] entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message text
    pub content: String,
    /// Participant id of the author
    pub sender: String,
    /// Participant id of the addressee, or [`BROADCAST`]
    pub receiver: String,
    /// Round the message belongs to
    pub round: u32,
    /// Message kind
    #[serde(default)]
    pub kind: MessageKind,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
    /// Free-form key/value metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Message {
    pub fn new(
        content: impl Into<String>,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        round: u32,
    ) -> Self {
        Self {
            content: content.into(),
            sender: sender.into(),
            receiver: receiver.into(),
            round,
            kind: MessageKind::Debate,
            timestamp: Utc::now(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Declare an answer on this message
    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        self.with_metadata(ANSWER_KEY, answer)
    }

    /// Sentinel recorded when a participant's turn fails or times out.
    ///
    /// The sentinel is attributed to the participant so it still satisfies the
    /// round's expected-set.
    pub fn sentinel(sender: impl Into<String>, receiver: impl Into<String>, round: u32) -> Self {
        Self::new(SENTINEL_CONTENT, sender, receiver, round)
            .with_kind(MessageKind::System)
            .with_metadata(SENTINEL_KEY, "true")
    }

    /// Whether this message stands in for a skipped turn
    pub fn is_sentinel(&self) -> bool {
        self.metadata.contains_key(SENTINEL_KEY)
    }

    /// Whether this message is addressed to everyone
    pub fn is_broadcast(&self) -> bool {
        self.receiver == BROADCAST
    }

    /// The answer declared on this message, if any
    pub fn declared_answer(&self) -> Option<&str> {
        self.metadata.get(ANSWER_KEY).map(String::as_str)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[Round {}] {} -> {}: {}",
            self.round, self.sender, self.receiver, self.content
        )
    }
}
