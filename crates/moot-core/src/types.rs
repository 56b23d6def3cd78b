//! Core type definitions for Moot debate orchestration

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::message::Message;

/// Participant identifier, unique within one debate instance
pub type ParticipantId = String;

/// Interaction pattern of a debate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// One participant refining its own reasoning across rounds
    #[default]
    Single,
    /// Solver/critic pair exchanging messages in turn
    Dual,
    /// Broadcast group: every participant addresses all others each round
    Multi,
}

impl Topology {
    /// Minimum number of registered participants required to start
    pub fn min_participants(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Dual => 2,
            Self::Multi => 2,
        }
    }

    /// Whether this topology admits more participants than the minimum
    pub fn is_open_ended(&self) -> bool {
        matches!(self, Self::Multi)
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Dual => write!(f, "dual"),
            Self::Multi => write!(f, "multi"),
        }
    }
}

impl std::str::FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "self" => Ok(Self::Single),
            "dual" => Ok(Self::Dual),
            "multi" => Ok(Self::Multi),
            _ => Err(format!("Invalid topology: {}. Use single, dual, or multi.", s)),
        }
    }
}

/// Role a participant plays within its topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Proposes solutions (dual topology)
    Solver,
    /// Challenges the solver's reasoning (dual topology)
    Critic,
    /// One voice in a broadcast panel (multi topology)
    Expert,
    /// Self-debating participant (single topology)
    #[serde(rename = "self")]
    Reflector,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Solver => write!(f, "solver"),
            Self::Critic => write!(f, "critic"),
            Self::Expert => write!(f, "expert"),
            Self::Reflector => write!(f, "self"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "solver" => Ok(Self::Solver),
            "critic" => Ok(Self::Critic),
            "expert" => Ok(Self::Expert),
            "self" | "reflector" => Ok(Self::Reflector),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Registration record for one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Unique participant id
    pub id: ParticipantId,
    /// Topology-specific role
    pub role: Role,
    /// Registration order; determines default turn order
    pub order: usize,
}

impl ParticipantRecord {
    pub fn new(id: impl Into<ParticipantId>, role: Role, order: usize) -> Self {
        Self {
            id: id.into(),
            role,
            order,
        }
    }
}

/// Kind of a round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundKind {
    /// Regular exchange round
    #[default]
    Debate,
    /// Consolidation round before judgment
    Summary,
}

impl std::fmt::Display for RoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debate => write!(f, "debate"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// Status of a round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    #[default]
    Pending,
    Active,
    Complete,
}

/// One synchronized cycle in which every expected participant acts once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Monotonic index, starting at 0
    pub index: u32,
    /// Debate or summary round
    pub kind: RoundKind,
    /// Participants expected to act this round
    pub expected: BTreeSet<ParticipantId>,
    /// Participants that have acted this round
    pub acted: BTreeSet<ParticipantId>,
    /// Round status
    pub status: RoundStatus,
}

impl Round {
    pub fn new(index: u32, kind: RoundKind, expected: BTreeSet<ParticipantId>) -> Self {
        Self {
            index,
            kind,
            expected,
            acted: BTreeSet::new(),
            status: RoundStatus::Active,
        }
    }

    /// True once every expected participant has acted
    pub fn is_complete(&self) -> bool {
        self.expected.is_subset(&self.acted)
    }
}

/// Context a participant receives for one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Round index
    pub round: u32,
    /// Round kind; summary rounds ask for a consolidated final answer
    pub kind: RoundKind,
    /// The acting participant's role
    pub role: Role,
    /// Addressee for the produced message (a participant id or broadcast)
    pub receiver: String,
}

/// Debate progress information
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current_round: u32,
    pub total_rounds: u32,
    pub remaining_rounds: u32,
    pub percent_complete: f32,
}

/// Aggregated view of one round, used for reporting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Round index
    pub round: u32,
    /// Number of messages recorded in the round
    pub message_count: usize,
    /// Messages grouped by sender
    pub messages_by_sender: BTreeMap<ParticipantId, Vec<Message>>,
    /// Interim answers declared via message metadata in this round
    pub interim_answers: BTreeMap<ParticipantId, String>,
}

/// Per-participant summary for the report's `agent_summaries` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    /// Participant id
    pub id: ParticipantId,
    /// Role the participant played
    pub role: Role,
    /// Total messages the participant authored
    pub total_messages: usize,
    /// Declared final answer, if any
    pub final_answer: Option<String>,
}
