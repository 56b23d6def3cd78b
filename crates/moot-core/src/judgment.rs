//! Judgment result types shared by both adjudication strategies

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::ParticipantId;

/// Mapping from participant id to its declared final answer.
///
/// Every registered participant has an entry; `None` records that the
/// participant never produced a non-sentinel message.
pub type FinalAnswers = BTreeMap<ParticipantId, Option<String>>;

/// Final verdict of a judgment strategy.
///
/// `NoConsensus` is a valid outcome of the voting path, distinct from any
/// error: the vote ran to completion and produced no winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Verdict {
    /// A single winning answer
    Answer(String),
    /// Voting produced no strictly-best candidate
    NoConsensus,
}

impl Verdict {
    /// Verdict text for the report's `final_judgment` field
    pub fn as_text(&self) -> String {
        match self {
            Self::Answer(text) => text.clone(),
            Self::NoConsensus => "no consensus".to_string(),
        }
    }
}

/// One candidate answer extracted from the debate, in snapshot order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// The answer text
    pub answer: String,
    /// Participants whose final answer matched this candidate
    pub proposed_by: Vec<ParticipantId>,
    /// Position of the candidate's earliest appearance in the snapshot
    /// message order, when determinable
    pub first_seen: Option<usize>,
}

/// A validator's output for one vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ballot {
    /// The chosen candidate's answer text
    pub choice: String,
    /// Self-reported confidence in [0.0, 1.0]
    pub confidence: f64,
}

/// One recorded vote inside a tally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub validator_id: String,
    pub weight: f64,
    pub confidence: f64,
}

/// Weighted aggregate for one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateTally {
    pub answer: String,
    /// Weighted sum of the votes cast for this candidate
    pub aggregate: f64,
    pub first_seen: Option<usize>,
    pub votes: Vec<VoteRecord>,
}

/// Full tally produced by the voting strategy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub candidates: Vec<CandidateTally>,
}

impl VoteTally {
    /// Candidates holding the highest aggregate score
    pub fn leaders(&self) -> Vec<&CandidateTally> {
        let best = self
            .candidates
            .iter()
            .map(|c| c.aggregate)
            .fold(f64::NEG_INFINITY, f64::max);
        self.candidates
            .iter()
            .filter(|c| c.aggregate == best)
            .collect()
    }
}

/// Direct adjudicator output: a verdict plus its reasoning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjudication {
    pub verdict: String,
    pub rationale: String,
}

/// Final adjudicated result of a debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentResult {
    /// The verdict
    pub verdict: Verdict,
    /// Every participant's declared final answer
    pub final_answers: FinalAnswers,
    /// Supporting rationale
    pub rationale: String,
    /// Vote tally, present only for the voting strategy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tally: Option<VoteTally>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_text() {
        assert_eq!(Verdict::Answer("42".into()).as_text(), "42");
        assert_eq!(Verdict::NoConsensus.as_text(), "no consensus");
    }

    #[test]
    fn test_tally_leaders() {
        let tally = VoteTally {
            candidates: vec![
                CandidateTally {
                    answer: "A".into(),
                    aggregate: 3.0,
                    first_seen: Some(0),
                    votes: vec![],
                },
                CandidateTally {
                    answer: "B".into(),
                    aggregate: 1.0,
                    first_seen: Some(1),
                    votes: vec![],
                },
                CandidateTally {
                    answer: "C".into(),
                    aggregate: 3.0,
                    first_seen: Some(2),
                    votes: vec![],
                },
            ],
        };

        let leaders: Vec<&str> = tally.leaders().iter().map(|c| c.answer.as_str()).collect();
        assert_eq!(leaders, vec!["A", "C"]);
    }
}
