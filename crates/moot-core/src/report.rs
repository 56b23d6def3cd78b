//! Report artifact schema
//!
//! Field names and nesting here are a compatibility surface consumed by
//! downstream tooling; they mirror the exported `debate_report_q{id}.json`
//! layout exactly. The core only builds the record; writing it to disk is the
//! exporter's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::judgment::{FinalAnswers, JudgmentResult};
use crate::message::Message;
use crate::types::{ParticipantId, ParticipantSummary, RoundSummary, Topology};

/// `debate_config` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDebateConfig {
    pub model: String,
    pub rounds: u32,
    pub mode: Topology,
    pub participants: Vec<ParticipantId>,
}

/// `debate_history` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportHistory {
    /// Full ordered message sequence
    pub messages: Vec<Message>,
    /// Per-round summaries keyed by round index
    pub rounds: BTreeMap<u32, RoundSummary>,
    /// Per-participant summaries
    pub agent_summaries: BTreeMap<ParticipantId, ParticipantSummary>,
}

/// `final_result` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFinalResult {
    /// Verdict text, `null` when the debate was aborted before judgment
    pub final_judgment: Option<String>,
    pub final_answers: FinalAnswers,
}

/// Complete debate report artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateReport {
    pub question_id: u64,
    pub question: String,
    pub ground_truth: String,
    pub timestamp: DateTime<Utc>,
    pub debate_config: ReportDebateConfig,
    pub debate_history: ReportHistory,
    pub final_result: ReportFinalResult,
}

impl DebateReport {
    /// Assemble a report from the pieces a finished debate exposes
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        question_id: u64,
        question: impl Into<String>,
        ground_truth: impl Into<String>,
        model: impl Into<String>,
        mode: Topology,
        total_rounds: u32,
        messages: Vec<Message>,
        rounds: BTreeMap<u32, RoundSummary>,
        agent_summaries: BTreeMap<ParticipantId, ParticipantSummary>,
        judgment: &JudgmentResult,
    ) -> Self {
        let participants = agent_summaries.keys().cloned().collect();
        Self {
            question_id,
            question: question.into(),
            ground_truth: ground_truth.into(),
            timestamp: Utc::now(),
            debate_config: ReportDebateConfig {
                model: model.into(),
                rounds: total_rounds,
                mode,
                participants,
            },
            debate_history: ReportHistory {
                messages,
                rounds,
                agent_summaries,
            },
            final_result: ReportFinalResult {
                final_judgment: Some(judgment.verdict.as_text()),
                final_answers: judgment.final_answers.clone(),
            },
        }
    }

    /// Conventional report filename for a question id
    pub fn filename(&self) -> String {
        format!("debate_report_q{}.json", self.question_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judgment::Verdict;
    use crate::types::Role;

    #[test]
    fn test_report_schema_fields() {
        let judgment = JudgmentResult {
            verdict: Verdict::Answer("4".into()),
            final_answers: BTreeMap::from([("solver".to_string(), Some("4".to_string()))]),
            rationale: "arithmetic checks out".into(),
            tally: None,
        };
        let summaries = BTreeMap::from([(
            "solver".to_string(),
            ParticipantSummary {
                id: "solver".into(),
                role: Role::Solver,
                total_messages: 2,
                final_answer: Some("4".into()),
            },
        )]);

        let report = DebateReport::new(
            7,
            "What is 2+2?",
            "4",
            "deepseek-chat",
            Topology::Dual,
            2,
            vec![Message::new("4", "solver", "critic", 0)],
            BTreeMap::new(),
            summaries,
            &judgment,
        );

        assert_eq!(report.filename(), "debate_report_q7.json");

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["question_id"], 7);
        assert_eq!(value["debate_config"]["mode"], "dual");
        assert_eq!(value["debate_config"]["rounds"], 2);
        assert_eq!(value["final_result"]["final_judgment"], "4");
        assert_eq!(value["final_result"]["final_answers"]["solver"], "4");
        assert!(value["debate_history"]["messages"].is_array());
        assert!(value["debate_history"]["agent_summaries"]["solver"].is_object());
    }
}
