//! Report export
//!
//! A finished debate is exported exactly once, as pretty-printed JSON under
//! the configured output directory. Export is a pure write: nothing is read
//! back into the live debate instance.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use moot_core::DebateReport;
use moot_orchestrator::DebateOutcome;
use tracing::info;

/// Assemble the report artifact from a finished debate
pub fn build(
    question_id: u64,
    ground_truth: &str,
    model: &str,
    outcome: &DebateOutcome,
) -> DebateReport {
    DebateReport::new(
        question_id,
        &outcome.question,
        ground_truth,
        model,
        outcome.mode,
        outcome.total_rounds,
        outcome.snapshot.messages().to_vec(),
        outcome.round_summaries.clone(),
        outcome.participant_summaries.clone(),
        &outcome.judgment,
    )
}

/// Write the report under `dir`, returning the file path
pub fn write(report: &DebateReport, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating report directory {}", dir.display()))?;
    let path = dir.join(report.filename());
    let json = serde_json::to_string_pretty(report).context("serializing debate report")?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    info!("Debate report saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use moot_core::{JudgmentResult, Message, Topology, Verdict};
    use std::collections::BTreeMap;

    fn sample_report() -> DebateReport {
        let judgment = JudgmentResult {
            verdict: Verdict::Answer("4".into()),
            final_answers: BTreeMap::from([("agent_1".to_string(), Some("4".to_string()))]),
            rationale: "test".into(),
            tally: None,
        };
        DebateReport::new(
            3,
            "What is 2+2?",
            "4",
            "deepseek-chat",
            Topology::Single,
            2,
            vec![Message::new("4", "agent_1", "agent_1", 0)],
            BTreeMap::new(),
            BTreeMap::new(),
            &judgment,
        )
    }

    #[test]
    fn test_write_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();

        let path = write(&report, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "debate_report_q3.json");

        let raw = std::fs::read_to_string(&path).unwrap();
        let reloaded: DebateReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(reloaded, report);
    }

    #[test]
    fn test_write_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports/single_agent");
        let path = write(&sample_report(), &nested).unwrap();
        assert!(path.exists());
    }
}
