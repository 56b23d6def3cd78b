//! Judgment strategy contract and direct adjudication

use async_trait::async_trait;
use tracing::info;

use moot_core::{
    Adjudicator, FinalAnswers, HistorySnapshot, JudgmentResult, MootError, Result, Verdict,
};

/// A judgment strategy consumes a finalized snapshot plus the declared final
/// answers and produces one [`JudgmentResult`].
///
/// Both built-in strategies fail (rather than degrade) on an empty snapshot or
/// when no participant ever declared an answer.
#[async_trait]
pub trait JudgmentStrategy: Send + Sync {
    async fn decide(
        &self,
        snapshot: &HistorySnapshot,
        final_answers: &FinalAnswers,
    ) -> Result<JudgmentResult>;
}

/// Reject judgment inputs no strategy can work with
pub(crate) fn check_inputs(snapshot: &HistorySnapshot, final_answers: &FinalAnswers) -> Result<()> {
    if snapshot.is_empty() {
        return Err(MootError::EmptySnapshot);
    }
    if final_answers.values().all(Option::is_none) {
        return Err(MootError::NoFinalAnswers);
    }
    Ok(())
}

/// Direct adjudication: a single evaluator receives the full snapshot and
/// produces the verdict. Deterministic given the same snapshot and evaluator
/// output.
pub struct DirectJudgment {
    adjudicator: Box<dyn Adjudicator>,
}

impl DirectJudgment {
    pub fn new(adjudicator: Box<dyn Adjudicator>) -> Self {
        Self { adjudicator }
    }
}

#[async_trait]
impl JudgmentStrategy for DirectJudgment {
    async fn decide(
        &self,
        snapshot: &HistorySnapshot,
        final_answers: &FinalAnswers,
    ) -> Result<JudgmentResult> {
        check_inputs(snapshot, final_answers)?;

        let adjudication = self.adjudicator.evaluate(snapshot, final_answers).await?;
        info!("Direct adjudication complete: {}", adjudication.verdict);

        Ok(JudgmentResult {
            verdict: Verdict::Answer(adjudication.verdict),
            final_answers: final_answers.clone(),
            rationale: adjudication.rationale,
            tally: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moot_core::{Adjudication, Message, ParticipantId};
    use std::collections::BTreeMap;

    struct FixedAdjudicator;

    #[async_trait]
    impl Adjudicator for FixedAdjudicator {
        async fn evaluate(
            &self,
            _snapshot: &HistorySnapshot,
            _final_answers: &BTreeMap<ParticipantId, Option<String>>,
        ) -> Result<Adjudication> {
            Ok(Adjudication {
                verdict: "4".into(),
                rationale: "both participants converged on 4".into(),
            })
        }
    }

    fn answers(entries: &[(&str, Option<&str>)]) -> FinalAnswers {
        entries
            .iter()
            .map(|(id, a)| (id.to_string(), a.map(String::from)))
            .collect()
    }

    #[tokio::test]
    async fn test_direct_judgment() {
        let snapshot = HistorySnapshot::from_messages(vec![Message::new("4", "solver", "all", 0)]);
        let strategy = DirectJudgment::new(Box::new(FixedAdjudicator));

        let result = strategy
            .decide(&snapshot, &answers(&[("solver", Some("4"))]))
            .await
            .unwrap();

        assert_eq!(result.verdict, Verdict::Answer("4".into()));
        assert!(result.tally.is_none());
        assert_eq!(result.final_answers.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_snapshot_fails() {
        let snapshot = HistorySnapshot::from_messages(vec![]);
        let strategy = DirectJudgment::new(Box::new(FixedAdjudicator));

        let err = strategy
            .decide(&snapshot, &answers(&[("solver", Some("4"))]))
            .await
            .unwrap_err();
        assert!(matches!(err, MootError::EmptySnapshot));
    }

    #[tokio::test]
    async fn test_no_declared_answers_fails() {
        let snapshot = HistorySnapshot::from_messages(vec![Message::new("m", "a", "all", 0)]);
        let strategy = DirectJudgment::new(Box::new(FixedAdjudicator));

        let err = strategy
            .decide(&snapshot, &answers(&[("a", None), ("b", None)]))
            .await
            .unwrap_err();
        assert!(matches!(err, MootError::NoFinalAnswers));
    }
}
