//! LLM-backed adjudicator and validator capabilities

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::debug;

use moot_core::{
    Adjudication, Adjudicator, Ballot, Candidate, HistorySnapshot, MootError, ParticipantId,
    Result, Validator,
};

use crate::client::ChatClient;
use crate::prompt::{
    adjudicator_prompt, adjudicator_system, format_transcript, parse_tagged_line,
    validator_prompt, validator_system, CHOICE_TAG, CONFIDENCE_TAG, VERDICT_TAG,
};

/// Render declared final answers for the judge prompts
fn format_answers(final_answers: &BTreeMap<ParticipantId, Option<String>>) -> String {
    final_answers
        .iter()
        .filter_map(|(id, answer)| answer.as_ref().map(|a| format!("Agent {}:\n{}", id, a)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Direct adjudication backed by a language model
pub struct LlmAdjudicator {
    client: ChatClient,
}

impl LlmAdjudicator {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Adjudicator for LlmAdjudicator {
    async fn evaluate(
        &self,
        snapshot: &HistorySnapshot,
        final_answers: &BTreeMap<ParticipantId, Option<String>>,
    ) -> Result<Adjudication> {
        let prompt = adjudicator_prompt(
            &format_transcript(snapshot.messages()),
            &format_answers(final_answers),
        );
        let response = self
            .client
            .prompt(Some(adjudicator_system()), &prompt)
            .await?;

        // A missing tag still yields a usable verdict: the whole response.
        let verdict =
            parse_tagged_line(&response, VERDICT_TAG).unwrap_or_else(|| response.clone());
        Ok(Adjudication {
            verdict,
            rationale: response,
        })
    }
}

/// One voting validator backed by a language model
pub struct LlmValidator {
    id: String,
    client: ChatClient,
}

impl LlmValidator {
    pub fn new(id: impl Into<String>, client: ChatClient) -> Self {
        Self {
            id: id.into(),
            client,
        }
    }
}

/// Parse a validator reply into a ballot over the given candidates.
///
/// The choice must be a 1-based candidate number; an unparseable choice is an
/// error so the vote is skipped rather than miscounted. Missing confidence
/// defaults to 0.5.
fn parse_ballot(response: &str, candidates: &[Candidate]) -> Result<Ballot> {
    let choice = parse_tagged_line(response, CHOICE_TAG)
        .and_then(|raw| raw.split_whitespace().next().map(str::to_string))
        .and_then(|raw| raw.trim_end_matches('.').parse::<usize>().ok())
        .and_then(|number| candidates.get(number.checked_sub(1)?))
        .map(|candidate| candidate.answer.clone())
        .ok_or_else(|| MootError::ModelBackend("unparseable validator choice".to_string()))?;

    let confidence = parse_tagged_line(response, CONFIDENCE_TAG)
        .and_then(|raw| raw.split_whitespace().next()?.parse::<f64>().ok())
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(0.5);

    Ok(Ballot { choice, confidence })
}

#[async_trait]
impl Validator for LlmValidator {
    fn id(&self) -> &str {
        &self.id
    }

    async fn vote(&self, _snapshot: &HistorySnapshot, candidates: &[Candidate]) -> Result<Ballot> {
        let listed: Vec<String> = candidates.iter().map(|c| c.answer.clone()).collect();
        let response = self
            .client
            .prompt(Some(validator_system()), &validator_prompt(&listed))
            .await?;
        let ballot = parse_ballot(&response, candidates)?;
        debug!(
            "Validator {} chose {:?} (confidence {})",
            self.id, ballot.choice, ballot.confidence
        );
        Ok(ballot)
    }
}
