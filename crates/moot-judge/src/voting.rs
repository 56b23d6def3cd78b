//! Weighted-vote aggregation over candidate answers

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use moot_core::{
    Candidate, CandidateTally, FinalAnswers, HistorySnapshot, JudgmentResult, MootError, Result,
    Validator, Verdict, VoteRecord, VoteTally,
};

use crate::pipeline::{check_inputs, JudgmentStrategy};

/// One validator together with its credibility weight
pub struct WeightedValidator {
    pub validator: Box<dyn Validator>,
    pub weight: f64,
}

/// Weighted voting: each validator casts one vote over the candidate answers;
/// a candidate's aggregate is the weighted sum of the votes it received.
///
/// The strictly highest aggregate wins. Tied candidates are broken by earliest
/// appearance in snapshot message order; when order does not distinguish them
/// the verdict is [`Verdict::NoConsensus`], never an arbitrary pick.
pub struct WeightedVoting {
    validators: Vec<WeightedValidator>,
}

impl WeightedVoting {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    pub fn with_validator(mut self, validator: Box<dyn Validator>, weight: f64) -> Self {
        self.validators.push(WeightedValidator { validator, weight });
        self
    }

    /// Build a panel where every validator carries weight 1.0
    pub fn equal_weights(validators: Vec<Box<dyn Validator>>) -> Self {
        let mut voting = Self::new();
        for validator in validators {
            voting = voting.with_validator(validator, 1.0);
        }
        voting
    }

    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }
}

impl Default for WeightedVoting {
    fn default() -> Self {
        Self::new()
    }
}

/// Distinct declared answers, ordered by earliest appearance in the snapshot.
///
/// Participants sharing the same answer text collapse into one candidate.
pub fn extract_candidates(snapshot: &HistorySnapshot, final_answers: &FinalAnswers) -> Vec<Candidate> {
    let mut by_answer: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (id, answer) in final_answers {
        if let Some(answer) = answer {
            by_answer.entry(answer).or_default().push(id.clone());
        }
    }

    let mut candidates: Vec<Candidate> = by_answer
        .into_iter()
        .map(|(answer, proposed_by)| Candidate {
            answer: answer.to_string(),
            proposed_by,
            first_seen: snapshot.first_position_of_answer(answer),
        })
        .collect();

    // Unknown positions sort last; ties keep the BTreeMap's answer order.
    candidates.sort_by_key(|c| c.first_seen.unwrap_or(usize::MAX));
    candidates
}

/// Pick the winner out of a finished tally
fn resolve(tally: &VoteTally) -> Verdict {
    let leaders = tally.leaders();
    match leaders.as_slice() {
        [] => Verdict::NoConsensus,
        [single] => Verdict::Answer(single.answer.clone()),
        tied => {
            let earliest = tied.iter().filter_map(|c| c.first_seen).min();
            let at_earliest: Vec<&&CandidateTally> = match earliest {
                Some(position) => tied
                    .iter()
                    .filter(|c| c.first_seen == Some(position))
                    .collect(),
                None => return Verdict::NoConsensus,
            };
            // Order only breaks the tie when it names exactly one leader and
            // every tied candidate has a known position.
            if at_earliest.len() == 1 && tied.iter().all(|c| c.first_seen.is_some()) {
                Verdict::Answer(at_earliest[0].answer.clone())
            } else {
                Verdict::NoConsensus
            }
        }
    }
}

#[async_trait]
impl JudgmentStrategy for WeightedVoting {
    async fn decide(
        &self,
        snapshot: &HistorySnapshot,
        final_answers: &FinalAnswers,
    ) -> Result<JudgmentResult> {
        check_inputs(snapshot, final_answers)?;

        let candidates = extract_candidates(snapshot, final_answers);
        let mut tally = VoteTally {
            candidates: candidates
                .iter()
                .map(|c| CandidateTally {
                    answer: c.answer.clone(),
                    aggregate: 0.0,
                    first_seen: c.first_seen,
                    votes: Vec::new(),
                })
                .collect(),
        };

        let mut ballots = 0usize;
        for weighted in &self.validators {
            let ballot = match weighted.validator.vote(snapshot, &candidates).await {
                Ok(ballot) => ballot,
                Err(e) => {
                    warn!(
                        "Validator {} failed to vote, skipping: {}",
                        weighted.validator.id(),
                        e
                    );
                    continue;
                }
            };

            let Some(entry) = tally
                .candidates
                .iter_mut()
                .find(|c| c.answer == ballot.choice)
            else {
                warn!(
                    "Validator {} voted for unknown candidate {:?}, skipping",
                    weighted.validator.id(),
                    ballot.choice
                );
                continue;
            };

            entry.aggregate += weighted.weight;
            entry.votes.push(VoteRecord {
                validator_id: weighted.validator.id().to_string(),
                weight: weighted.weight,
                confidence: ballot.confidence,
            });
            ballots += 1;
            debug!(
                "Validator {} voted {:?} (weight {})",
                weighted.validator.id(),
                entry.answer,
                weighted.weight
            );
        }

        if ballots == 0 {
            return Err(MootError::ModelBackend(
                "no validator produced a vote".to_string(),
            ));
        }

        let verdict = resolve(&tally);
        let rationale = match &verdict {
            Verdict::Answer(answer) => format!(
                "{} of {} weighted votes selected {:?}",
                tally
                    .candidates
                    .iter()
                    .find(|c| &c.answer == answer)
                    .map(|c| c.aggregate)
                    .unwrap_or(0.0),
                ballots,
                answer
            ),
            Verdict::NoConsensus => "weighted voting produced no strict winner".to_string(),
        };

        Ok(JudgmentResult {
            verdict,
            final_answers: final_answers.clone(),
            rationale,
            tally: Some(tally),
        })
    }
}
