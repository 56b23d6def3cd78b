//! Round state machine
//!
//! Tracks the current round index, round kind, and completion. The controller
//! holds participant identities and counts only, never message content, so it
//! stays decoupled from the history store. Its mutable state is owned by the
//! coordinator's main loop; no concurrent access is permitted.

use std::collections::BTreeSet;
use tracing::{debug, info};

use moot_core::{MootError, ParticipantId, Progress, Result, Round, RoundKind, RoundStatus};

/// State machine over the rounds of one debate.
///
/// Indices are strictly increasing and gapless, starting at 0. Debate rounds
/// occupy `0..total_rounds`; when a summary round is configured it follows at
/// index `total_rounds`.
#[derive(Debug)]
pub struct RoundController {
    total_rounds: u32,
    summary_round: bool,
    current: Round,
}

impl RoundController {
    /// Set round 0 active with the given expected-participant set
    pub fn initialize(
        total_rounds: u32,
        summary_round: bool,
        expected: BTreeSet<ParticipantId>,
    ) -> Result<Self> {
        if total_rounds == 0 {
            return Err(MootError::InvalidRoundCount(0));
        }
        info!(
            "Round controller initialized: {} debate rounds{}",
            total_rounds,
            if summary_round { " + summary" } else { "" }
        );
        Ok(Self {
            total_rounds,
            summary_round,
            current: Round::new(0, RoundKind::Debate, expected),
        })
    }

    /// Total rounds the debate will run, including any summary round
    fn planned_rounds(&self) -> u32 {
        self.total_rounds + u32::from(self.summary_round)
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn current(&self) -> &Round {
        &self.current
    }

    pub fn current_index(&self) -> u32 {
        self.current.index
    }

    /// Mark a participant as having acted in the active round.
    ///
    /// Returns whether the round is now complete. Recording an id outside the
    /// expected set is a sequence violation.
    pub fn record_action(&mut self, id: &str) -> Result<bool> {
        if self.current.status == RoundStatus::Complete {
            return Err(MootError::SequenceViolation(format!(
                "round {} already complete",
                self.current.index
            )));
        }
        if !self.current.expected.contains(id) {
            return Err(MootError::SequenceViolation(format!(
                "{} is not expected to act in round {}",
                id, self.current.index
            )));
        }

        self.current.acted.insert(id.to_string());
        if self.current.is_complete() {
            self.current.status = RoundStatus::Complete;
            debug!("Round {} complete", self.current.index);
        }
        Ok(self.current.status == RoundStatus::Complete)
    }

    pub fn is_round_complete(&self) -> bool {
        self.current.status == RoundStatus::Complete
    }

    /// True once every planned round has completed
    pub fn is_terminal(&self) -> bool {
        self.current.status == RoundStatus::Complete
            && self.current.index + 1 >= self.planned_rounds()
    }

    /// Move to the next round with a fresh expected set.
    ///
    /// Callable only when the active round is complete; advancing past the
    /// terminal round is out of range.
    pub fn advance(&mut self, expected: BTreeSet<ParticipantId>) -> Result<&Round> {
        if self.current.status != RoundStatus::Complete {
            return Err(MootError::RoundIncomplete(self.current.index));
        }
        if self.is_terminal() {
            return Err(MootError::RoundOutOfRange(self.current.index + 1));
        }

        let index = self.current.index + 1;
        let kind = if index < self.total_rounds {
            RoundKind::Debate
        } else {
            RoundKind::Summary
        };
        info!("Advancing to round {} ({})", index, kind);
        self.current = Round::new(index, kind, expected);
        Ok(&self.current)
    }

    pub fn progress(&self) -> Progress {
        let planned = self.planned_rounds();
        let completed = self.current.index + u32::from(self.is_round_complete());
        Progress {
            current_round: self.current.index,
            total_rounds: planned,
            remaining_rounds: planned - completed,
            percent_complete: (completed as f32 / planned as f32) * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(ids: &[&str]) -> BTreeSet<ParticipantId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn complete_round(controller: &mut RoundController, ids: &[&str]) {
        for id in ids {
            controller.record_action(id).unwrap();
        }
        assert!(controller.is_round_complete());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let err = RoundController::initialize(0, false, expected(&["a"])).unwrap_err();
        assert!(matches!(err, MootError::InvalidRoundCount(0)));
    }

    #[test]
    fn test_rounds_are_gapless_and_increasing() {
        let mut controller = RoundController::initialize(3, false, expected(&["a", "b"])).unwrap();
        let mut seen = vec![controller.current_index()];

        for _ in 0..2 {
            complete_round(&mut controller, &["a", "b"]);
            controller.advance(expected(&["a", "b"])).unwrap();
            seen.push(controller.current_index());
        }
        complete_round(&mut controller, &["a", "b"]);

        assert_eq!(seen, vec![0, 1, 2]);
        assert!(controller.is_terminal());
    }

    #[test]
    fn test_advance_requires_completion() {
        let mut controller = RoundController::initialize(2, false, expected(&["a", "b"])).unwrap();
        controller.record_action("a").unwrap();

        let err = controller.advance(expected(&["a", "b"])).unwrap_err();
        assert!(matches!(err, MootError::RoundIncomplete(0)));
    }

    #[test]
    fn test_advance_past_terminal_fails() {
        let mut controller = RoundController::initialize(1, false, expected(&["a"])).unwrap();
        complete_round(&mut controller, &["a"]);

        assert!(controller.is_terminal());
        let err = controller.advance(expected(&["a"])).unwrap_err();
        assert!(matches!(err, MootError::RoundOutOfRange(1)));
    }

    #[test]
    fn test_unexpected_participant_rejected() {
        let mut controller = RoundController::initialize(1, false, expected(&["a"])).unwrap();
        let err = controller.record_action("intruder").unwrap_err();
        assert!(matches!(err, MootError::SequenceViolation(_)));
    }

    #[test]
    fn test_summary_round_follows_debate_rounds() {
        let mut controller = RoundController::initialize(2, true, expected(&["a"])).unwrap();

        complete_round(&mut controller, &["a"]);
        let round = controller.advance(expected(&["a"])).unwrap();
        assert_eq!((round.index, round.kind), (1, RoundKind::Debate));
        assert!(!controller.is_terminal());

        complete_round(&mut controller, &["a"]);
        let round = controller.advance(expected(&["a"])).unwrap();
        assert_eq!((round.index, round.kind), (2, RoundKind::Summary));

        complete_round(&mut controller, &["a"]);
        assert!(controller.is_terminal());
    }

    #[test]
    fn test_progress() {
        let mut controller = RoundController::initialize(2, false, expected(&["a"])).unwrap();
        let progress = controller.progress();
        assert_eq!(progress.current_round, 0);
        assert_eq!(progress.remaining_rounds, 2);

        complete_round(&mut controller, &["a"]);
        controller.advance(expected(&["a"])).unwrap();
        complete_round(&mut controller, &["a"]);

        let progress = controller.progress();
        assert_eq!(progress.remaining_rounds, 0);
        assert!((progress.percent_complete - 100.0).abs() < f32::EPSILON);
    }
}
