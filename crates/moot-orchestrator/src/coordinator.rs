//! Debate coordinator: registration, the main round loop, and judgment handoff

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use moot_core::{
    DebateConfig, FinalAnswers, HistorySnapshot, JudgmentResult, Message, MootError, Participant,
    ParticipantId, ParticipantRecord, ParticipantSummary, Progress, Result, RoundSummary,
    Topology, Turn, BROADCAST,
};
use moot_judge::JudgmentStrategy;

use crate::history::HistoryStore;
use crate::rounds::RoundController;

/// Coordinator-level state.
///
/// `Done` and `Aborted` are terminal; `Aborted` is reachable from any state on
/// an unrecoverable failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateState {
    /// Accepting registrations
    Registering,
    /// Running the given round
    Active { round: u32 },
    /// The given round has completed
    RoundComplete { round: u32 },
    /// Judgment pipeline running over the final snapshot
    Judging,
    /// Finished with a judgment result
    Done,
    /// Terminated without a result
    Aborted { reason: String },
}

/// Everything a finished debate exposes
#[derive(Debug, Clone, Serialize)]
pub struct DebateOutcome {
    /// Identifier of the debate instance
    pub debate_id: Uuid,
    /// The question debated
    pub question: String,
    /// Topology the debate ran under
    pub mode: Topology,
    /// Configured number of debate rounds
    pub total_rounds: u32,
    /// Adjudicated result
    pub judgment: JudgmentResult,
    /// Every participant's declared final answer
    pub final_answers: FinalAnswers,
    /// Final immutable snapshot of the exchange
    pub snapshot: HistorySnapshot,
    /// Per-round summaries keyed by round index
    pub round_summaries: BTreeMap<u32, RoundSummary>,
    /// Per-participant summaries
    pub participant_summaries: BTreeMap<ParticipantId, ParticipantSummary>,
    /// Final progress figures
    pub progress: Progress,
}

/// Top-level orchestrator for one debate instance.
///
/// The coordinator is the only writer to the history store and the only owner
/// of the round controller's mutable state. Participants and the judgment
/// strategy are injected capabilities; the coordinator never branches on what
/// they are.
pub struct DebateCoordinator {
    debate_id: Uuid,
    question: String,
    config: DebateConfig,
    records: Vec<ParticipantRecord>,
    participants: BTreeMap<ParticipantId, Box<dyn Participant>>,
    history: HistoryStore,
    rounds: RoundController,
    judgment: Box<dyn JudgmentStrategy>,
    state: DebateState,
    outcome: Option<DebateOutcome>,
}

impl DebateCoordinator {
    pub fn new(
        question: impl Into<String>,
        config: DebateConfig,
        judgment: Box<dyn JudgmentStrategy>,
    ) -> Result<Self> {
        config.validate()?;
        let rounds = RoundController::initialize(
            config.total_rounds,
            config.summary_round,
            BTreeSet::new(),
        )?;
        Ok(Self {
            debate_id: Uuid::new_v4(),
            question: question.into(),
            config,
            records: Vec::new(),
            participants: BTreeMap::new(),
            history: HistoryStore::new(),
            rounds,
            judgment,
            state: DebateState::Registering,
            outcome: None,
        })
    }

    pub fn debate_id(&self) -> Uuid {
        self.debate_id
    }

    pub fn state(&self) -> &DebateState {
        &self.state
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn participant_count(&self) -> usize {
        self.records.len()
    }

    pub fn progress(&self) -> Progress {
        self.rounds.progress()
    }

    /// Register a participant.
    ///
    /// Fails on a duplicate id or once the debate has started; a failed
    /// registration leaves existing records untouched.
    pub fn register(&mut self, participant: Box<dyn Participant>) -> Result<()> {
        if self.state != DebateState::Registering {
            return Err(MootError::RegistrationClosed);
        }
        let id = participant.id().to_string();
        if self.participants.contains_key(&id) {
            return Err(MootError::DuplicateParticipant(id));
        }

        let record = ParticipantRecord::new(id.clone(), participant.role(), self.records.len());
        info!("Registered participant {} as {}", record.id, record.role);
        self.history.register_sender(&id);
        self.records.push(record);
        self.participants.insert(id, participant);
        Ok(())
    }

    /// Drive the debate to completion and return the outcome.
    ///
    /// Turn-level failures are recovered with sentinel messages; structural
    /// failures (roster, judgment input) abort the instance.
    pub async fn run(&mut self) -> Result<DebateOutcome> {
        if self.state != DebateState::Registering {
            return Err(MootError::InvalidState(format!(
                "cannot start from {:?}",
                self.state
            )));
        }
        self.check_roster()?;

        self.rounds = RoundController::initialize(
            self.config.total_rounds,
            self.config.summary_round,
            self.expected_set(),
        )?;
        self.history.begin_round(0)?;
        self.set_state(DebateState::Active { round: 0 });
        info!(
            "Debate {} started: {:?} ({} topology, {} participants, {} rounds)",
            self.debate_id,
            self.question,
            self.config.topology,
            self.records.len(),
            self.config.total_rounds
        );

        if let Err(e) = self.drive_rounds().await {
            error!("Round loop failed, aborting debate: {}", e);
            self.set_state(DebateState::Aborted {
                reason: e.to_string(),
            });
            return Err(e);
        }

        self.set_state(DebateState::Judging);
        let snapshot = self.history.snapshot();
        let final_answers = self.final_answers();

        let decision = self.judgment.decide(&snapshot, &final_answers).await;
        let judgment = match decision {
            Ok(judgment) => judgment,
            Err(e) => {
                error!("Judgment failed, aborting debate: {}", e);
                self.set_state(DebateState::Aborted {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        let outcome = self.build_outcome(snapshot, final_answers, judgment);
        self.outcome = Some(outcome.clone());
        self.set_state(DebateState::Done);
        Ok(outcome)
    }

    /// The finished debate's result; valid only once `Done`
    pub fn end_debate(&self) -> Result<&DebateOutcome> {
        self.outcome
            .as_ref()
            .ok_or_else(|| MootError::InvalidState(format!("debate is {:?}, not done", self.state)))
    }

    fn set_state(&mut self, state: DebateState) {
        debug!("Coordinator state: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn check_roster(&self) -> Result<()> {
        let have = self.records.len();
        let required = self.config.topology.min_participants();
        if have < required {
            return Err(MootError::BelowTopologyMinimum {
                topology: self.config.topology.to_string(),
                required,
                have,
            });
        }
        match self.config.topology {
            Topology::Single if have != 1 => Err(MootError::Config(format!(
                "single topology requires exactly one participant, have {}",
                have
            ))),
            Topology::Dual if have != 2 => Err(MootError::Config(format!(
                "dual topology requires exactly two participants, have {}",
                have
            ))),
            _ => Ok(()),
        }
    }

    /// All registered participants act in every round, whatever the topology
    fn expected_set(&self) -> BTreeSet<ParticipantId> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }

    fn receiver_for(&self, id: &str) -> String {
        match self.config.topology {
            Topology::Single => id.to_string(),
            Topology::Dual => self
                .records
                .iter()
                .map(|r| r.id.clone())
                .find(|other| other != id)
                .unwrap_or_else(|| BROADCAST.to_string()),
            Topology::Multi => BROADCAST.to_string(),
        }
    }

    /// Run rounds until the controller reports the debate terminal
    async fn drive_rounds(&mut self) -> Result<()> {
        loop {
            self.run_round().await?;
            let round = self.rounds.current_index();
            self.set_state(DebateState::RoundComplete { round });

            if self.rounds.is_terminal() {
                return Ok(());
            }
            let expected = self.expected_set();
            let next = self.rounds.advance(expected)?.index;
            self.history.begin_round(next)?;
            self.set_state(DebateState::Active { round: next });
        }
    }

    /// Run every expected turn of the active round, in registration order
    async fn run_round(&mut self) -> Result<()> {
        let records = self.records.clone();
        for record in &records {
            self.take_turn(record).await?;
        }
        Ok(())
    }

    async fn take_turn(&mut self, record: &ParticipantRecord) -> Result<()> {
        let round = self.rounds.current();
        let turn = Turn {
            round: round.index,
            kind: round.kind,
            role: record.role,
            receiver: self.receiver_for(&record.id),
        };
        let context =
            self.history
                .get_context(&record.id, self.config.topology, self.config.context_window);

        let message = match self.attempt_generation(&record.id, &context, &turn).await {
            Some(msg) if msg.sender == record.id && msg.round == turn.round => msg,
            Some(msg) => {
                warn!(
                    "Sequence violation from {}: got sender {:?} round {}, expected {:?} round {}; recording sentinel",
                    record.id, msg.sender, msg.round, record.id, turn.round
                );
                Message::sentinel(&record.id, &turn.receiver, turn.round)
            }
            None => {
                warn!(
                    "Turn failed for {} in round {}; recording sentinel",
                    record.id, turn.round
                );
                Message::sentinel(&record.id, &turn.receiver, turn.round)
            }
        };

        self.history.append(message.clone())?;
        self.rounds.record_action(&record.id)?;
        self.deliver(&message).await;
        Ok(())
    }

    /// Call the participant's generation capability under the turn policy.
    ///
    /// Timeouts and backend errors are retried with exponential backoff up to
    /// the configured budget; exhaustion yields `None` and the caller records
    /// a sentinel.
    async fn attempt_generation(
        &mut self,
        id: &str,
        context: &[Message],
        turn: &Turn,
    ) -> Option<Message> {
        let policy = self.config.turn_policy;
        let attempts = policy.max_retries + 1;
        let mut backoff = policy.backoff();

        let participant = self.participants.get_mut(id)?;
        for attempt in 1..=attempts {
            match tokio::time::timeout(policy.timeout(), participant.generate_response(context, turn))
                .await
            {
                Ok(Ok(message)) => return Some(message),
                Ok(Err(e)) => {
                    warn!(
                        "Participant {} failed in round {} (attempt {}/{}): {}",
                        id, turn.round, attempt, attempts, e
                    );
                }
                Err(_) => {
                    warn!(
                        "Participant {} timed out in round {} (attempt {}/{})",
                        id, turn.round, attempt, attempts
                    );
                }
            }
            if attempt < attempts {
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }
        None
    }

    /// Invoke `update_state` on the sender and every recipient of a recorded
    /// message. State maintenance is best-effort; failures are logged and do
    /// not fail the turn.
    async fn deliver(&mut self, message: &Message) {
        let mut recipients: BTreeSet<ParticipantId> = BTreeSet::new();
        recipients.insert(message.sender.clone());
        if message.is_broadcast() {
            recipients.extend(self.records.iter().map(|r| r.id.clone()));
        } else {
            recipients.insert(message.receiver.clone());
        }

        for id in recipients {
            if let Some(participant) = self.participants.get_mut(&id) {
                if let Err(e) = participant.update_state(message).await {
                    warn!("update_state failed for {}: {}", id, e);
                }
            }
        }
    }

    /// Extract each participant's declared final answer.
    ///
    /// The answer is the `answer` metadata of the participant's last
    /// non-sentinel message, falling back to that message's content; `None`
    /// when the participant never produced a non-sentinel message.
    fn final_answers(&self) -> FinalAnswers {
        self.records
            .iter()
            .map(|record| {
                let answer = self
                    .history
                    .messages()
                    .iter()
                    .rev()
                    .find(|m| m.sender == record.id && !m.is_sentinel())
                    .map(|m| {
                        m.declared_answer()
                            .map(str::to_string)
                            .unwrap_or_else(|| m.content.clone())
                    });
                (record.id.clone(), answer)
            })
            .collect()
    }

    fn build_outcome(
        &self,
        snapshot: HistorySnapshot,
        final_answers: FinalAnswers,
        judgment: JudgmentResult,
    ) -> DebateOutcome {
        let round_summaries = snapshot
            .rounds()
            .into_iter()
            .map(|r| (r, self.history.round_summary(r)))
            .collect();
        let participant_summaries = self
            .records
            .iter()
            .map(|record| {
                let authored = snapshot
                    .messages()
                    .iter()
                    .filter(|m| m.sender == record.id)
                    .count();
                (
                    record.id.clone(),
                    ParticipantSummary {
                        id: record.id.clone(),
                        role: record.role,
                        total_messages: authored,
                        final_answer: final_answers.get(&record.id).cloned().flatten(),
                    },
                )
            })
            .collect();

        DebateOutcome {
            debate_id: self.debate_id,
            question: self.question.clone(),
            mode: self.config.topology,
            total_rounds: self.config.total_rounds,
            judgment,
            final_answers,
            snapshot,
            round_summaries,
            participant_summaries,
            progress: self.rounds.progress(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use moot_core::{Adjudication, Adjudicator, Role, RoundKind, TurnPolicy, Verdict};
    use moot_judge::DirectJudgment;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct TurnLog {
        contexts: Vec<Vec<Message>>,
        turns: Vec<Turn>,
        received: Vec<Message>,
    }

    /// Deterministic participant that answers from a script and records what
    /// it was shown.
    struct Scripted {
        id: String,
        role: Role,
        answer: Option<String>,
        log: Arc<Mutex<TurnLog>>,
    }

    impl Scripted {
        fn new(id: &str, role: Role) -> (Box<Self>, Arc<Mutex<TurnLog>>) {
            let log = Arc::new(Mutex::new(TurnLog::default()));
            (
                Box::new(Self {
                    id: id.to_string(),
                    role,
                    answer: None,
                    log: log.clone(),
                }),
                log,
            )
        }

        fn with_answer(mut self: Box<Self>, answer: &str) -> Box<Self> {
            self.answer = Some(answer.to_string());
            self
        }
    }

    #[async_trait]
    impl Participant for Scripted {
        fn id(&self) -> &str {
            &self.id
        }

        fn role(&self) -> Role {
            self.role
        }

        async fn generate_response(&mut self, context: &[Message], turn: &Turn) -> Result<Message> {
            let mut log = self.log.lock().unwrap();
            log.contexts.push(context.to_vec());
            log.turns.push(turn.clone());

            let mut message = Message::new(
                format!("{} round {}", self.id, turn.round),
                &self.id,
                &turn.receiver,
                turn.round,
            );
            if let Some(answer) = &self.answer {
                message = message.with_answer(answer);
            }
            Ok(message)
        }

        async fn update_state(&mut self, message: &Message) -> Result<()> {
            self.log.lock().unwrap().received.push(message.clone());
            Ok(())
        }
    }

    /// Participant whose generation capability always errors
    struct Broken {
        id: String,
        role: Role,
    }

    #[async_trait]
    impl Participant for Broken {
        fn id(&self) -> &str {
            &self.id
        }

        fn role(&self) -> Role {
            self.role
        }

        async fn generate_response(&mut self, _: &[Message], _: &Turn) -> Result<Message> {
            Err(MootError::ModelBackend("backend down".into()))
        }

        async fn update_state(&mut self, _: &Message) -> Result<()> {
            Ok(())
        }
    }

    /// Participant that hangs until well past any reasonable timeout
    struct Unresponsive {
        id: String,
    }

    #[async_trait]
    impl Participant for Unresponsive {
        fn id(&self) -> &str {
            &self.id
        }

        fn role(&self) -> Role {
            Role::Expert
        }

        async fn generate_response(&mut self, _: &[Message], turn: &Turn) -> Result<Message> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Message::new("too late", &self.id, &turn.receiver, turn.round))
        }

        async fn update_state(&mut self, _: &Message) -> Result<()> {
            Ok(())
        }
    }

    /// Participant that stamps the wrong round on its messages
    struct OffByOne {
        id: String,
    }

    #[async_trait]
    impl Participant for OffByOne {
        fn id(&self) -> &str {
            &self.id
        }

        fn role(&self) -> Role {
            Role::Expert
        }

        async fn generate_response(&mut self, _: &[Message], turn: &Turn) -> Result<Message> {
            Ok(Message::new("eager", &self.id, &turn.receiver, turn.round + 1))
        }

        async fn update_state(&mut self, _: &Message) -> Result<()> {
            Ok(())
        }
    }

    struct OkAdjudicator;

    #[async_trait]
    impl Adjudicator for OkAdjudicator {
        async fn evaluate(
            &self,
            _snapshot: &HistorySnapshot,
            final_answers: &BTreeMap<ParticipantId, Option<String>>,
        ) -> Result<Adjudication> {
            let first = final_answers
                .values()
                .flatten()
                .next()
                .cloned()
                .unwrap_or_default();
            Ok(Adjudication {
                verdict: first,
                rationale: "test adjudicator".into(),
            })
        }
    }

    fn judged() -> Box<dyn JudgmentStrategy> {
        Box::new(DirectJudgment::new(Box::new(OkAdjudicator)))
    }

    fn fast_policy() -> TurnPolicy {
        TurnPolicy {
            timeout_secs: 5,
            max_retries: 1,
            backoff_secs: 0,
        }
    }

    #[tokio::test]
    async fn test_single_end_to_end() {
        let config = DebateConfig::new(Topology::Single, 2);
        let mut coordinator = DebateCoordinator::new("What is 2+2?", config, judged()).unwrap();
        let (participant, log) = Scripted::new("thinker", Role::Reflector);
        coordinator.register(participant.with_answer("4")).unwrap();

        let outcome = coordinator.run().await.unwrap();

        assert_eq!(outcome.snapshot.len(), 2);
        assert_eq!(outcome.snapshot.rounds(), vec![0, 1]);
        assert_eq!(outcome.final_answers.len(), 1);
        assert_eq!(
            outcome.final_answers.get("thinker"),
            Some(&Some("4".to_string()))
        );
        assert_eq!(outcome.judgment.verdict, Verdict::Answer("4".into()));
        assert_eq!(coordinator.state(), &DebateState::Done);
        assert_eq!(coordinator.end_debate().unwrap().snapshot.len(), 2);

        // The reflector saw its own round-0 message before acting in round 1.
        let log = log.lock().unwrap();
        assert_eq!(log.contexts[0].len(), 0);
        assert_eq!(log.contexts[1].len(), 1);
    }

    #[tokio::test]
    async fn test_dual_second_sees_first_same_round() {
        let config = DebateConfig::new(Topology::Dual, 2);
        let mut coordinator = DebateCoordinator::new("q", config, judged()).unwrap();
        let (solver, _) = Scripted::new("solver", Role::Solver);
        let (critic, critic_log) = Scripted::new("critic", Role::Critic);
        coordinator.register(solver.with_answer("A")).unwrap();
        coordinator.register(critic).unwrap();

        let outcome = coordinator.run().await.unwrap();
        assert_eq!(outcome.snapshot.len(), 4);

        let log = critic_log.lock().unwrap();
        for (round, context) in log.contexts.iter().enumerate() {
            assert!(
                context
                    .iter()
                    .any(|m| m.sender == "solver" && m.round == round as u32),
                "critic context for round {} lacks the solver's message",
                round
            );
        }
    }

    #[tokio::test]
    async fn test_multi_produces_one_message_per_participant_per_round() {
        let config = DebateConfig::new(Topology::Multi, 2);
        let mut coordinator = DebateCoordinator::new("q", config, judged()).unwrap();
        for name in ["alpha", "beta", "gamma"] {
            let (p, _) = Scripted::new(name, Role::Expert);
            coordinator.register(p.with_answer("X")).unwrap();
        }

        let outcome = coordinator.run().await.unwrap();

        assert_eq!(outcome.snapshot.len(), 6);
        for name in ["alpha", "beta", "gamma"] {
            let authored = outcome
                .snapshot
                .messages()
                .iter()
                .filter(|m| m.sender == name)
                .count();
            assert_eq!(authored, 2);
        }
    }

    #[tokio::test]
    async fn test_duplicate_registration_fails_and_preserves_record() {
        let config = DebateConfig::new(Topology::Single, 1);
        let mut coordinator = DebateCoordinator::new("q", config, judged()).unwrap();
        let (first, _) = Scripted::new("dup", Role::Reflector);
        coordinator.register(first).unwrap();

        let (second, _) = Scripted::new("dup", Role::Expert);
        let err = coordinator.register(second).unwrap_err();

        assert!(matches!(err, MootError::DuplicateParticipant(_)));
        assert_eq!(coordinator.participant_count(), 1);
        assert_eq!(coordinator.records[0].role, Role::Reflector);
    }

    #[tokio::test]
    async fn test_register_after_start_fails() {
        let config = DebateConfig::new(Topology::Single, 1);
        let mut coordinator = DebateCoordinator::new("q", config, judged()).unwrap();
        let (p, _) = Scripted::new("a", Role::Reflector);
        coordinator.register(p.with_answer("1")).unwrap();
        coordinator.run().await.unwrap();

        let (late, _) = Scripted::new("late", Role::Reflector);
        let err = coordinator.register(late).unwrap_err();
        assert!(matches!(err, MootError::RegistrationClosed));
    }

    #[tokio::test]
    async fn test_below_minimum_never_starts() {
        let config = DebateConfig::new(Topology::Dual, 2);
        let mut coordinator = DebateCoordinator::new("q", config, judged()).unwrap();
        let (only, _) = Scripted::new("solo", Role::Solver);
        coordinator.register(only).unwrap();

        let err = coordinator.run().await.unwrap_err();
        assert!(matches!(err, MootError::BelowTopologyMinimum { .. }));
        assert_eq!(coordinator.state(), &DebateState::Registering);
    }

    #[tokio::test]
    async fn test_failed_turn_records_sentinel() {
        let config =
            DebateConfig::new(Topology::Multi, 1).with_turn_policy(fast_policy());
        let mut coordinator = DebateCoordinator::new("q", config, judged()).unwrap();
        let (good, _) = Scripted::new("good", Role::Expert);
        coordinator.register(good.with_answer("G")).unwrap();
        coordinator.register(Box::new(Broken {
            id: "bad".into(),
            role: Role::Expert,
        })).unwrap();

        let outcome = coordinator.run().await.unwrap();

        assert_eq!(outcome.snapshot.len(), 2);
        let sentinel = outcome
            .snapshot
            .messages()
            .iter()
            .find(|m| m.sender == "bad")
            .unwrap();
        assert!(sentinel.is_sentinel());
        assert_eq!(outcome.final_answers.get("bad"), Some(&None));
        assert_eq!(coordinator.state(), &DebateState::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_timeout_records_sentinel() {
        let config = DebateConfig::new(Topology::Multi, 1).with_turn_policy(TurnPolicy {
            timeout_secs: 1,
            max_retries: 1,
            backoff_secs: 1,
        });
        let mut coordinator = DebateCoordinator::new("q", config, judged()).unwrap();
        let (good, _) = Scripted::new("good", Role::Expert);
        coordinator.register(good.with_answer("G")).unwrap();
        coordinator
            .register(Box::new(Unresponsive { id: "slow".into() }))
            .unwrap();

        let outcome = coordinator.run().await.unwrap();

        let slow = outcome
            .snapshot
            .messages()
            .iter()
            .find(|m| m.sender == "slow")
            .unwrap();
        assert!(slow.is_sentinel());
    }

    #[tokio::test]
    async fn test_mismatched_round_becomes_sentinel() {
        let config =
            DebateConfig::new(Topology::Multi, 1).with_turn_policy(fast_policy());
        let mut coordinator = DebateCoordinator::new("q", config, judged()).unwrap();
        let (good, _) = Scripted::new("good", Role::Expert);
        coordinator.register(good.with_answer("G")).unwrap();
        coordinator
            .register(Box::new(OffByOne { id: "eager".into() }))
            .unwrap();

        let outcome = coordinator.run().await.unwrap();

        // The mismatched message was rejected, never stored.
        assert!(outcome.snapshot.messages().iter().all(|m| m.round == 0));
        assert!(outcome
            .snapshot
            .messages()
            .iter()
            .find(|m| m.sender == "eager")
            .unwrap()
            .is_sentinel());
    }

    #[tokio::test]
    async fn test_no_answers_aborts() {
        let config =
            DebateConfig::new(Topology::Single, 1).with_turn_policy(fast_policy());
        let mut coordinator = DebateCoordinator::new("q", config, judged()).unwrap();
        coordinator.register(Box::new(Broken {
            id: "mute".into(),
            role: Role::Reflector,
        })).unwrap();

        let err = coordinator.run().await.unwrap_err();

        assert!(matches!(err, MootError::NoFinalAnswers));
        assert!(matches!(coordinator.state(), DebateState::Aborted { .. }));
        assert!(coordinator.end_debate().is_err());
    }

    #[tokio::test]
    async fn test_summary_round_runs_after_debate_rounds() {
        let config = DebateConfig::new(Topology::Single, 1).with_summary_round(true);
        let mut coordinator = DebateCoordinator::new("q", config, judged()).unwrap();
        let (p, log) = Scripted::new("thinker", Role::Reflector);
        coordinator.register(p.with_answer("42")).unwrap();

        let outcome = coordinator.run().await.unwrap();

        assert_eq!(outcome.snapshot.len(), 2);
        assert_eq!(outcome.snapshot.rounds(), vec![0, 1]);
        let kinds: Vec<RoundKind> = log.lock().unwrap().turns.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![RoundKind::Debate, RoundKind::Summary]);
    }
}
