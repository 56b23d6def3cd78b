//! LLM-backed participant implementations for the three topologies
//!
//! Each participant owns its internal state and maintains it through
//! `update_state`; the orchestration core only ever sees the messages they
//! return. Generation is side-effect free, so retrying a timed-out turn is
//! safe.

use async_trait::async_trait;

use moot_core::{Message, Participant, Result, Role, RoundKind, Turn};

use crate::client::ChatClient;
use crate::prompt::{self, parse_tagged_line, system_prompt, FINAL_ANSWER_TAG};

fn build_message(id: &str, turn: &Turn, content: String) -> Message {
    let answer = parse_tagged_line(&content, FINAL_ANSWER_TAG);
    let mut message = Message::new(content, id, &turn.receiver, turn.round);
    if let Some(answer) = answer {
        message = message.with_answer(answer);
    }
    message
}

fn with_summary(prompt: String, kind: RoundKind) -> String {
    match kind {
        RoundKind::Summary => format!("{}\n\n{}", prompt, prompt::summary_instruction()),
        RoundKind::Debate => prompt,
    }
}

/// Single-topology participant: analyses, then re-verifies its own work
pub struct ReflectiveParticipant {
    id: String,
    question: String,
    client: ChatClient,
    system_prompt: String,
    current_analysis: Option<String>,
}

impl ReflectiveParticipant {
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        client: ChatClient,
        background: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            client,
            system_prompt: system_prompt(Role::Reflector, background),
            current_analysis: None,
        }
    }
}

#[async_trait]
impl Participant for ReflectiveParticipant {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> Role {
        Role::Reflector
    }

    async fn generate_response(&mut self, _context: &[Message], turn: &Turn) -> Result<Message> {
        let prompt = match &self.current_analysis {
            None => prompt::opening_prompt(&self.question),
            Some(previous) => prompt::verification_prompt(&self.question, previous),
        };
        let content = self
            .client
            .prompt(Some(&self.system_prompt), &with_summary(prompt, turn.kind))
            .await?;
        Ok(build_message(&self.id, turn, content))
    }

    async fn update_state(&mut self, message: &Message) -> Result<()> {
        if message.sender == self.id && !message.is_sentinel() {
            self.current_analysis = Some(message.content.clone());
        }
        Ok(())
    }
}

/// Dual-topology participant: one side of a solver/critic exchange
pub struct DualDebater {
    id: String,
    question: String,
    role: Role,
    client: ChatClient,
    system_prompt: String,
    last_opponent_message: Option<Message>,
}

impl DualDebater {
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        role: Role,
        client: ChatClient,
        background: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            role,
            client,
            system_prompt: system_prompt(role, background),
            last_opponent_message: None,
        }
    }
}

#[async_trait]
impl Participant for DualDebater {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> Role {
        self.role
    }

    async fn generate_response(&mut self, _context: &[Message], turn: &Turn) -> Result<Message> {
        let prompt = match &self.last_opponent_message {
            None => prompt::opening_prompt(&self.question),
            Some(opponent) => prompt::rebuttal_prompt(&self.question, &opponent.content),
        };
        let content = self
            .client
            .prompt(Some(&self.system_prompt), &with_summary(prompt, turn.kind))
            .await?;
        Ok(build_message(&self.id, turn, content))
    }

    async fn update_state(&mut self, message: &Message) -> Result<()> {
        if message.sender != self.id && !message.is_sentinel() {
            self.last_opponent_message = Some(message.clone());
        }
        Ok(())
    }
}

/// Multi-topology participant: one voice in a broadcast panel
pub struct Panelist {
    id: String,
    question: String,
    client: ChatClient,
    system_prompt: String,
    peer_messages: Vec<Message>,
}

impl Panelist {
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        client: ChatClient,
        background: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            client,
            system_prompt: system_prompt(Role::Expert, background),
            peer_messages: Vec::new(),
        }
    }
}

#[async_trait]
impl Participant for Panelist {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> Role {
        Role::Expert
    }

    async fn generate_response(&mut self, _context: &[Message], turn: &Turn) -> Result<Message> {
        // Contributions from the immediately preceding round drive this turn;
        // older ones have already been folded into earlier responses.
        let previous_round: Vec<Message> = std::mem::take(&mut self.peer_messages)
            .into_iter()
            .filter(|m| m.round + 1 == turn.round)
            .collect();

        let prompt = if previous_round.is_empty() {
            prompt::opening_prompt(&self.question)
        } else {
            prompt::panel_prompt(&self.question, &previous_round)
        };
        let content = self
            .client
            .prompt(Some(&self.system_prompt), &with_summary(prompt, turn.kind))
            .await?;
        Ok(build_message(&self.id, turn, content))
    }

    async fn update_state(&mut self, message: &Message) -> Result<()> {
        if message.sender != self.id && !message.is_sentinel() {
            self.peer_messages.push(message.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_message_lifts_answer_into_metadata() {
        let turn = Turn {
            round: 1,
            kind: RoundKind::Debate,
            role: Role::Solver,
            receiver: "critic".into(),
        };
        let msg = build_message("solver", &turn, "Because 2+2=4.\nFINAL ANSWER: 4".into());

        assert_eq!(msg.sender, "solver");
        assert_eq!(msg.round, 1);
        assert_eq!(msg.declared_answer(), Some("4"));
    }

    #[test]
    fn test_build_message_without_tag_has_no_answer() {
        let turn = Turn {
            round: 0,
            kind: RoundKind::Debate,
            role: Role::Expert,
            receiver: "all".into(),
        };
        let msg = build_message("expert_1", &turn, "still thinking".into());
        assert_eq!(msg.declared_answer(), None);
    }

    #[test]
    fn test_summary_instruction_appended() {
        let summarized = with_summary("base".into(), RoundKind::Summary);
        assert!(summarized.contains(prompt::summary_instruction()));
        assert_eq!(with_summary("base".into(), RoundKind::Debate), "base");
    }
}
