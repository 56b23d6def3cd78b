//! # moot-agent
//!
//! LLM-backed collaborators for the Moot debate engine.
//!
//! The orchestration core treats participants and judges as opaque
//! capabilities; this crate supplies the concrete implementations:
//!
//! - [`ChatClient`]: stateless client for any OpenAI-compatible
//!   chat-completions backend, with retries, backoff, and a shared circuit
//!   breaker
//! - [`ReflectiveParticipant`], [`DualDebater`], [`Panelist`]: participant
//!   implementations for the single, dual, and multi topologies
//! - [`LlmAdjudicator`], [`LlmValidator`]: judge capabilities
//! - Factory helpers mapping configuration values onto rosters and judgment
//!   pipelines

mod circuit_breaker;
mod client;
mod factory;
mod judges;
mod participants;
mod prompt;
mod types;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use client::ChatClient;
pub use factory::{build_judgment, build_participants};
pub use judges::{LlmAdjudicator, LlmValidator};
pub use participants::{DualDebater, Panelist, ReflectiveParticipant};
pub use prompt::{format_transcript, parse_tagged_line, FINAL_ANSWER_TAG};
pub use types::{ChatMessage, ChatRequest, ChatResponse, Usage};
