//! # moot-judge
//!
//! Judgment pipeline for Moot debates.
//!
//! Two interchangeable strategies over the same input contract (a finalized
//! [`moot_core::HistorySnapshot`] plus the declared final answers):
//!
//! - [`DirectJudgment`]: a single adjudicator evaluates the full exchange
//! - [`WeightedVoting`]: independent validators vote, weighted by credibility
//!
//! Both fail on an empty snapshot or when no final answer was ever declared;
//! a voting tie that order cannot break surfaces as
//! [`moot_core::Verdict::NoConsensus`], which is a result, not an error.

mod pipeline;
mod voting;

pub use pipeline::{DirectJudgment, JudgmentStrategy};
pub use voting::{extract_candidates, WeightedValidator, WeightedVoting};
