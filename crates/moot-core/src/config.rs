//! Configuration for Moot debates
//!
//! `DebateConfig` and friends are the already-validated values the
//! orchestration core consumes. `Settings` is the on-disk layer, loaded from
//! `moot.toml`; the core never reads files or environment variables itself.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{MootError, Result};
use crate::types::{Role, Topology};

/// Per-turn failure policy for external generation calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPolicy {
    /// Timeout for a single generation attempt, in seconds
    #[serde(default = "default_turn_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries after the first failed attempt
    #[serde(default = "default_turn_retries")]
    pub max_retries: u32,
    /// Initial backoff between retries, in seconds; doubles per retry
    #[serde(default = "default_turn_backoff_secs")]
    pub backoff_secs: u64,
}

impl TurnPolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }
}

impl Default for TurnPolicy {
    fn default() -> Self {
        Self {
            timeout_secs: default_turn_timeout_secs(),
            max_retries: default_turn_retries(),
            backoff_secs: default_turn_backoff_secs(),
        }
    }
}

/// Validated configuration for one debate instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateConfig {
    /// Interaction topology
    #[serde(default)]
    pub topology: Topology,
    /// Number of debate rounds (indices `0..total_rounds`)
    #[serde(default = "default_total_rounds")]
    pub total_rounds: u32,
    /// Append a summary round after the final debate round
    #[serde(default)]
    pub summary_round: bool,
    /// Limit participant context to the last N rounds; `None` means unlimited
    #[serde(default)]
    pub context_window: Option<u32>,
    /// Turn failure policy
    #[serde(default)]
    pub turn_policy: TurnPolicy,
}

impl DebateConfig {
    pub fn new(topology: Topology, total_rounds: u32) -> Self {
        Self {
            topology,
            total_rounds,
            ..Self::default()
        }
    }

    pub fn with_summary_round(mut self, summary: bool) -> Self {
        self.summary_round = summary;
        self
    }

    pub fn with_context_window(mut self, rounds: u32) -> Self {
        self.context_window = Some(rounds);
        self
    }

    pub fn with_turn_policy(mut self, policy: TurnPolicy) -> Self {
        self.turn_policy = policy;
        self
    }

    /// Reject configurations the round controller cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.total_rounds == 0 {
            return Err(MootError::InvalidRoundCount(0));
        }
        Ok(())
    }
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            topology: Topology::default(),
            total_rounds: default_total_rounds(),
            summary_round: false,
            context_window: None,
            turn_policy: TurnPolicy::default(),
        }
    }
}

/// Model backend selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name sent to the backend
    #[serde(default = "default_model")]
    pub model: String,
    /// Chat-completions base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key; resolved by the caller,
    /// never read by the core
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Judgment strategy selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeMode {
    /// Single adjudicator over the full snapshot
    #[default]
    Direct,
    /// Weighted validator panel
    Voting,
}

impl std::fmt::Display for JudgeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Voting => write!(f, "voting"),
        }
    }
}

impl std::str::FromStr for JudgeMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "direct" | "llm" => Ok(Self::Direct),
            "voting" => Ok(Self::Voting),
            _ => Err(format!("Invalid judge mode: {}. Use direct or voting.", s)),
        }
    }
}

/// Judgment pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeSettings {
    #[serde(default)]
    pub mode: JudgeMode,
    /// Panel size for the voting mode
    #[serde(default = "default_validators")]
    pub validators: usize,
    /// Per-validator credibility weights; equal weighting when absent
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            mode: JudgeMode::default(),
            validators: default_validators(),
            weights: None,
        }
    }
}

/// Declarative description of one participant, consumed by the factory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    pub id: String,
    /// Role override; the factory assigns topology defaults when absent
    #[serde(default)]
    pub role: Option<Role>,
    /// Background persona woven into the participant's system prompt
    #[serde(default)]
    pub background: Option<String>,
}

impl ParticipantSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }
}

/// Report export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Directory reports are written to
    #[serde(default = "default_report_dir")]
    pub output_dir: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_report_dir(),
        }
    }
}

/// Top-level settings loaded from `moot.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub debate: DebateConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub judge: JudgeSettings,
    #[serde(default, rename = "participant")]
    pub participants: Vec<ParticipantSpec>,
    #[serde(default)]
    pub report: ReportSettings,
}

impl Settings {
    /// Load settings from the given file, or defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let settings: Settings = toml::from_str(&content)
                .map_err(|e| MootError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
            settings.debate.validate()?;
            Ok(settings)
        } else {
            Ok(Self::default())
        }
    }

    /// Write default settings to the given file
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| MootError::Config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// Default value providers

fn default_total_rounds() -> u32 {
    2
}

fn default_turn_timeout_secs() -> u64 {
    120
}

fn default_turn_retries() -> u32 {
    2
}

fn default_turn_backoff_secs() -> u64 {
    2
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_base_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_api_key_env() -> String {
    "MOOT_API_KEY".to_string()
}

fn default_report_dir() -> String {
    "debate_reports".to_string()
}

fn default_validators() -> usize {
    3
}
