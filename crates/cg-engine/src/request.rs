//! Request payload sent to the pricing engine.

use std::fmt;

use cg_core::BudgetSpec;
use serde::{Deserialize, Serialize};

/// Voice configuration priced by one engine invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VoiceMode {
    /// Avatar with its built-in voice.
    Inbuilt,
    /// Avatar paired with a separate voice agent.
    Voice,
}

impl VoiceMode {
    /// Both modes in generation order.
    pub const ALL: [VoiceMode; 2] = [VoiceMode::Inbuilt, VoiceMode::Voice];

    /// Value of the request's `useVoiceAgent` flag.
    pub fn use_voice_agent(self) -> bool {
        matches!(self, VoiceMode::Voice)
    }

    /// Upper-case label used in output file names.
    pub fn label(self) -> &'static str {
        match self {
            VoiceMode::Inbuilt => "INBUILT",
            VoiceMode::Voice => "VOICE",
        }
    }
}

impl fmt::Display for VoiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One pricing question: budget split plus workload for a single voice mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRequest {
    /// Monthly budget in INR.
    #[serde(rename = "monthlyBudgetINR")]
    pub monthly_budget_inr: f64,
    /// Percentage of the budget for avatar and voice APIs.
    pub api_allocation_percent: f64,
    /// Percentage of the budget for hosting.
    pub hosting_allocation_percent: f64,
    /// Number of users.
    pub users: u64,
    /// Peak concurrent sessions.
    pub concurrent_sessions: u64,
    /// Avatar minutes consumed per month.
    pub minutes_per_month: u64,
    /// Whether a separate voice agent is priced.
    pub use_voice_agent: bool,
}

impl ScenarioRequest {
    /// Builds the request for one (row, mode) pair.
    pub fn new(
        budget: &BudgetSpec,
        users: u64,
        minutes: u64,
        concurrency: u64,
        mode: VoiceMode,
    ) -> Self {
        Self {
            monthly_budget_inr: budget.monthly_budget_inr,
            api_allocation_percent: budget.api_allocation_percent,
            hosting_allocation_percent: budget.hosting_allocation_percent,
            users,
            concurrent_sessions: concurrency,
            minutes_per_month: minutes,
            use_voice_agent: mode.use_voice_agent(),
        }
    }
}
