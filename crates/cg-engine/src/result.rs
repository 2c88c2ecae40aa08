//! Scenario objects returned by the pricing engine.
//!
//! Every nested record and scalar is optional: the engine owns the schema and
//! this side only reads what it needs. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Avatar subscription chosen for a scenario.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarPlan {
    /// Vendor name.
    pub provider: Option<String>,
    /// Plan name.
    pub name: Option<String>,
    /// Plan tier label.
    pub tier: Option<String>,
    /// Minutes included per account.
    pub minutes: Option<f64>,
    /// USD per minute beyond the included minutes.
    pub additional_per_min: Option<f64>,
    /// Free-form plan note (annual commitment and similar).
    pub note: Option<String>,
}

/// Separate voice agent paired with the avatar.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAgent {
    /// Agent display name.
    pub name: Option<String>,
    /// Pricing model label (per-minute, token based, ...).
    pub pricing_model: Option<String>,
}

/// Hosting option chosen for a scenario.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingOption {
    /// Hosting option name.
    pub name: Option<String>,
}

/// Per-component cost figures.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    #[serde(rename = "totalCostINR")]
    pub total_cost_inr: Option<f64>,
    #[serde(rename = "totalCostUSD")]
    pub total_cost_usd: Option<f64>,
    #[serde(rename = "avatarAdditionalMinutes")]
    pub avatar_additional_minutes: Option<f64>,
    #[serde(rename = "avatarBaseCostUSD")]
    pub avatar_base_cost_usd: Option<f64>,
    #[serde(rename = "avatarAdditionalCostUSD")]
    pub avatar_additional_cost_usd: Option<f64>,
    #[serde(rename = "avatarCostINR")]
    pub avatar_cost_inr: Option<f64>,
    #[serde(rename = "voiceTotalTokens")]
    pub voice_total_tokens: Option<f64>,
    #[serde(rename = "voiceBaseCostUSD")]
    pub voice_base_cost_usd: Option<f64>,
    #[serde(rename = "voicePerMinuteCostUSD")]
    pub voice_per_minute_cost_usd: Option<f64>,
    #[serde(rename = "voiceCostINR")]
    pub voice_cost_inr: Option<f64>,
    #[serde(rename = "voiceCostUSD")]
    pub voice_cost_usd: Option<f64>,
    #[serde(rename = "hostingBaseCostINR")]
    pub hosting_base_cost_inr: Option<f64>,
    #[serde(rename = "hostingUsersCostINR")]
    pub hosting_users_cost_inr: Option<f64>,
    #[serde(rename = "hostingCallsCostINR")]
    pub hosting_calls_cost_inr: Option<f64>,
    #[serde(rename = "hostingCostINR")]
    pub hosting_cost_inr: Option<f64>,
    #[serde(rename = "miscExpensesINR")]
    pub misc_expenses_inr: Option<f64>,
}

/// One ranked combination from the engine response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    /// Avatar plan, when reported.
    pub avatar_plan: Option<AvatarPlan>,
    /// Voice agent; `None` means the avatar's inbuilt voice.
    pub voice_agent: Option<VoiceAgent>,
    /// Hosting option, when reported.
    pub hosting_option: Option<HostingOption>,
    /// Cost breakdown, when reported.
    pub breakdown: Option<CostBreakdown>,
    /// Whether the combination fits the budget.
    pub fits_budget: Option<bool>,
    /// Engine ranking score; higher is better.
    pub score: Option<f64>,
    /// Number of avatar accounts.
    pub avatar_accounts: Option<f64>,
    /// Number of voice agent accounts.
    pub voice_accounts: Option<f64>,
    /// Human readable warnings.
    pub warnings: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_missing_records_decode_to_none() {
        let result: ScenarioResult = serde_json::from_str(
            r#"{"id":"x","voiceAgent":null,"avatarPlan":{"provider":"HeyGen","monthlyPrice":29},"warnings":null}"#,
        )
        .expect("decode");
        assert!(result.voice_agent.is_none());
        assert!(result.breakdown.is_none());
        assert!(result.warnings.is_none());
        assert_eq!(
            result.avatar_plan.and_then(|plan| plan.provider),
            Some("HeyGen".to_string())
        );
    }

    #[test]
    fn breakdown_keeps_upper_case_currency_suffixes() {
        let breakdown: CostBreakdown = serde_json::from_str(
            r#"{"totalCostINR": 81234.5, "voicePerMinuteCostUSD": 0.08, "miscExpensesINR": 2000}"#,
        )
        .expect("decode");
        assert_eq!(breakdown.total_cost_inr, Some(81234.5));
        assert_eq!(breakdown.voice_per_minute_cost_usd, Some(0.08));
        assert_eq!(breakdown.misc_expenses_inr, Some(2000.0));
        assert_eq!(breakdown.total_cost_usd, None);
    }
}
