use cg_engine::{AvatarPlan, CostBreakdown, ScenarioResult};
use cg_sheet::{Cell, Table};

/// Column names of every generated report, in sheet order.
pub const COLUMNS: [&str; 31] = [
    "Rank",
    "Fits Budget",
    "Score",
    "Total Cost (INR)",
    "Total Cost (USD)",
    "Avatar Provider",
    "Avatar Plan",
    "Avatar Accounts",
    "Voice Agent",
    "Voice Accounts",
    "Hosting Option",
    "Avatar Tier",
    "Avatar Minutes Included",
    "Avatar Additional Minutes",
    "Avatar Additional $/min",
    "Avatar Base Cost (USD)",
    "Avatar Additional Cost (USD)",
    "Avatar Total Cost (INR)",
    "Voice Pricing Model",
    "Voice Total Tokens",
    "Voice Base/Minimum (USD)",
    "Voice Per-Minute Cost (USD)",
    "Voice Total Cost (INR)",
    "Voice Total Cost (USD)",
    "Hosting Base (INR)",
    "Hosting Users Cost (INR)",
    "Hosting Calls Cost (INR)",
    "Hosting Total (INR)",
    "Misc Expenses (INR)",
    "Warnings",
    "Plan Note",
];

/// Voice agent label used when the avatar speaks with its own voice.
pub const INBUILT_VOICE_AGENT: &str = "Inbuilt (Avatar)";
/// Voice pricing model label used when no voice agent is priced.
pub const INBUILT_PRICING_MODEL: &str = "inbuilt";

/// One scenario laid out in [`COLUMNS`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    cells: Vec<Cell>,
}

impl FlatRow {
    /// Value of the named column.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        COLUMNS
            .iter()
            .position(|name| *name == column)
            .map(|idx| &self.cells[idx])
    }

    /// Cells in [`COLUMNS`] order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Owned copy of the cells, ready to append to a [`Table`].
    pub fn to_row(&self) -> Vec<Cell> {
        self.cells.clone()
    }
}

fn number_or_zero(value: Option<f64>) -> Cell {
    Cell::Number(value.unwrap_or(0.0))
}

// Absent and zero both render as a blank cell.
fn number_or_blank(value: Option<f64>) -> Cell {
    match value {
        Some(value) if value != 0.0 => Cell::Number(value),
        _ => Cell::Empty,
    }
}

fn text_or_empty(value: Option<&str>) -> Cell {
    value.map(Cell::text).unwrap_or(Cell::Empty)
}

/// Flattens one engine scenario into a report row; `rank` is 1-based.
pub fn flatten(result: &ScenarioResult, rank: usize) -> FlatRow {
    let plan = result.avatar_plan.clone().unwrap_or_default();
    let costs = result.breakdown.clone().unwrap_or_default();
    let AvatarPlan {
        provider,
        name: plan_name,
        tier,
        minutes,
        additional_per_min,
        note,
    } = plan;
    let CostBreakdown {
        total_cost_inr,
        total_cost_usd,
        avatar_additional_minutes,
        avatar_base_cost_usd,
        avatar_additional_cost_usd,
        avatar_cost_inr,
        voice_total_tokens,
        voice_base_cost_usd,
        voice_per_minute_cost_usd,
        voice_cost_inr,
        voice_cost_usd,
        hosting_base_cost_inr,
        hosting_users_cost_inr,
        hosting_calls_cost_inr,
        hosting_cost_inr,
        misc_expenses_inr,
    } = costs;

    let voice_agent = result.voice_agent.as_ref();
    let voice_name = voice_agent
        .and_then(|agent| agent.name.as_deref())
        .unwrap_or(INBUILT_VOICE_AGENT);
    let pricing_model = voice_agent
        .and_then(|agent| agent.pricing_model.as_deref())
        .unwrap_or(INBUILT_PRICING_MODEL);
    let hosting = result
        .hosting_option
        .as_ref()
        .and_then(|option| option.name.as_deref());
    let fits = if result.fits_budget.unwrap_or(false) { "Yes" } else { "No" };
    let warnings = result
        .warnings
        .as_deref()
        .map(|warnings| warnings.join("; "))
        .unwrap_or_default();

    let cells = vec![
        Cell::Number(rank as f64),
        Cell::text(fits),
        Cell::Number(result.score.unwrap_or(0.0).round_ties_even()),
        number_or_zero(total_cost_inr),
        number_or_zero(total_cost_usd),
        text_or_empty(provider.as_deref()),
        text_or_empty(plan_name.as_deref()),
        number_or_zero(result.avatar_accounts),
        Cell::text(voice_name),
        number_or_zero(result.voice_accounts),
        text_or_empty(hosting),
        text_or_empty(tier.as_deref()),
        number_or_zero(minutes),
        number_or_zero(avatar_additional_minutes),
        number_or_zero(additional_per_min),
        number_or_zero(avatar_base_cost_usd),
        number_or_zero(avatar_additional_cost_usd),
        number_or_zero(avatar_cost_inr),
        Cell::text(pricing_model),
        number_or_blank(voice_total_tokens),
        number_or_blank(voice_base_cost_usd),
        number_or_blank(voice_per_minute_cost_usd),
        number_or_zero(voice_cost_inr),
        number_or_zero(voice_cost_usd),
        number_or_zero(hosting_base_cost_inr),
        number_or_zero(hosting_users_cost_inr),
        number_or_zero(hosting_calls_cost_inr),
        number_or_zero(hosting_cost_inr),
        number_or_zero(misc_expenses_inr),
        Cell::text(warnings),
        text_or_empty(note.as_deref()),
    ];
    debug_assert_eq!(cells.len(), COLUMNS.len());
    FlatRow { cells }
}

/// Flattens a ranked result list, numbering ranks from 1 in list order.
pub fn flatten_all(results: &[ScenarioResult]) -> Vec<FlatRow> {
    results
        .iter()
        .enumerate()
        .map(|(idx, result)| flatten(result, idx + 1))
        .collect()
}

/// Builds a report table with the [`COLUMNS`] header.
pub fn rows_to_table(rows: &[FlatRow]) -> Table {
    let mut table = Table::new(COLUMNS);
    for row in rows {
        table.push_row(row.to_row());
    }
    table
}
