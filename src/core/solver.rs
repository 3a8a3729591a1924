use super::engine::step;
use super::home::HomePlan;
use super::rates::annual_to_monthly_rate;
use super::types::Inputs;

/// 100 years; past this a target counts as unreachable.
pub const DEFAULT_HORIZON_MONTHS: u32 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub horizon_months: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }
}

/// Savings side of the goal seek: a starting corpus plus a contribution that
/// rises with salary hikes, compounding at the pre-retirement return.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsPlan {
    pub current_corpus: f64,
    pub monthly_contribution: f64,
    pub annual_return_rate: f64,
    pub contribution_growth_rate: f64,
}

impl SavingsPlan {
    pub fn from_inputs(inputs: &Inputs) -> Self {
        Self {
            current_corpus: inputs.current_corpus,
            monthly_contribution: inputs.monthly_contribution,
            annual_return_rate: inputs.pre_retirement_return_rate,
            contribution_growth_rate: inputs.contribution_growth_rate,
        }
    }
}

/// Smallest month at which the corpus reaches `target`, or `None` when it
/// does not within the configured horizon.
///
/// Home cash flows are the only outgoings here; the contribution used in a
/// month is the one before that month's hike is applied.
pub fn months_to_target(
    target: f64,
    plan: &SavingsPlan,
    home: &HomePlan,
    config: SearchConfig,
) -> Option<u32> {
    if plan.current_corpus >= target {
        return Some(0);
    }

    let monthly_return = annual_to_monthly_rate(plan.annual_return_rate);
    let monthly_hike = annual_to_monthly_rate(plan.contribution_growth_rate);
    let mut corpus = plan.current_corpus;
    let mut contribution = plan.monthly_contribution;

    for month in 1..=config.horizon_months {
        corpus = step(corpus, monthly_return, contribution, home.expense_for(month));
        if corpus >= target {
            return Some(month);
        }
        contribution *= 1.0 + monthly_hike;
    }
    None
}
