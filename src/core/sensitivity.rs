use serde::Serialize;

use super::engine::Simulator;
use super::solver::{SavingsPlan, SearchConfig, months_to_target};
use super::target::RetirementTargetStrategy;

pub const REDUCED_EXPENSE_SCALE: f64 = 0.9;
pub const INCREASED_EXPENSE_SCALE: f64 = 1.1;

/// How a scenario's time-to-target compares with the base run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "months", rename_all = "kebab-case")]
pub enum HorizonShift {
    Unchanged,
    Earlier(u32),
    Later(u32),
    BecomesReachable,
    MovesBeyondHorizon,
    StillUnreachable,
}

impl HorizonShift {
    pub fn between(base: Option<u32>, scenario: Option<u32>) -> Self {
        match (base, scenario) {
            (Some(base), Some(scenario)) if scenario == base => Self::Unchanged,
            (Some(base), Some(scenario)) if scenario < base => Self::Earlier(base - scenario),
            (Some(base), Some(scenario)) => Self::Later(scenario - base),
            (None, Some(_)) => Self::BecomesReachable,
            (Some(_), None) => Self::MovesBeyondHorizon,
            (None, None) => Self::StillUnreachable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub expense_scale: f64,
    pub pre_retirement_monthly_expense: f64,
    pub required_at_retirement: f64,
    pub months_to_target: Option<u32>,
    pub shift: HorizonShift,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensitivity {
    pub reduced_expense: ScenarioOutcome,
    pub increased_expense: ScenarioOutcome,
}

pub fn analyze_sensitivity(
    simulator: &Simulator<'_>,
    strategy: &dyn RetirementTargetStrategy,
    plan: &SavingsPlan,
    config: SearchConfig,
    base_months: Option<u32>,
) -> Sensitivity {
    let scenario = |expense_scale: f64| {
        let pre_retirement_monthly_expense =
            simulator.inputs().pre_retirement_monthly_expense * expense_scale;
        let required_at_retirement =
            strategy.required_at_retirement(simulator, pre_retirement_monthly_expense);
        let months_to_target =
            months_to_target(required_at_retirement, plan, simulator.home(), config);
        ScenarioOutcome {
            expense_scale,
            pre_retirement_monthly_expense,
            required_at_retirement,
            months_to_target,
            shift: HorizonShift::between(base_months, months_to_target),
        }
    };

    Sensitivity {
        reduced_expense: scenario(REDUCED_EXPENSE_SCALE),
        increased_expense: scenario(INCREASED_EXPENSE_SCALE),
    }
}
