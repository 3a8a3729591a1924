use serde::Serialize;

use super::home::HomePlan;
use super::sensitivity::Sensitivity;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueMode {
    #[default]
    Nominal,
    PresentValue,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetStrategyKind {
    #[default]
    DiscountedCashFlow,
    GrowingAnnuity,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeInputs {
    pub buy_age: f64,
    pub value_today: f64,
    pub down_payment_pct: f64,
    pub loan_rate: f64,
}

/// One snapshot of everything a FIRE run depends on.
///
/// Ages are in years and may be fractional. Rates are annual percentages.
/// Monetary values share one base unit.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub current_age: f64,
    pub retirement_age: f64,
    pub life_expectancy: f64,
    pub pre_retirement_monthly_expense: f64,
    pub post_retirement_expense_pct: f64,
    pub inflation_rate: f64,
    pub dependent_inflation_rate: f64,
    pub pre_retirement_return_rate: f64,
    pub post_retirement_return_rate: f64,
    pub current_corpus: f64,
    pub monthly_contribution: f64,
    pub contribution_growth_rate: f64,
    /// Safe withdrawal rate in percent, for the rule-of-thumb FIRE number.
    pub withdrawal_rate: f64,
    pub home: Option<HomeInputs>,
    pub dependent_birth_ages: Vec<f64>,
    pub value_mode: ValueMode,
    pub target_strategy: TargetStrategyKind,
}

impl Inputs {
    pub fn post_retirement_monthly_expense(&self) -> f64 {
        self.pre_retirement_monthly_expense * self.post_retirement_expense_pct / 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub month: u32,
    pub age: u32,
    pub net_worth: f64,
    pub monthly_income: f64,
    pub monthly_expense: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(
    tag = "status",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum DownPaymentCheck {
    NotApplicable,
    Sustainable {
        down_payment_pct: f64,
    },
    Unsustainable {
        corpus_before_down_payment: f64,
        corpus_after_down_payment: f64,
        suggested_max_pct: f64,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireReport {
    pub strategy: TargetStrategyKind,
    pub value_mode: ValueMode,
    pub months_to_retirement: u32,
    pub retirement_months: u32,
    pub pre_retirement_monthly_expense: f64,
    pub post_retirement_monthly_expense: f64,
    pub required_at_retirement: f64,
    pub fire_number_today: f64,
    pub withdrawal_rule_fire_number: f64,
    pub months_to_target: Option<u32>,
    pub progress_pct: f64,
    pub sensitivity: Sensitivity,
    pub home_plan: HomePlan,
    pub down_payment: DownPaymentCheck,
    pub projection: Vec<ProjectionPoint>,
    pub ready: bool,
}
