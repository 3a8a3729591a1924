use super::engine::Simulator;
use super::error::{FireError, Result};
use super::rates::{annual_to_monthly_rate, growth_factor};
use super::types::TargetStrategyKind;

/// How much corpus must exist at the retirement month to fund retirement.
pub trait RetirementTargetStrategy {
    fn kind(&self) -> TargetStrategyKind;

    fn required_at_retirement(
        &self,
        simulator: &Simulator<'_>,
        pre_retirement_monthly_expense: f64,
    ) -> f64;
}

/// Discounts every retirement month's full outgoings (living, dependents,
/// home) back to the retirement month at the post-retirement return.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscountedCashFlow;

impl RetirementTargetStrategy for DiscountedCashFlow {
    fn kind(&self) -> TargetStrategyKind {
        TargetStrategyKind::DiscountedCashFlow
    }

    fn required_at_retirement(
        &self,
        simulator: &Simulator<'_>,
        pre_retirement_monthly_expense: f64,
    ) -> f64 {
        let horizons = simulator.horizons();
        let discount = 1.0 + simulator.monthly_post_return();
        (0..horizons.retirement_months)
            .map(|month| {
                let absolute = horizons.months_to_retirement + month;
                let expense = simulator.base_expense(absolute, pre_retirement_monthly_expense)
                    + simulator.dependent_expense(absolute)
                    + simulator.home().expense_for(absolute);
                expense / discount.powi(month as i32)
            })
            .sum()
    }
}

/// Closed-form growing annuity-due: the first retirement month's living
/// expense, growing with general inflation, paid every month of retirement.
///
/// Ignores dependents and home payments.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrowingAnnuity;

impl RetirementTargetStrategy for GrowingAnnuity {
    fn kind(&self) -> TargetStrategyKind {
        TargetStrategyKind::GrowingAnnuity
    }

    fn required_at_retirement(
        &self,
        simulator: &Simulator<'_>,
        pre_retirement_monthly_expense: f64,
    ) -> f64 {
        let horizons = simulator.horizons();
        let first_payment =
            simulator.base_expense(horizons.months_to_retirement, pre_retirement_monthly_expense);
        let monthly_inflation = annual_to_monthly_rate(simulator.inputs().inflation_rate);
        let ratio = (1.0 + monthly_inflation) / (1.0 + simulator.monthly_post_return());
        let n = horizons.retirement_months as f64;

        if (1.0 - ratio).abs() < 1e-12 {
            first_payment * n
        } else {
            first_payment * (1.0 - ratio.powf(n)) / (1.0 - ratio)
        }
    }
}

impl TargetStrategyKind {
    pub fn strategy(self) -> &'static dyn RetirementTargetStrategy {
        match self {
            TargetStrategyKind::DiscountedCashFlow => &DiscountedCashFlow,
            TargetStrategyKind::GrowingAnnuity => &GrowingAnnuity,
        }
    }
}

/// `required_at_retirement` in today's money.
pub fn fire_number_today(
    required_at_retirement: f64,
    inflation_rate: f64,
    months_to_retirement: u32,
) -> f64 {
    required_at_retirement / growth_factor(inflation_rate, months_to_retirement as f64 / 12.0)
}

/// Corpus that funds `annual_expense` at a flat withdrawal rate, rounded to
/// two decimals.
pub fn withdrawal_rate_fire_number(annual_expense: f64, withdrawal_rate_pct: f64) -> Result<f64> {
    if withdrawal_rate_pct <= 0.0 {
        return Err(FireError::NonPositiveWithdrawalRate);
    }
    let number = annual_expense / (withdrawal_rate_pct / 100.0);
    Ok((number * 100.0).round() / 100.0)
}
