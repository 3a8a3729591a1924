use tracing::{debug, warn};

use super::dependents::DependentExpenseModel;
use super::error::{FireError, Result};
use super::home::HomePlan;
use super::rates::{annual_to_monthly_rate, growth_factor};
use super::sensitivity::analyze_sensitivity;
use super::solver::{SavingsPlan, SearchConfig, months_to_target};
use super::target::{fire_number_today, withdrawal_rate_fire_number};
use super::types::{DownPaymentCheck, FireReport, Inputs, ProjectionPoint, ValueMode};
use super::validate::{Horizons, validate};

/// One month of the corpus recurrence.
///
/// Every walk over the timeline (goal seeking, lifetime projection, the
/// down-payment check) advances the corpus through this function.
pub fn step(corpus: f64, growth_rate: f64, income: f64, expense: f64) -> f64 {
    corpus * (1.0 + growth_rate) + income - expense
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthFlows {
    pub growth_rate: f64,
    pub income: f64,
    pub base_expense: f64,
    pub dependent_expense: f64,
    pub home_expense: f64,
}

impl MonthFlows {
    pub fn total_expense(self) -> f64 {
        self.base_expense + self.dependent_expense + self.home_expense
    }
}

/// Time-indexed view of one validated input set.
#[derive(Debug, Clone)]
pub struct Simulator<'a> {
    inputs: &'a Inputs,
    home: &'a HomePlan,
    horizons: Horizons,
    dependents: DependentExpenseModel<'a>,
    monthly_pre_return: f64,
    monthly_post_return: f64,
    monthly_contribution_growth: f64,
}

impl<'a> Simulator<'a> {
    pub fn new(inputs: &'a Inputs, home: &'a HomePlan, horizons: Horizons) -> Self {
        Self {
            inputs,
            home,
            horizons,
            dependents: DependentExpenseModel::new(
                inputs.current_age,
                &inputs.dependent_birth_ages,
                inputs.dependent_inflation_rate,
            ),
            monthly_pre_return: annual_to_monthly_rate(inputs.pre_retirement_return_rate),
            monthly_post_return: annual_to_monthly_rate(inputs.post_retirement_return_rate),
            monthly_contribution_growth: annual_to_monthly_rate(inputs.contribution_growth_rate),
        }
    }

    pub fn inputs(&self) -> &Inputs {
        self.inputs
    }

    pub fn home(&self) -> &HomePlan {
        self.home
    }

    pub fn horizons(&self) -> Horizons {
        self.horizons
    }

    pub fn monthly_post_return(&self) -> f64 {
        self.monthly_post_return
    }

    pub fn is_working(&self, month: u32) -> bool {
        month < self.horizons.months_to_retirement
    }

    pub fn growth_rate(&self, month: u32) -> f64 {
        if self.is_working(month) {
            self.monthly_pre_return
        } else {
            self.monthly_post_return
        }
    }

    pub fn income(&self, month: u32) -> f64 {
        if self.is_working(month) {
            self.inputs.monthly_contribution
                * (1.0 + self.monthly_contribution_growth).powi(month as i32)
        } else {
            0.0
        }
    }

    /// Living expense for `month`, scaled from a pre-retirement monthly
    /// expense so that sensitivity scenarios can reuse the same timeline.
    pub fn base_expense(&self, month: u32, pre_retirement_monthly_expense: f64) -> f64 {
        let today = if self.is_working(month) {
            pre_retirement_monthly_expense
        } else {
            pre_retirement_monthly_expense * self.inputs.post_retirement_expense_pct / 100.0
        };
        today * self.inflation_factor(month)
    }

    pub fn dependent_expense(&self, month: u32) -> f64 {
        self.dependents.monthly_expense(month)
    }

    pub fn inflation_factor(&self, month: u32) -> f64 {
        growth_factor(self.inputs.inflation_rate, month as f64 / 12.0)
    }

    pub fn flows(&self, month: u32) -> MonthFlows {
        MonthFlows {
            growth_rate: self.growth_rate(month),
            income: self.income(month),
            base_expense: self.base_expense(month, self.inputs.pre_retirement_monthly_expense),
            dependent_expense: self.dependent_expense(month),
            home_expense: self.home.expense_for(month),
        }
    }
}

/// Month-by-month walk from today to end of life, sampled once a year and
/// at the final month.
pub fn project_lifetime(simulator: &Simulator<'_>) -> Vec<ProjectionPoint> {
    let inputs = simulator.inputs();
    let total_months = simulator.horizons().total_months;
    let mut points = Vec::with_capacity(total_months as usize / 12 + 2);
    let mut corpus = inputs.current_corpus;

    for month in 0..=total_months {
        let flows = simulator.flows(month);
        let expense = flows.total_expense();

        if month % 12 == 0 || month == total_months {
            let divisor = match inputs.value_mode {
                ValueMode::Nominal => 1.0,
                ValueMode::PresentValue => simulator.inflation_factor(month),
            };
            points.push(ProjectionPoint {
                month,
                age: (inputs.current_age + month as f64 / 12.0).round() as u32,
                net_worth: corpus / divisor,
                monthly_income: flows.income / divisor,
                monthly_expense: expense / divisor,
            });
        }

        corpus = step(corpus, flows.growth_rate, flows.income, expense);
    }

    points
}

/// Walks up to the purchase month and checks the balance left once the down
/// payment has gone out.
pub fn check_down_payment(simulator: &Simulator<'_>) -> DownPaymentCheck {
    let home = simulator.home();
    let Some(down_payment_pct) = simulator.inputs().home.map(|h| h.down_payment_pct) else {
        return DownPaymentCheck::NotApplicable;
    };
    if !home.enabled {
        return DownPaymentCheck::NotApplicable;
    }

    let mut corpus = simulator.inputs().current_corpus;
    for month in 0..home.purchase_month {
        let flows = simulator.flows(month);
        corpus = step(corpus, flows.growth_rate, flows.income, flows.total_expense());
    }

    let purchase = home.purchase_month;
    let flows = simulator.flows(purchase);
    // The purchase month's installment is paid before the down payment is judged.
    let corpus_before_down_payment = step(
        corpus,
        flows.growth_rate,
        flows.income,
        flows.base_expense + flows.dependent_expense + home.installment_for(purchase),
    );
    let corpus_after_down_payment = corpus_before_down_payment - home.down_payment_for(purchase);

    if corpus_after_down_payment >= 0.0 {
        return DownPaymentCheck::Sustainable { down_payment_pct };
    }

    let suggested_max_pct = (corpus_before_down_payment.max(0.0)
        / home.inflated_price_at_purchase
        * 100.0)
        .clamp(0.0, 100.0);
    warn!(
        purchase_month = purchase,
        corpus_after_down_payment, suggested_max_pct, "down payment drives net worth negative"
    );
    DownPaymentCheck::Unsustainable {
        corpus_before_down_payment,
        corpus_after_down_payment,
        suggested_max_pct,
    }
}

pub fn run_fire_model(inputs: &Inputs) -> Result<FireReport> {
    run_fire_model_with(inputs, SearchConfig::default())
}

pub fn run_fire_model_with(inputs: &Inputs, config: SearchConfig) -> Result<FireReport> {
    let horizons = validate(inputs)?;
    let home = HomePlan::from_inputs(inputs.current_age, inputs.home.as_ref());
    let simulator = Simulator::new(inputs, &home, horizons);

    let strategy = inputs.target_strategy.strategy();
    let required_at_retirement =
        strategy.required_at_retirement(&simulator, inputs.pre_retirement_monthly_expense);
    let fire_number_today = fire_number_today(
        required_at_retirement,
        inputs.inflation_rate,
        horizons.months_to_retirement,
    );
    ensure_finite("required corpus at retirement", required_at_retirement)?;
    ensure_finite("FIRE number in today's money", fire_number_today)?;
    let withdrawal_rule_fire_number = withdrawal_rate_fire_number(
        inputs.pre_retirement_monthly_expense * 12.0,
        inputs.withdrawal_rate,
    )?;

    let plan = SavingsPlan::from_inputs(inputs);
    let months_to_target = months_to_target(required_at_retirement, &plan, &home, config);
    debug!(
        months_to_retirement = horizons.months_to_retirement,
        retirement_months = horizons.retirement_months,
        required_at_retirement,
        fire_number_today,
        ?months_to_target,
        "fire target computed"
    );

    let sensitivity = analyze_sensitivity(&simulator, strategy, &plan, config, months_to_target);
    let down_payment = check_down_payment(&simulator);
    let projection = project_lifetime(&simulator);
    let ready = projection.last().is_none_or(|point| point.net_worth >= 0.0);

    let progress_pct = if fire_number_today > 0.0 {
        (inputs.current_corpus / fire_number_today * 100.0).min(100.0)
    } else {
        0.0
    };

    Ok(FireReport {
        strategy: inputs.target_strategy,
        value_mode: inputs.value_mode,
        months_to_retirement: horizons.months_to_retirement,
        retirement_months: horizons.retirement_months,
        pre_retirement_monthly_expense: inputs.pre_retirement_monthly_expense,
        post_retirement_monthly_expense: inputs.post_retirement_monthly_expense(),
        required_at_retirement,
        fire_number_today,
        withdrawal_rule_fire_number,
        months_to_target,
        progress_pct,
        sensitivity,
        home_plan: home,
        down_payment,
        projection,
        ready,
    })
}

fn ensure_finite(quantity: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FireError::NotComputable { quantity })
    }
}
