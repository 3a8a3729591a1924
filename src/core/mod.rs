mod dependents;
mod engine;
mod error;
mod expenses;
mod home;
mod loan;
mod rates;
mod sensitivity;
mod solver;
mod target;
mod types;
mod validate;

pub use dependents::{DependentExpenseModel, base_monthly_cost};
pub use engine::{
    MonthFlows, Simulator, check_down_payment, project_lifetime, run_fire_model,
    run_fire_model_with, step,
};
pub use error::FireError;
pub use expenses::{ExpenseHistory, MonthlyExpense};
pub use home::{HOME_LOAN_MONTHS, HOME_LOAN_TENURE_YEARS, HOME_PRICE_INFLATION_RATE, HomePlan};
pub use loan::monthly_installment;
pub use rates::{annual_to_monthly_rate, growth_factor, months_between};
pub use sensitivity::{HorizonShift, ScenarioOutcome, Sensitivity, analyze_sensitivity};
pub use solver::{DEFAULT_HORIZON_MONTHS, SavingsPlan, SearchConfig, months_to_target};
pub use target::{
    DiscountedCashFlow, GrowingAnnuity, RetirementTargetStrategy, fire_number_today,
    withdrawal_rate_fire_number,
};
pub use types::{
    DownPaymentCheck, FireReport, HomeInputs, Inputs, ProjectionPoint, TargetStrategyKind,
    ValueMode,
};
pub use validate::{Horizons, MAX_HORIZON_MONTHS, validate};
