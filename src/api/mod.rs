use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    DownPaymentCheck, ExpenseHistory, FireReport, HomeInputs, HorizonShift, Inputs,
    TargetStrategyKind, ValueMode, run_fire_model,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliValueMode {
    Nominal,
    PresentValue,
}

impl From<CliValueMode> for ValueMode {
    fn from(value: CliValueMode) -> Self {
        match value {
            CliValueMode::Nominal => ValueMode::Nominal,
            CliValueMode::PresentValue => ValueMode::PresentValue,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliTargetStrategy {
    DiscountedCashFlow,
    GrowingAnnuity,
}

impl From<CliTargetStrategy> for TargetStrategyKind {
    fn from(value: CliTargetStrategy) -> Self {
        match value {
            CliTargetStrategy::DiscountedCashFlow => TargetStrategyKind::DiscountedCashFlow,
            CliTargetStrategy::GrowingAnnuity => TargetStrategyKind::GrowingAnnuity,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiValueMode {
    Nominal,
    #[serde(alias = "present", alias = "presentValue", alias = "present_value")]
    PresentValue,
}

impl From<ApiValueMode> for CliValueMode {
    fn from(value: ApiValueMode) -> Self {
        match value {
            ApiValueMode::Nominal => CliValueMode::Nominal,
            ApiValueMode::PresentValue => CliValueMode::PresentValue,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiTargetStrategy {
    #[serde(alias = "dcf", alias = "discountedCashFlow")]
    DiscountedCashFlow,
    #[serde(alias = "annuity", alias = "growingAnnuity")]
    GrowingAnnuity,
}

impl From<ApiTargetStrategy> for CliTargetStrategy {
    fn from(value: ApiTargetStrategy) -> Self {
        match value {
            ApiTargetStrategy::DiscountedCashFlow => CliTargetStrategy::DiscountedCashFlow,
            ApiTargetStrategy::GrowingAnnuity => CliTargetStrategy::GrowingAnnuity,
        }
    }
}

/// Birth ages arrive as a JSON array or, from query strings, as `28,31`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BirthAgesField {
    List(Vec<f64>),
    Csv(String),
}

impl BirthAgesField {
    fn into_ages(self) -> Result<Vec<f64>, String> {
        match self {
            BirthAgesField::List(ages) => Ok(ages),
            BirthAgesField::Csv(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| {
                    part.parse::<f64>()
                        .map_err(|_| format!("Invalid dependent birth age: {part}"))
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FirePayload {
    current_age: Option<f64>,
    retirement_age: Option<f64>,
    life_expectancy: Option<f64>,

    pre_retirement_expense: Option<f64>,
    post_retirement_expense_pct: Option<f64>,
    inflation_rate: Option<f64>,
    dependent_inflation_rate: Option<f64>,

    pre_retirement_return: Option<f64>,
    post_retirement_return: Option<f64>,
    current_corpus: Option<f64>,
    monthly_contribution: Option<f64>,
    contribution_growth: Option<f64>,
    withdrawal_rate: Option<f64>,

    home_buy_age: Option<f64>,
    home_value_today: Option<f64>,
    home_down_payment_pct: Option<f64>,
    home_loan_rate: Option<f64>,

    dependent_birth_ages: Option<BirthAgesField>,
    value_mode: Option<ApiValueMode>,
    target_strategy: Option<ApiTargetStrategy>,
    expense_history: Option<ExpenseHistory>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fire-corpus",
    about = "FIRE corpus estimator (inflation, salary hikes, home loan, dependents)"
)]
pub struct Cli {
    #[arg(long, default_value_t = 30.0)]
    current_age: f64,
    #[arg(long, default_value_t = 50.0)]
    retirement_age: f64,
    #[arg(long, default_value_t = 85.0)]
    life_expectancy: f64,
    #[arg(
        long,
        default_value_t = 100_000.0,
        help = "Monthly living expense before retirement, in today's money"
    )]
    pre_retirement_expense: f64,
    #[arg(
        long,
        default_value_t = 80.0,
        help = "Post-retirement expense as percent of pre-retirement expense"
    )]
    post_retirement_expense_pct: f64,
    #[arg(long, default_value_t = 6.0, help = "General inflation in percent")]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Inflation of dependent costs (schooling, college) in percent"
    )]
    dependent_inflation_rate: f64,
    #[arg(long, default_value_t = 12.0, help = "Annual return before retirement in percent")]
    pre_retirement_return: f64,
    #[arg(long, default_value_t = 7.0, help = "Annual return after retirement in percent")]
    post_retirement_return: f64,
    #[arg(long, default_value_t = 2_000_000.0)]
    current_corpus: f64,
    #[arg(
        long,
        default_value_t = 50_000.0,
        help = "Monthly amount saved and invested until retirement"
    )]
    monthly_contribution: f64,
    #[arg(
        long,
        default_value_t = 8.0,
        help = "Annual growth of the monthly contribution in percent (salary hikes)"
    )]
    contribution_growth: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Safe withdrawal rate in percent for the rule-of-thumb FIRE number"
    )]
    withdrawal_rate: f64,
    #[arg(long, help = "Age at which a home is bought; omit for no home purchase")]
    home_buy_age: Option<f64>,
    #[arg(long, default_value_t = 0.0, help = "Home price in today's money")]
    home_value_today: f64,
    #[arg(long, default_value_t = 20.0, help = "Down payment in percent of the price")]
    home_down_payment_pct: f64,
    #[arg(long, default_value_t = 8.5, help = "Home loan interest in percent")]
    home_loan_rate: f64,
    #[arg(
        long = "dependent-birth-age",
        help = "Your age when a dependent was born; repeat per dependent"
    )]
    dependent_birth_ages: Vec<f64>,
    #[arg(long, value_enum, default_value_t = CliValueMode::Nominal)]
    value_mode: CliValueMode,
    #[arg(long, value_enum, default_value_t = CliTargetStrategy::DiscountedCashFlow)]
    target_strategy: CliTargetStrategy,
    #[arg(long, help = "Print the full JSON report instead of a summary")]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseEstimateResponse {
    annual_expense: f64,
    monthly_expense: f64,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn build_inputs(cli: &Cli) -> Inputs {
    Inputs {
        current_age: finite_or_zero(cli.current_age),
        retirement_age: finite_or_zero(cli.retirement_age),
        life_expectancy: finite_or_zero(cli.life_expectancy),
        pre_retirement_monthly_expense: finite_or_zero(cli.pre_retirement_expense),
        post_retirement_expense_pct: finite_or_zero(cli.post_retirement_expense_pct),
        inflation_rate: finite_or_zero(cli.inflation_rate),
        dependent_inflation_rate: finite_or_zero(cli.dependent_inflation_rate),
        pre_retirement_return_rate: finite_or_zero(cli.pre_retirement_return),
        post_retirement_return_rate: finite_or_zero(cli.post_retirement_return),
        current_corpus: finite_or_zero(cli.current_corpus),
        monthly_contribution: finite_or_zero(cli.monthly_contribution),
        contribution_growth_rate: finite_or_zero(cli.contribution_growth),
        withdrawal_rate: finite_or_zero(cli.withdrawal_rate),
        home: cli.home_buy_age.map(|buy_age| HomeInputs {
            buy_age: finite_or_zero(buy_age),
            value_today: finite_or_zero(cli.home_value_today),
            down_payment_pct: finite_or_zero(cli.home_down_payment_pct),
            loan_rate: finite_or_zero(cli.home_loan_rate),
        }),
        dependent_birth_ages: cli
            .dependent_birth_ages
            .iter()
            .copied()
            .map(finite_or_zero)
            .collect(),
        value_mode: cli.value_mode.into(),
        target_strategy: cli.target_strategy.into(),
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/fire", get(fire_get_handler).post(fire_post_handler))
        .route("/api/expense-estimate", post(expense_estimate_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("FIRE HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/api/fire");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn fire_get_handler(payload: Result<Query<FirePayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => fire_handler_impl(payload).await,
        Err(rejection) => rejected_payload(&rejection.body_text()),
    }
}

async fn fire_post_handler(payload: Result<Json<FirePayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => fire_handler_impl(payload).await,
        Err(rejection) => rejected_payload(&rejection.body_text()),
    }
}

fn rejected_payload(msg: &str) -> Response {
    warn!(error = %msg, "rejected FIRE payload");
    error_response(StatusCode::BAD_REQUEST, msg)
}

async fn fire_handler_impl(payload: FirePayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return rejected_payload(&msg),
    };

    match run_fire_model(&inputs) {
        Ok(report) => {
            info!(
                required_at_retirement = report.required_at_retirement,
                months_to_target = ?report.months_to_target,
                "FIRE report computed"
            );
            json_response(StatusCode::OK, report)
        }
        Err(e) => {
            warn!(error = %e, "FIRE inputs not computable");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

async fn expense_estimate_handler(
    history: Result<Json<ExpenseHistory>, JsonRejection>,
) -> Response {
    let history = match history {
        Ok(Json(history)) => history,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, &rejection.body_text());
        }
    };
    json_response(
        StatusCode::OK,
        ExpenseEstimateResponse {
            annual_expense: history.estimated_annual_expense(),
            monthly_expense: history.estimated_monthly_expense(),
        },
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<Inputs, String> {
    let payload = serde_json::from_str::<FirePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: FirePayload) -> Result<Inputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = v;
    }
    if let Some(v) = payload.life_expectancy {
        cli.life_expectancy = v;
    }

    if let Some(v) = payload.pre_retirement_expense {
        cli.pre_retirement_expense = v;
    }
    if let Some(v) = payload.post_retirement_expense_pct {
        cli.post_retirement_expense_pct = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.dependent_inflation_rate {
        cli.dependent_inflation_rate = v;
    }

    if let Some(v) = payload.pre_retirement_return {
        cli.pre_retirement_return = v;
    }
    if let Some(v) = payload.post_retirement_return {
        cli.post_retirement_return = v;
    }
    if let Some(v) = payload.current_corpus {
        cli.current_corpus = v;
    }
    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v;
    }
    if let Some(v) = payload.contribution_growth {
        cli.contribution_growth = v;
    }
    if let Some(v) = payload.withdrawal_rate {
        cli.withdrawal_rate = v;
    }

    if let Some(v) = payload.home_buy_age {
        cli.home_buy_age = Some(v);
    }
    if let Some(v) = payload.home_value_today {
        cli.home_value_today = v;
    }
    if let Some(v) = payload.home_down_payment_pct {
        cli.home_down_payment_pct = v;
    }
    if let Some(v) = payload.home_loan_rate {
        cli.home_loan_rate = v;
    }

    if let Some(v) = payload.dependent_birth_ages {
        cli.dependent_birth_ages = v.into_ages()?;
    }
    if let Some(v) = payload.value_mode {
        cli.value_mode = v.into();
    }
    if let Some(v) = payload.target_strategy {
        cli.target_strategy = v.into();
    }

    // A statement history only fills in an expense the caller left blank.
    if let Some(history) = payload.expense_history {
        if payload.pre_retirement_expense.is_none_or(|v| v == 0.0) {
            cli.pre_retirement_expense = history.estimated_monthly_expense();
        }
    }

    Ok(build_inputs(&cli))
}

fn default_cli_for_api() -> Cli {
    Cli::parse_from(["fire-corpus"])
}

pub fn run_report(cli: &Cli) -> Result<String, String> {
    let inputs = build_inputs(cli);
    let report = run_fire_model(&inputs).map_err(|e| format!("Enter valid inputs: {e}"))?;
    if cli.json {
        serde_json::to_string_pretty(&report).map_err(|e| format!("Failed to encode report: {e}"))
    } else {
        Ok(render_summary(&report))
    }
}

pub fn format_time_from_months(months: Option<u32>) -> String {
    let Some(months) = months else {
        return "100+ years".to_string();
    };
    let years = months / 12;
    let rem_months = months % 12;
    if years == 0 {
        format!("{rem_months} months")
    } else if rem_months == 0 {
        format!("{years} years")
    } else {
        format!("{years}y {rem_months}m")
    }
}

fn describe_shift(shift: HorizonShift) -> String {
    match shift {
        HorizonShift::Unchanged => " (no change)".to_string(),
        HorizonShift::Earlier(months) => format!(" ({months} months faster)"),
        HorizonShift::Later(months) => format!(" ({months} months later)"),
        HorizonShift::BecomesReachable => {
            " (becomes achievable within planning horizon)".to_string()
        }
        HorizonShift::MovesBeyondHorizon => " (moves beyond planning horizon)".to_string(),
        HorizonShift::StillUnreachable => String::new(),
    }
}

fn render_summary(report: &FireReport) -> String {
    let mut out = String::new();
    let reduced = &report.sensitivity.reduced_expense;
    let increased = &report.sensitivity.increased_expense;

    let _ = writeln!(
        out,
        "FIRE number at retirement: {:.0}",
        report.required_at_retirement
    );
    let _ = writeln!(out, "Today's value: {:.0}", report.fire_number_today);
    let _ = writeln!(
        out,
        "Withdrawal-rule FIRE number: {:.0}",
        report.withdrawal_rule_fire_number
    );
    let _ = writeln!(
        out,
        "Time to FIRE number: {}",
        format_time_from_months(report.months_to_target)
    );
    let _ = writeln!(
        out,
        "Monthly expense: {:.0} -> {:.0}",
        report.pre_retirement_monthly_expense, report.post_retirement_monthly_expense
    );
    let _ = writeln!(out, "Progress: {:.1}%", report.progress_pct);
    let _ = writeln!(
        out,
        "Cut expense by 10%: {}{}",
        format_time_from_months(reduced.months_to_target),
        describe_shift(reduced.shift)
    );
    let _ = writeln!(
        out,
        "Increase expense by 10%: {}{}",
        format_time_from_months(increased.months_to_target),
        describe_shift(increased.shift)
    );
    let home_line = match report.down_payment {
        DownPaymentCheck::NotApplicable => "Not applicable.".to_string(),
        DownPaymentCheck::Sustainable { down_payment_pct } => {
            format!("Current {down_payment_pct:.1}% is sustainable at purchase.")
        }
        DownPaymentCheck::Unsustainable {
            suggested_max_pct, ..
        } => format!(
            "Net worth goes negative at purchase. Suggested max downpayment: {suggested_max_pct:.1}%"
        ),
    };
    let _ = writeln!(out, "Home downpayment check: {home_line}");
    let _ = write!(
        out,
        "{}",
        if report.ready {
            "You are FIRE ready."
        } else {
            "You are not ready to FIRE."
        }
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        default_cli_for_api()
    }

    #[test]
    fn default_cli_matches_documented_scenario() {
        let inputs = build_inputs(&sample_cli());
        assert_approx(inputs.current_age, 30.0);
        assert_approx(inputs.retirement_age, 50.0);
        assert_approx(inputs.life_expectancy, 85.0);
        assert_approx(inputs.pre_retirement_monthly_expense, 100_000.0);
        assert_approx(inputs.post_retirement_expense_pct, 80.0);
        assert_approx(inputs.dependent_inflation_rate, 10.0);
        assert_approx(inputs.current_corpus, 2_000_000.0);
        assert!(inputs.home.is_none());
        assert!(inputs.dependent_birth_ages.is_empty());
        assert_eq!(inputs.value_mode, ValueMode::Nominal);
        assert_eq!(inputs.target_strategy, TargetStrategyKind::DiscountedCashFlow);
    }

    #[test]
    fn build_inputs_coerces_non_finite_numbers_to_zero() {
        let mut cli = sample_cli();
        cli.current_corpus = f64::NAN;
        cli.monthly_contribution = f64::INFINITY;
        cli.dependent_birth_ages = vec![f64::NEG_INFINITY, 28.0];
        let inputs = build_inputs(&cli);
        assert_eq!(inputs.current_corpus, 0.0);
        assert_eq!(inputs.monthly_contribution, 0.0);
        assert_eq!(inputs.dependent_birth_ages, vec![0.0, 28.0]);
    }

    #[test]
    fn cli_parses_repeated_dependents_and_home() {
        let cli = Cli::parse_from([
            "fire-corpus",
            "--current-age",
            "34",
            "--dependent-birth-age",
            "28",
            "--dependent-birth-age",
            "31",
            "--home-buy-age",
            "38",
            "--home-value-today",
            "7500000",
            "--value-mode",
            "present-value",
            "--target-strategy",
            "growing-annuity",
        ]);
        let inputs = build_inputs(&cli);
        assert_approx(inputs.current_age, 34.0);
        assert_eq!(inputs.dependent_birth_ages, vec![28.0, 31.0]);
        let home = inputs.home.expect("home inputs");
        assert_approx(home.buy_age, 38.0);
        assert_approx(home.value_today, 7_500_000.0);
        assert_approx(home.down_payment_pct, 20.0);
        assert_approx(home.loan_rate, 8.5);
        assert_eq!(inputs.value_mode, ValueMode::PresentValue);
        assert_eq!(inputs.target_strategy, TargetStrategyKind::GrowingAnnuity);
    }

    #[test]
    fn inputs_from_json_parses_web_keys() {
        let json = r#"{
          "currentAge": 32,
          "retirementAge": 45,
          "lifeExpectancy": 90,
          "preRetirementExpense": 150000,
          "postRetirementExpensePct": 70,
          "inflationRate": 5,
          "dependentInflationRate": 9,
          "preRetirementReturn": 11,
          "postRetirementReturn": 6.5,
          "currentCorpus": 3500000,
          "monthlyContribution": 120000,
          "contributionGrowth": 6,
          "withdrawalRate": 3.5,
          "homeBuyAge": 36,
          "homeValueToday": 9000000,
          "homeDownPaymentPct": 25,
          "homeLoanRate": 8.75,
          "dependentBirthAges": [29, 31.5],
          "valueMode": "present",
          "targetStrategy": "annuity"
        }"#;
        let inputs = inputs_from_json(json).expect("json should parse");

        assert_approx(inputs.current_age, 32.0);
        assert_approx(inputs.retirement_age, 45.0);
        assert_approx(inputs.life_expectancy, 90.0);
        assert_approx(inputs.pre_retirement_monthly_expense, 150_000.0);
        assert_approx(inputs.post_retirement_expense_pct, 70.0);
        assert_approx(inputs.inflation_rate, 5.0);
        assert_approx(inputs.dependent_inflation_rate, 9.0);
        assert_approx(inputs.pre_retirement_return_rate, 11.0);
        assert_approx(inputs.post_retirement_return_rate, 6.5);
        assert_approx(inputs.current_corpus, 3_500_000.0);
        assert_approx(inputs.monthly_contribution, 120_000.0);
        assert_approx(inputs.contribution_growth_rate, 6.0);
        assert_approx(inputs.withdrawal_rate, 3.5);
        assert_eq!(
            inputs.home,
            Some(HomeInputs {
                buy_age: 36.0,
                value_today: 9_000_000.0,
                down_payment_pct: 25.0,
                loan_rate: 8.75,
            })
        );
        assert_eq!(inputs.dependent_birth_ages, vec![29.0, 31.5]);
        assert_eq!(inputs.value_mode, ValueMode::PresentValue);
        assert_eq!(inputs.target_strategy, TargetStrategyKind::GrowingAnnuity);
    }

    #[test]
    fn query_string_accepts_comma_separated_birth_ages() {
        let uri: Uri = "http://localhost/api/fire?currentAge=31&dependentBirthAges=28,%2030&valueMode=present-value"
            .parse()
            .expect("valid uri");
        let Query(payload) = Query::<FirePayload>::try_from_uri(&uri).expect("query should parse");
        let inputs = inputs_from_payload(payload).expect("valid payload");
        assert_approx(inputs.current_age, 31.0);
        assert_eq!(inputs.dependent_birth_ages, vec![28.0, 30.0]);
        assert_eq!(inputs.value_mode, ValueMode::PresentValue);
    }

    #[test]
    fn malformed_birth_ages_are_rejected() {
        let err = inputs_from_json(r#"{"dependentBirthAges": "28,abc"}"#)
            .expect_err("should reject");
        assert!(err.contains("abc"), "unexpected error: {err}");
    }

    #[test]
    fn expense_history_seeds_blank_expense() {
        let json = r#"{
          "preRetirementExpense": 0,
          "expenseHistory": {
            "total_expense": 0,
            "monthly_expenses": [{"month": "2024-01", "amount": 60000}, {"month": "2024-02", "amount": 80000}]
          }
        }"#;
        let inputs = inputs_from_json(json).expect("json should parse");
        assert_approx(inputs.pre_retirement_monthly_expense, 70_000.0);
    }

    #[test]
    fn expense_history_does_not_override_explicit_expense() {
        let json = r#"{
          "preRetirementExpense": 90000,
          "expenseHistory": {"total_expense": 1200000}
        }"#;
        let inputs = inputs_from_json(json).expect("json should parse");
        assert_approx(inputs.pre_retirement_monthly_expense, 90_000.0);
    }

    #[test]
    fn format_time_from_months_matches_display_rules() {
        assert_eq!(format_time_from_months(None), "100+ years");
        assert_eq!(format_time_from_months(Some(0)), "0 months");
        assert_eq!(format_time_from_months(Some(7)), "7 months");
        assert_eq!(format_time_from_months(Some(24)), "2 years");
        assert_eq!(format_time_from_months(Some(151)), "12y 7m");
    }

    #[test]
    fn report_serialization_contains_expected_fields() {
        let mut cli = sample_cli();
        cli.home_buy_age = Some(35.0);
        cli.home_value_today = 6_000_000.0;
        let report = run_fire_model(&build_inputs(&cli)).expect("computable");
        let json = serde_json::to_value(&report).expect("report should serialize");

        for key in [
            "strategy",
            "valueMode",
            "monthsToRetirement",
            "retirementMonths",
            "requiredAtRetirement",
            "fireNumberToday",
            "withdrawalRuleFireNumber",
            "monthsToTarget",
            "progressPct",
            "sensitivity",
            "homePlan",
            "downPayment",
            "projection",
            "ready",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(json["strategy"], "discounted-cash-flow");
        assert_eq!(json["valueMode"], "nominal");
        assert_eq!(json["homePlan"]["enabled"], true);
        assert_eq!(json["homePlan"]["loanMonths"], 240);
        assert!(json["downPayment"]["status"].is_string());
        assert!(json["sensitivity"]["reducedExpense"]["requiredAtRetirement"].is_number());
        let first = &json["projection"][0];
        for key in ["month", "age", "netWorth", "monthlyIncome", "monthlyExpense"] {
            assert!(first.get(key).is_some(), "missing projection key {key}");
        }
    }

    #[test]
    fn report_summary_lists_outcomes() {
        let summary = run_report(&sample_cli()).expect("report");
        assert!(summary.starts_with("FIRE number at retirement: "));
        assert!(summary.contains("Withdrawal-rule FIRE number: 30000000"));
        assert!(summary.contains("Time to FIRE number: "));
        assert!(summary.contains("Cut expense by 10%: "));
        assert!(summary.contains("Increase expense by 10%: "));
        assert!(summary.contains("Home downpayment check: Not applicable."));
        assert!(summary.ends_with("ready to FIRE.") || summary.ends_with("FIRE ready."));
    }

    #[test]
    fn invalid_inputs_report_an_error() {
        let mut cli = sample_cli();
        cli.life_expectancy = 50.0;
        let err = run_report(&cli).expect_err("not computable");
        assert_eq!(
            err,
            "Enter valid inputs: life expectancy must be greater than retirement age"
        );
    }

    #[test]
    fn json_flag_prints_full_report() {
        let mut cli = sample_cli();
        cli.json = true;
        let out = run_report(&cli).expect("report");
        let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
        assert!(value["requiredAtRetirement"].as_f64().is_some_and(|v| v > 0.0));
    }

    #[test]
    fn shift_descriptions_match_sensitivity_lines() {
        assert_eq!(describe_shift(HorizonShift::Earlier(5)), " (5 months faster)");
        assert_eq!(describe_shift(HorizonShift::Later(3)), " (3 months later)");
        assert_eq!(
            describe_shift(HorizonShift::MovesBeyondHorizon),
            " (moves beyond planning horizon)"
        );
        assert_eq!(describe_shift(HorizonShift::StillUnreachable), "");
    }

    #[test]
    fn withdrawal_rate_flag_feeds_the_report() {
        let cli = Cli::parse_from(["fire-corpus", "--withdrawal-rate", "3"]);
        let report = run_fire_model(&build_inputs(&cli)).expect("computable");
        assert_approx(report.withdrawal_rule_fire_number, 40_000_000.0);

        let mut cli = sample_cli();
        cli.withdrawal_rate = 0.0;
        let err = run_report(&cli).expect_err("not computable");
        assert_eq!(
            err,
            "Enter valid inputs: withdrawal rate must be greater than zero"
        );
    }

    async fn error_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json error body")
    }

    fn assert_no_store(response: &Response) {
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&header::HeaderValue::from_static("no-store"))
        );
    }

    #[tokio::test]
    async fn malformed_query_gets_json_error() {
        let uri: Uri = "http://localhost/api/fire?currentAge=abc"
            .parse()
            .expect("valid uri");
        let rejection = Query::<FirePayload>::try_from_uri(&uri)
            .err()
            .expect("query should be rejected");

        let response = fire_get_handler(Err(rejection)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_no_store(&response);
        assert!(error_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_json_gets_json_error() {
        let rejection = Json::<FirePayload>::from_bytes(br#"{"currentAge": "abc"}"#)
            .err()
            .expect("body should be rejected");

        let response = fire_post_handler(Err(rejection)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_no_store(&response);
        assert!(error_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn oversized_lifetime_is_a_bad_request() {
        let payload = FirePayload {
            life_expectancy: Some(13_000.0),
            ..FirePayload::default()
        };
        let response = fire_handler_impl(payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_no_store(&response);
        let body = error_body(response).await;
        assert_eq!(
            body["error"],
            "planning horizon must not exceed 1800 months"
        );
    }
}
