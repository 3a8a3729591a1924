use super::rates::annual_to_monthly_rate;

/// Fixed monthly installment (EMI) that repays `principal` over
/// `tenure_years` at `annual_rate_pct`, compounded monthly.
pub fn monthly_installment(principal: f64, annual_rate_pct: f64, tenure_years: f64) -> f64 {
    let principal = principal.max(0.0);
    if principal == 0.0 {
        return 0.0;
    }
    let months = tenure_months(tenure_years);
    let r = annual_to_monthly_rate(annual_rate_pct.max(0.0));
    if r == 0.0 {
        return principal / months as f64;
    }
    let factor = (1.0 + r).powi(months as i32);
    principal * r * factor / (factor - 1.0)
}

pub fn tenure_months(tenure_years: f64) -> u32 {
    let months = (tenure_years * 12.0).round();
    if months.is_finite() && months >= 1.0 {
        months as u32
    } else {
        1
    }
}
