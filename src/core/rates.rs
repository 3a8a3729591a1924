/// Monthly compounding rate that reproduces `annual_pct` after 12 months.
pub fn annual_to_monthly_rate(annual_pct: f64) -> f64 {
    (1.0 + annual_pct / 100.0).powf(1.0 / 12.0) - 1.0
}

/// Cumulative growth after `years` at `annual_pct` per year.
pub fn growth_factor(annual_pct: f64, years: f64) -> f64 {
    (1.0 + annual_pct / 100.0).powf(years)
}

/// Whole months between two ages, rounded half away from zero.
///
/// Every age-to-month conversion in the engine goes through here so that the
/// purchase month, retirement month and end of life agree with each other.
pub fn months_between(from_age: f64, to_age: f64) -> i64 {
    ((to_age - from_age) * 12.0).round() as i64
}

pub(crate) fn month_index(months: i64) -> u32 {
    u32::try_from(months.max(0)).unwrap_or(u32::MAX)
}
