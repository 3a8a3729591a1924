use super::rates::growth_factor;

/// Monthly base cost in today's money by dependent age, `[from, to)`.
const EXPENSE_BRACKETS: [(f64, f64, f64); 4] = [
    (1.0, 7.0, 10_000.0),
    (7.0, 17.0, 20_000.0),
    (17.0, 19.0, 30_000.0),
    (19.0, 23.0, 50_000.0),
];

pub fn base_monthly_cost(dependent_age: f64) -> f64 {
    EXPENSE_BRACKETS
        .iter()
        .find(|(from, to, _)| dependent_age >= *from && dependent_age < *to)
        .map(|(_, _, cost)| *cost)
        .unwrap_or(0.0)
}

/// Age-bracketed dependent costs, inflated on their own track.
#[derive(Debug, Clone, Copy)]
pub struct DependentExpenseModel<'a> {
    current_age: f64,
    birth_ages: &'a [f64],
    inflation_rate: f64,
}

impl<'a> DependentExpenseModel<'a> {
    /// `birth_ages` are the parent's ages when each dependent was born.
    pub fn new(current_age: f64, birth_ages: &'a [f64], inflation_rate: f64) -> Self {
        Self {
            current_age,
            birth_ages,
            inflation_rate,
        }
    }

    pub fn monthly_expense(&self, month: u32) -> f64 {
        if self.birth_ages.is_empty() {
            return 0.0;
        }
        let year_offset = month as f64 / 12.0;
        let parent_age = self.current_age + year_offset;
        let inflation = growth_factor(self.inflation_rate, year_offset.max(0.0));
        self.birth_ages
            .iter()
            .map(|birth_age| base_monthly_cost(parent_age - birth_age) * inflation)
            .sum()
    }
}
