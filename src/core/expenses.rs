use serde::Deserialize;

/// Expense summary as published by the statement dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExpenseHistory {
    pub total_expense: f64,
    pub monthly_expenses: Vec<MonthlyExpense>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MonthlyExpense {
    pub month: Option<String>,
    pub amount: f64,
}

impl ExpenseHistory {
    /// Average month times twelve, or the lump total when no months are listed.
    pub fn estimated_annual_expense(&self) -> f64 {
        if self.monthly_expenses.is_empty() {
            return self.total_expense;
        }
        let total: f64 = self.monthly_expenses.iter().map(|row| row.amount).sum();
        total / self.monthly_expenses.len() as f64 * 12.0
    }

    pub fn estimated_monthly_expense(&self) -> f64 {
        self.estimated_annual_expense() / 12.0
    }
}
