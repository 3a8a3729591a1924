use serde::Serialize;

use super::loan::monthly_installment;
use super::rates::{growth_factor, month_index, months_between};
use super::types::HomeInputs;

pub const HOME_PRICE_INFLATION_RATE: f64 = 8.0;
pub const HOME_LOAN_TENURE_YEARS: u32 = 20;
pub const HOME_LOAN_MONTHS: u32 = HOME_LOAN_TENURE_YEARS * 12;

/// A home bought at a future month with a down payment and an amortized loan.
///
/// A disabled plan has every field zeroed and contributes nothing at any month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePlan {
    pub enabled: bool,
    pub purchase_month: u32,
    pub inflated_price_at_purchase: f64,
    pub down_payment: f64,
    pub loan_months: u32,
    pub monthly_installment: f64,
}

impl HomePlan {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn build(current_age: f64, home: &HomeInputs) -> Self {
        let enabled = home.value_today > 0.0 && home.buy_age >= current_age;
        if !enabled {
            return Self::disabled();
        }

        let purchase_month = month_index(months_between(current_age, home.buy_age));
        // Compound over the rounded horizon so price and month index agree.
        let years_to_buy = purchase_month as f64 / 12.0;
        let inflated_price_at_purchase =
            home.value_today * growth_factor(HOME_PRICE_INFLATION_RATE, years_to_buy);
        let down_payment = inflated_price_at_purchase * home.down_payment_pct.max(0.0) / 100.0;
        let principal = (inflated_price_at_purchase - down_payment).max(0.0);

        Self {
            enabled: true,
            purchase_month,
            inflated_price_at_purchase,
            down_payment,
            loan_months: HOME_LOAN_MONTHS,
            monthly_installment: monthly_installment(
                principal,
                home.loan_rate,
                HOME_LOAN_TENURE_YEARS as f64,
            ),
        }
    }

    pub fn from_inputs(current_age: f64, home: Option<&HomeInputs>) -> Self {
        home.map(|home| Self::build(current_age, home))
            .unwrap_or_else(Self::disabled)
    }

    pub fn down_payment_for(&self, month: u32) -> f64 {
        if self.enabled && month == self.purchase_month {
            self.down_payment
        } else {
            0.0
        }
    }

    /// The first installment falls in the purchase month itself.
    pub fn installment_for(&self, month: u32) -> f64 {
        if !self.enabled || month < self.purchase_month {
            return 0.0;
        }
        if month - self.purchase_month < self.loan_months {
            self.monthly_installment
        } else {
            0.0
        }
    }

    pub fn expense_for(&self, month: u32) -> f64 {
        self.down_payment_for(month) + self.installment_for(month)
    }
}
