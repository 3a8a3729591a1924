use super::error::{FireError, Result};
use super::rates::{month_index, months_between};
use super::types::Inputs;

/// Longest lifetime the engine will simulate (150 years).
pub const MAX_HORIZON_MONTHS: u32 = 1800;

/// Month counts derived from validated ages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizons {
    pub months_to_retirement: u32,
    pub retirement_months: u32,
    pub total_months: u32,
}

pub fn validate(inputs: &Inputs) -> Result<Horizons> {
    check_finite(inputs)?;

    if inputs.pre_retirement_monthly_expense <= 0.0
        || inputs.post_retirement_monthly_expense() <= 0.0
    {
        return Err(FireError::NonPositiveExpense);
    }
    if inputs.current_age < 0.0 {
        return Err(FireError::NegativeCurrentAge);
    }
    if inputs.monthly_contribution < 0.0 {
        return Err(FireError::NegativeContribution);
    }
    if inputs.retirement_age <= inputs.current_age {
        return Err(FireError::RetirementNotAfterCurrentAge);
    }
    if inputs.life_expectancy <= inputs.current_age {
        return Err(FireError::LifeExpectancyNotAfterCurrentAge);
    }
    if let Some(home) = &inputs.home {
        if home.buy_age < inputs.current_age || home.buy_age > inputs.life_expectancy {
            return Err(FireError::HomePurchaseAgeOutOfRange);
        }
        if !(0.0..=100.0).contains(&home.down_payment_pct) {
            return Err(FireError::DownPaymentOutOfRange);
        }
        non_negative("home loan rate", home.loan_rate)?;
        non_negative("home value", home.value_today)?;
    }
    non_negative("dependent inflation rate", inputs.dependent_inflation_rate)?;
    non_negative("contribution growth rate", inputs.contribution_growth_rate)?;
    non_negative("pre-retirement return rate", inputs.pre_retirement_return_rate)?;
    non_negative("post-retirement return rate", inputs.post_retirement_return_rate)?;
    non_negative("inflation rate", inputs.inflation_rate)?;
    if inputs.withdrawal_rate <= 0.0 {
        return Err(FireError::NonPositiveWithdrawalRate);
    }

    // Depends on rounding, so it can only be judged once the ages are sane.
    let retirement_months = months_between(inputs.retirement_age, inputs.life_expectancy);
    if retirement_months <= 0 {
        return Err(FireError::NoRetirementMonths);
    }
    let total_months = months_between(inputs.current_age, inputs.life_expectancy);
    if total_months > i64::from(MAX_HORIZON_MONTHS) {
        return Err(FireError::HorizonTooLong {
            max_months: MAX_HORIZON_MONTHS,
        });
    }

    Ok(Horizons {
        months_to_retirement: month_index(months_between(
            inputs.current_age,
            inputs.retirement_age,
        )),
        retirement_months: month_index(retirement_months),
        total_months: month_index(total_months),
    })
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value < 0.0 {
        Err(FireError::NegativeRate { field })
    } else {
        Ok(())
    }
}

fn check_finite(inputs: &Inputs) -> Result<()> {
    let mut fields = vec![
        ("current age", inputs.current_age),
        ("retirement age", inputs.retirement_age),
        ("life expectancy", inputs.life_expectancy),
        (
            "pre-retirement monthly expense",
            inputs.pre_retirement_monthly_expense,
        ),
        (
            "post-retirement expense percent",
            inputs.post_retirement_expense_pct,
        ),
        ("inflation rate", inputs.inflation_rate),
        ("dependent inflation rate", inputs.dependent_inflation_rate),
        ("pre-retirement return rate", inputs.pre_retirement_return_rate),
        ("post-retirement return rate", inputs.post_retirement_return_rate),
        ("current corpus", inputs.current_corpus),
        ("monthly contribution", inputs.monthly_contribution),
        ("contribution growth rate", inputs.contribution_growth_rate),
        ("withdrawal rate", inputs.withdrawal_rate),
    ];
    if let Some(home) = &inputs.home {
        fields.extend([
            ("home purchase age", home.buy_age),
            ("home value", home.value_today),
            ("down payment percent", home.down_payment_pct),
            ("home loan rate", home.loan_rate),
        ]);
    }
    if let Some((field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
        return Err(FireError::NotFinite { field: *field });
    }
    if inputs.dependent_birth_ages.iter().any(|age| !age.is_finite()) {
        return Err(FireError::NotFinite {
            field: "dependent birth age",
        });
    }
    Ok(())
}
