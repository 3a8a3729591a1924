use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FireError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("pre- and post-retirement monthly expense must be > 0")]
    NonPositiveExpense,

    #[error("current age must be >= 0")]
    NegativeCurrentAge,

    #[error("monthly contribution must be >= 0")]
    NegativeContribution,

    #[error("retirement age must be > current age")]
    RetirementNotAfterCurrentAge,

    #[error("life expectancy must be > current age")]
    LifeExpectancyNotAfterCurrentAge,

    #[error("home purchase age must be between current age and life expectancy")]
    HomePurchaseAgeOutOfRange,

    #[error("down payment must be between 0 and 100 percent")]
    DownPaymentOutOfRange,

    #[error("{field} must be >= 0")]
    NegativeRate { field: &'static str },

    #[error("withdrawal rate must be greater than zero")]
    NonPositiveWithdrawalRate,

    #[error("life expectancy must be greater than retirement age")]
    NoRetirementMonths,

    #[error("planning horizon must not exceed {max_months} months")]
    HorizonTooLong { max_months: u32 },

    #[error("{quantity} is not computable for these inputs")]
    NotComputable { quantity: &'static str },
}

pub type Result<T> = std::result::Result<T, FireError>;
