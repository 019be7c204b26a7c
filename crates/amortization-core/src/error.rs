use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AmortizationError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid payment timing: {0} (expected 0 for end of period or 1 for start of period)")]
    InvalidPaymentTiming(String),

    #[error("Invalid interest rate: {0}% (must be at least -100%)")]
    InvalidInterestRate(Decimal),

    #[error("Invalid duration: {0} months (must be between 1 and 12000)")]
    InvalidDuration(i64),

    #[error("Invalid period: {period} is outside 1..={nper}")]
    InvalidPeriod { period: u32, nper: u32 },

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Invalid input: {}", join_errors(.0))]
    Rejected(Vec<AmortizationError>),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AmortizationError {
    pub(crate) fn overflow(context: &str) -> Self {
        AmortizationError::NumericOverflow {
            context: context.into(),
        }
    }
}

fn join_errors(errors: &[AmortizationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for AmortizationError {
    fn from(e: serde_json::Error) -> Self {
        AmortizationError::SerializationError(e.to_string())
    }
}
