pub mod error;
pub mod schedule;
pub mod time_value;
pub mod types;
pub mod validation;

pub use error::AmortizationError;
pub use schedule::{
    add_one_month, build_schedule, compute_periodic_payment, AmortizationSchedule,
    LoanParameters, PeriodRecord,
};
pub use types::*;
pub use validation::{parse_date, validate_request, validate_terms, LoanRequest, PaymentTerms};

/// Standard result type for all amortization operations
pub type AmortizationResult<T> = Result<T, AmortizationError>;
