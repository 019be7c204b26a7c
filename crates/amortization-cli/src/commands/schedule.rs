use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use amortization_core::schedule::{self, compute_periodic_payment};
use amortization_core::time_value::monthly_rate;
use amortization_core::validation::{validate_request, validate_terms, LoanRequest};
use amortization_core::TimingInput;

use crate::input;

/// Loan terms shared by the schedule and payment commands
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Date of the first period (MM/DD/YYYY or YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Amount borrowed or invested (present value)
    #[arg(long, allow_hyphen_values = true)]
    pub initial_balance: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 7.0 for 7%)
    #[arg(long, allow_hyphen_values = true)]
    pub interest_rate: Option<Decimal>,

    /// Number of monthly periods
    #[arg(long, allow_hyphen_values = true)]
    pub duration_in_months: Option<i64>,

    /// Target balance at the end of the term
    #[arg(long, allow_hyphen_values = true)]
    pub future_value: Option<Decimal>,

    /// When payments are made: 0 or "end" for period end, 1 or "start" for period start
    #[arg(long)]
    pub payment_timing: Option<String>,
}

impl LoanArgs {
    fn to_request(&self) -> LoanRequest {
        LoanRequest {
            start_date: self.start_date.clone(),
            initial_balance: self.initial_balance,
            annual_interest_rate_percent: self.interest_rate,
            duration_in_months: self.duration_in_months,
            future_value: self.future_value,
            payment_timing: self.payment_timing.clone().map(TimingInput::Name),
        }
    }
}

/// Input file first, then piped stdin, then individual flags.
fn read_request(args: &LoanArgs) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        debug!(path = %path, "reading loan terms from file");
        return input::file::read_input(path);
    }
    if let Some(request) = input::stdin::read_stdin()? {
        debug!("reading loan terms from stdin");
        return Ok(request);
    }
    Ok(args.to_request())
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = read_request(&args)?;
    let params = validate_request(&request)?;
    let result = schedule::build_schedule(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = read_request(&args)?;
    let terms = validate_terms(&request)?;
    let payment = compute_periodic_payment(
        terms.annual_interest_rate_percent,
        terms.duration_in_months,
        terms.initial_balance,
        terms.future_value,
        terms.payment_timing,
    )?;

    Ok(serde_json::json!({
        "periodic_payment": payment,
        "monthly_rate": monthly_rate(terms.annual_interest_rate_percent),
        "duration_in_months": terms.duration_in_months,
        "payment_timing": terms.payment_timing,
    }))
}
