use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace};

use crate::error::AmortizationError;
use crate::time_value::{ipmt, monthly_rate, pmt, ppmt};
use crate::types::*;
use crate::validation::{check_parameters, MAX_DURATION_MONTHS, MIN_ANNUAL_RATE_PERCENT};
use crate::AmortizationResult;

/// Terms of a monthly amortizing loan or annuity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    pub start_date: NaiveDate,
    /// Present value; positive for an amount borrowed or invested.
    pub initial_balance: Money,
    /// Annual nominal rate as a percentage (7.0 = 7%).
    pub annual_interest_rate_percent: Percent,
    pub duration_in_months: u32,
    /// Target balance at the end of the term, usually zero.
    pub future_value: Money,
    #[serde(default)]
    pub payment_timing: PaymentTiming,
}

/// A single period in the amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub period_number: u32,
    pub period_date: NaiveDate,
    pub running_balance: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub cumulative_interest: Money,
}

/// Full amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub periodic_payment: Money,
    pub monthly_rate: Rate,
    pub total_principal: Money,
    pub total_interest: Money,
    pub periods: Vec<PeriodRecord>,
}

/// Advance a date by one calendar month.
///
/// The day of month is clamped to the last valid day of the target month,
/// so Jan 31 lands on Feb 29 in a leap year and Feb 28 otherwise.
pub fn add_one_month(date: NaiveDate) -> AmortizationResult<NaiveDate> {
    date.checked_add_months(Months::new(1))
        .ok_or_else(|| AmortizationError::DateError(format!("cannot advance {date} by one month")))
}

/// Periodic payment for the given loan terms.
pub fn compute_periodic_payment(
    annual_interest_rate_percent: Percent,
    duration_in_months: u32,
    initial_balance: Money,
    future_value: Money,
    payment_timing: PaymentTiming,
) -> AmortizationResult<Money> {
    if !(1..=MAX_DURATION_MONTHS).contains(&duration_in_months) {
        return Err(AmortizationError::InvalidDuration(i64::from(
            duration_in_months,
        )));
    }
    if annual_interest_rate_percent < MIN_ANNUAL_RATE_PERCENT {
        return Err(AmortizationError::InvalidInterestRate(
            annual_interest_rate_percent,
        ));
    }

    pmt(
        monthly_rate(annual_interest_rate_percent),
        duration_in_months,
        initial_balance,
        future_value,
        payment_timing,
    )
}

/// Build the month-by-month amortization schedule.
///
/// Each period's principal and interest come from the closed-form PPMT/IPMT
/// on the original loan terms; the running balance and cumulative interest
/// are accumulated in period order. End-of-period payments are dated one
/// month after the previous date; start-of-period payments are dated on it,
/// so period 1 falls on `start_date`.
pub fn build_schedule(
    input: &LoanParameters,
) -> AmortizationResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    check_parameters(input)?;

    let nper = input.duration_in_months;
    let pv = input.initial_balance;
    let fv = input.future_value;
    let timing = input.payment_timing;
    let rate = monthly_rate(input.annual_interest_rate_percent);

    if input.annual_interest_rate_percent.is_sign_negative()
        && !input.annual_interest_rate_percent.is_zero()
    {
        warnings.push(format!(
            "Negative interest rate ({}%): interest portions carry the opposite sign to the payment",
            input.annual_interest_rate_percent
        ));
    }
    if !fv.is_zero() {
        warnings.push(format!(
            "Non-zero future value: schedule targets a closing balance of {}",
            -fv
        ));
        if timing.is_start() {
            warnings.push(
                "Start-of-period timing with a future value: closing balance only approximates the target".into(),
            );
        }
    }

    let periodic_payment = pmt(rate, nper, pv, fv, timing)?;
    debug!(
        start_date = %input.start_date,
        initial_balance = %pv,
        monthly_rate = %rate,
        nper,
        future_value = %fv,
        timing = %timing,
        periodic_payment = %periodic_payment,
        "building amortization schedule"
    );

    let mut periods = Vec::with_capacity(nper as usize);
    let mut loop_date = input.start_date;
    let mut balance = pv;
    let mut cumulative_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;

    for period_number in 1..=nper {
        if timing == PaymentTiming::EndOfPeriod {
            loop_date = add_one_month(loop_date)?;
        }

        let principal_portion = ppmt(rate, period_number, nper, pv, fv, timing)?;
        let interest_portion = ipmt(rate, period_number, nper, pv, fv, timing)?;

        balance = balance
            .checked_add(principal_portion)
            .ok_or_else(|| AmortizationError::overflow("running balance"))?;
        cumulative_interest = cumulative_interest
            .checked_add(interest_portion)
            .ok_or_else(|| AmortizationError::overflow("cumulative interest"))?;
        total_principal = total_principal
            .checked_add(principal_portion)
            .ok_or_else(|| AmortizationError::overflow("total principal"))?;

        trace!(
            period_number,
            period_date = %loop_date,
            running_balance = %balance,
            principal = %principal_portion,
            interest = %interest_portion,
            "period"
        );

        periods.push(PeriodRecord {
            period_number,
            period_date: loop_date,
            running_balance: balance,
            principal_portion,
            interest_portion,
            cumulative_interest,
        });

        if timing == PaymentTiming::StartOfPeriod {
            loop_date = add_one_month(loop_date)?;
        }
    }

    let output = AmortizationSchedule {
        periodic_payment,
        monthly_rate: rate,
        total_principal,
        total_interest: cumulative_interest,
        periods,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Closed-form amortization (PMT/IPMT/PPMT), monthly compounding",
        &serde_json::json!({
            "start_date": input.start_date.to_string(),
            "initial_balance": pv.to_string(),
            "annual_interest_rate_percent": input.annual_interest_rate_percent.to_string(),
            "monthly_rate": rate.to_string(),
            "duration_in_months": nper,
            "future_value": fv.to_string(),
            "payment_timing": timing.code(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
