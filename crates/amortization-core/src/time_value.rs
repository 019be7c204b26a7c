use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::AmortizationError;
use crate::types::{Money, PaymentTiming, Percent, Rate};
use crate::AmortizationResult;

const PERCENT_SCALE: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Monthly periodic rate from an annual nominal percentage (6.0 => 0.005).
pub fn monthly_rate(annual_percent: Percent) -> Rate {
    annual_percent / PERCENT_SCALE / MONTHS_PER_YEAR
}

fn one_plus(rate: Rate, context: &str) -> AmortizationResult<Decimal> {
    Decimal::ONE
        .checked_add(rate)
        .ok_or_else(|| AmortizationError::overflow(context))
}

/// (1 + r)^nper
fn growth_factor(rate: Rate, nper: u32, context: &str) -> AmortizationResult<Decimal> {
    one_plus(rate, context)?
        .checked_powu(u64::from(nper))
        .ok_or_else(|| AmortizationError::overflow(context))
}

/// Payment (PMT)
///
/// Periodic payment that takes `present_value` to `future_value` over `nper`
/// periods. Cash paid out is negative, so a positive loan balance yields a
/// negative payment.
pub fn pmt(
    rate: Rate,
    nper: u32,
    present_value: Money,
    future_value: Money,
    timing: PaymentTiming,
) -> AmortizationResult<Money> {
    if nper == 0 {
        return Err(AmortizationError::InvalidDuration(0));
    }

    if rate.is_zero() {
        let total = present_value
            .checked_add(future_value)
            .ok_or_else(|| AmortizationError::overflow("PMT principal"))?;
        return Ok(-total / Decimal::from(nper));
    }

    let factor = growth_factor(rate, nper, "PMT growth factor")?;
    let annuity_denominator = factor - Decimal::ONE;
    if annuity_denominator.is_zero() {
        return Err(AmortizationError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    // pmt = -(pv * (1 + r)^N + fv) * r / ((1 + r)^N - 1)
    // Multiply before dividing: r / ((1 + r)^N - 1) alone underflows to a few
    // significant digits once the growth factor is large.
    let target = present_value
        .checked_mul(factor)
        .and_then(|grown| grown.checked_add(future_value))
        .ok_or_else(|| AmortizationError::overflow("PMT target balance"))?;
    let payment = (-target)
        .checked_mul(rate)
        .and_then(|scaled| scaled.checked_div(annuity_denominator))
        .ok_or_else(|| AmortizationError::overflow("PMT payment"))?;

    match timing {
        PaymentTiming::EndOfPeriod => Ok(payment),
        PaymentTiming::StartOfPeriod => payment
            .checked_div(one_plus(rate, "PMT annuity-due adjustment")?)
            .ok_or_else(|| AmortizationError::DivisionByZero {
                context: "PMT annuity-due adjustment".into(),
            }),
    }
}

/// Future Value
///
/// Balance after `nper` periods of `payment` against `present_value`. A zero
/// rate returns `present_value` unchanged.
pub fn fv(
    rate: Rate,
    nper: u32,
    payment: Money,
    present_value: Money,
    timing: PaymentTiming,
) -> AmortizationResult<Money> {
    if rate.is_zero() {
        return Ok(present_value);
    }

    // Annuity-due payments compound for one extra period.
    let payment = match timing {
        PaymentTiming::EndOfPeriod => payment,
        PaymentTiming::StartOfPeriod => payment
            .checked_mul(one_plus(rate, "FV annuity-due adjustment")?)
            .ok_or_else(|| AmortizationError::overflow("FV annuity-due adjustment"))?,
    };

    let factor = growth_factor(rate, nper, "FV growth factor")?;
    let annuity_factor = (factor - Decimal::ONE)
        .checked_div(rate)
        .ok_or_else(|| AmortizationError::overflow("FV annuity factor"))?;

    let value = annuity_factor
        .checked_mul(payment)
        .zip(present_value.checked_mul(factor))
        .and_then(|(annuity, grown)| annuity.checked_add(grown))
        .ok_or_else(|| AmortizationError::overflow("FV balance"))?;

    Ok(-value)
}

/// Interest portion of the payment in `period` (IPMT).
///
/// The balance carried out of period `period - 1` times the periodic rate.
/// Under annuity-due timing the first period carries no interest, and later
/// periods are discounted by one period since the payment precedes accrual.
pub fn ipmt(
    rate: Rate,
    period: u32,
    nper: u32,
    present_value: Money,
    future_value: Money,
    timing: PaymentTiming,
) -> AmortizationResult<Money> {
    if nper == 0 {
        return Err(AmortizationError::InvalidDuration(0));
    }
    if period == 0 || period > nper {
        return Err(AmortizationError::InvalidPeriod { period, nper });
    }
    if timing.is_start() && period == 1 {
        return Ok(Decimal::ZERO);
    }

    let payment = pmt(rate, nper, present_value, future_value, timing)?;
    let prior_balance = fv(rate, period - 1, payment, present_value, timing)?;
    let interest = prior_balance
        .checked_mul(rate)
        .ok_or_else(|| AmortizationError::overflow("IPMT interest"))?;

    match timing {
        PaymentTiming::EndOfPeriod => Ok(interest),
        PaymentTiming::StartOfPeriod => interest
            .checked_div(one_plus(rate, "IPMT annuity-due adjustment")?)
            .ok_or_else(|| AmortizationError::DivisionByZero {
                context: "IPMT annuity-due adjustment".into(),
            }),
    }
}

/// Principal portion of the payment in `period` (PPMT): PMT less IPMT.
pub fn ppmt(
    rate: Rate,
    period: u32,
    nper: u32,
    present_value: Money,
    future_value: Money,
    timing: PaymentTiming,
) -> AmortizationResult<Money> {
    let payment = pmt(rate, nper, present_value, future_value, timing)?;
    let interest = ipmt(rate, period, nper, present_value, future_value, timing)?;
    payment
        .checked_sub(interest)
        .ok_or_else(|| AmortizationError::overflow("PPMT principal"))
}
