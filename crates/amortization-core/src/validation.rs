//! Binding and validation of caller-supplied loan terms.
//!
//! Every field error found in a request is reported together; a single
//! error is returned as-is, several are wrapped in
//! [`AmortizationError::Rejected`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AmortizationError;
use crate::schedule::LoanParameters;
use crate::types::{Money, PaymentTiming, Percent, TimingInput};
use crate::AmortizationResult;

/// Lowest accepted annual rate, in percent.
pub const MIN_ANNUAL_RATE_PERCENT: Decimal = dec!(-100);

/// Longest accepted term: one thousand years of monthly periods.
pub const MAX_DURATION_MONTHS: u32 = 12_000;

/// Accepted date layouts: the form layout first, then ISO 8601.
const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// Raw loan terms as received from a caller. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "initialBalance")]
    pub initial_balance: Option<Money>,
    #[serde(default, alias = "interestRate", alias = "interest_rate")]
    pub annual_interest_rate_percent: Option<Percent>,
    #[serde(default, alias = "durationInMonths")]
    pub duration_in_months: Option<i64>,
    #[serde(default, alias = "futureValue")]
    pub future_value: Option<Money>,
    #[serde(default, alias = "paymentType", alias = "payment_type")]
    pub payment_timing: Option<TimingInput>,
}

/// Validated loan terms without a start date, enough to price the payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTerms {
    pub initial_balance: Money,
    pub annual_interest_rate_percent: Percent,
    pub duration_in_months: u32,
    pub future_value: Money,
    pub payment_timing: PaymentTiming,
}

/// Parse a date in `MM/DD/YYYY` or `YYYY-MM-DD` form.
pub fn parse_date(raw: &str) -> AmortizationResult<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| {
            AmortizationError::DateError(format!(
                "'{raw}' is not a valid date (expected MM/DD/YYYY or YYYY-MM-DD)"
            ))
        })
}

fn require<T: Clone>(
    value: &Option<T>,
    field: &str,
    errors: &mut Vec<AmortizationError>,
) -> Option<T> {
    if value.is_none() {
        errors.push(AmortizationError::MissingField(field.into()));
    }
    value.clone()
}

fn check_rate(rate: Percent, errors: &mut Vec<AmortizationError>) {
    if rate < MIN_ANNUAL_RATE_PERCENT {
        errors.push(AmortizationError::InvalidInterestRate(rate));
    }
}

fn check_duration(months: i64, errors: &mut Vec<AmortizationError>) -> Option<u32> {
    match u32::try_from(months) {
        Ok(n) if (1..=MAX_DURATION_MONTHS).contains(&n) => Some(n),
        _ => {
            errors.push(AmortizationError::InvalidDuration(months));
            None
        }
    }
}

fn finish<T>(value: Option<T>, mut errors: Vec<AmortizationError>) -> AmortizationResult<T> {
    match errors.len() {
        0 => value.ok_or(AmortizationError::Rejected(errors)),
        1 => Err(errors.remove(0)),
        _ => Err(AmortizationError::Rejected(errors)),
    }
}

fn collect_terms(
    request: &LoanRequest,
    errors: &mut Vec<AmortizationError>,
) -> Option<PaymentTerms> {
    let initial_balance = require(&request.initial_balance, "initial_balance", errors);

    let rate = require(
        &request.annual_interest_rate_percent,
        "annual_interest_rate_percent",
        errors,
    );
    if let Some(rate) = rate {
        check_rate(rate, errors);
    }

    let duration = require(&request.duration_in_months, "duration_in_months", errors)
        .and_then(|months| check_duration(months, errors));

    let future_value = require(&request.future_value, "future_value", errors);

    let timing = require(&request.payment_timing, "payment_timing", errors).and_then(|raw| {
        PaymentTiming::try_from(raw)
            .map_err(|e| errors.push(e))
            .ok()
    });

    Some(PaymentTerms {
        initial_balance: initial_balance?,
        annual_interest_rate_percent: rate?,
        duration_in_months: duration?,
        future_value: future_value?,
        payment_timing: timing?,
    })
}

/// Validate the five numeric terms; the start date is not required.
pub fn validate_terms(request: &LoanRequest) -> AmortizationResult<PaymentTerms> {
    let mut errors = Vec::new();
    let terms = collect_terms(request, &mut errors);
    finish(terms, errors)
}

/// Validate a full request and bind it into [`LoanParameters`].
pub fn validate_request(request: &LoanRequest) -> AmortizationResult<LoanParameters> {
    let mut errors = Vec::new();

    let start_date = require(&request.start_date, "start_date", &mut errors).and_then(|raw| {
        parse_date(&raw).map_err(|e| errors.push(e)).ok()
    });
    let terms = collect_terms(request, &mut errors);

    let params = start_date.zip(terms).map(|(start_date, terms)| LoanParameters {
        start_date,
        initial_balance: terms.initial_balance,
        annual_interest_rate_percent: terms.annual_interest_rate_percent,
        duration_in_months: terms.duration_in_months,
        future_value: terms.future_value,
        payment_timing: terms.payment_timing,
    });
    finish(params, errors)
}

/// Range checks for parameters built directly rather than from a request.
pub fn check_parameters(params: &LoanParameters) -> AmortizationResult<()> {
    let mut errors = Vec::new();
    check_rate(params.annual_interest_rate_percent, &mut errors);
    if !(1..=MAX_DURATION_MONTHS).contains(&params.duration_in_months) {
        errors.push(AmortizationError::InvalidDuration(i64::from(
            params.duration_in_months,
        )));
    }
    finish(Some(()), errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete_request() -> LoanRequest {
        LoanRequest {
            start_date: Some("01/01/2020".into()),
            initial_balance: Some(dec!(200000)),
            annual_interest_rate_percent: Some(dec!(6)),
            duration_in_months: Some(360),
            future_value: Some(Decimal::ZERO),
            payment_timing: Some(TimingInput::Code(0)),
        }
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        assert_eq!(parse_date("01/31/2020").unwrap(), expected);
        assert_eq!(parse_date("2020-01-31").unwrap(), expected);
        assert!(matches!(
            parse_date("31/01/2020"),
            Err(AmortizationError::DateError(_))
        ));
    }

    #[test]
    fn test_valid_request_binds() {
        let params = validate_request(&complete_request()).unwrap();
        assert_eq!(
            params,
            LoanParameters {
                start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                initial_balance: dec!(200000),
                annual_interest_rate_percent: dec!(6),
                duration_in_months: 360,
                future_value: Decimal::ZERO,
                payment_timing: PaymentTiming::EndOfPeriod,
            }
        );
    }

    #[test]
    fn test_missing_field() {
        let mut request = complete_request();
        request.future_value = None;
        assert_eq!(
            validate_request(&request),
            Err(AmortizationError::MissingField("future_value".into()))
        );
    }

    #[test]
    fn test_invalid_payment_timing() {
        let mut request = complete_request();
        request.payment_timing = Some(TimingInput::Code(2));
        assert_eq!(
            validate_request(&request),
            Err(AmortizationError::InvalidPaymentTiming("2".into()))
        );
    }

    #[test]
    fn test_invalid_interest_rate() {
        let mut request = complete_request();
        request.annual_interest_rate_percent = Some(dec!(-150));
        assert_eq!(
            validate_request(&request),
            Err(AmortizationError::InvalidInterestRate(dec!(-150)))
        );

        // -100% itself is allowed
        request.annual_interest_rate_percent = Some(dec!(-100));
        assert!(validate_request(&request).is_ok());
    }

    #[test]
    fn test_invalid_duration() {
        for months in [0, -12, 12_001, i64::from(u32::MAX) + 1] {
            let mut request = complete_request();
            request.duration_in_months = Some(months);
            assert_eq!(
                validate_request(&request),
                Err(AmortizationError::InvalidDuration(months))
            );
        }
    }

    #[test]
    fn test_several_errors_are_reported_together() {
        let request = LoanRequest {
            start_date: Some("not a date".into()),
            duration_in_months: Some(0),
            payment_timing: Some(TimingInput::Name("weekly".into())),
            ..Default::default()
        };
        let err = validate_request(&request).unwrap_err();
        let AmortizationError::Rejected(errors) = err else {
            panic!("expected Rejected, got {err:?}");
        };
        assert_eq!(errors.len(), 6);
        assert!(matches!(errors[0], AmortizationError::DateError(_)));
        assert!(errors.contains(&AmortizationError::MissingField("initial_balance".into())));
        assert!(errors.contains(&AmortizationError::InvalidDuration(0)));
        assert!(errors.contains(&AmortizationError::InvalidPaymentTiming("weekly".into())));
    }

    #[test]
    fn test_terms_do_not_need_a_date() {
        let mut request = complete_request();
        request.start_date = None;
        let terms = validate_terms(&request).unwrap();
        assert_eq!(terms.duration_in_months, 360);
        assert!(validate_request(&request).is_err());
    }

    #[test]
    fn test_request_accepts_form_field_names() {
        let request: LoanRequest = serde_json::from_str(
            r#"{
                "startDate": "01/31/2020",
                "initialBalance": 1200,
                "interestRate": 0,
                "durationInMonths": 12,
                "futureValue": 0,
                "paymentType": 1
            }"#,
        )
        .unwrap();
        let params = validate_request(&request).unwrap();
        assert_eq!(params.payment_timing, PaymentTiming::StartOfPeriod);
        assert_eq!(params.initial_balance, dec!(1200));
    }

    #[test]
    fn test_check_parameters() {
        let mut params = validate_request(&complete_request()).unwrap();
        assert!(check_parameters(&params).is_ok());

        params.duration_in_months = 0;
        params.annual_interest_rate_percent = dec!(-101);
        assert_eq!(
            check_parameters(&params),
            Err(AmortizationError::Rejected(vec![
                AmortizationError::InvalidInterestRate(dec!(-101)),
                AmortizationError::InvalidDuration(0),
            ]))
        );

        params.annual_interest_rate_percent = Decimal::ZERO;
        params.duration_in_months = u32::MAX;
        assert_eq!(
            check_parameters(&params),
            Err(AmortizationError::InvalidDuration(i64::from(u32::MAX)))
        );
    }
}
