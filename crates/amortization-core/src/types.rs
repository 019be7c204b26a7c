use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmortizationError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Periodic rates expressed as decimals (0.005 = 0.5% per month).
pub type Rate = Decimal;

/// Annual nominal rates expressed as percentages (6.0 = 6%).
pub type Percent = Decimal;

/// When each periodic payment is made.
///
/// Serialises as the conventional spreadsheet `type` code: `0` for payments
/// at the end of each period (ordinary annuity), `1` for payments at the
/// start (annuity-due). Deserialises from either the code or the names
/// `"end"` / `"start"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PaymentTiming {
    #[default]
    EndOfPeriod,
    StartOfPeriod,
}

impl PaymentTiming {
    pub fn code(self) -> u8 {
        match self {
            PaymentTiming::EndOfPeriod => 0,
            PaymentTiming::StartOfPeriod => 1,
        }
    }

    pub fn is_start(self) -> bool {
        self == PaymentTiming::StartOfPeriod
    }
}

impl TryFrom<i64> for PaymentTiming {
    type Error = AmortizationError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PaymentTiming::EndOfPeriod),
            1 => Ok(PaymentTiming::StartOfPeriod),
            other => Err(AmortizationError::InvalidPaymentTiming(other.to_string())),
        }
    }
}

impl FromStr for PaymentTiming {
    type Err = AmortizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "end" => Ok(PaymentTiming::EndOfPeriod),
            "1" | "start" => Ok(PaymentTiming::StartOfPeriod),
            _ => Err(AmortizationError::InvalidPaymentTiming(s.to_string())),
        }
    }
}

impl fmt::Display for PaymentTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentTiming::EndOfPeriod => write!(f, "end of period"),
            PaymentTiming::StartOfPeriod => write!(f, "start of period"),
        }
    }
}

impl Serialize for PaymentTiming {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for PaymentTiming {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PaymentTiming::try_from(TimingInput::deserialize(deserializer)?)
            .map_err(serde::de::Error::custom)
    }
}

/// Payment timing as supplied by a caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimingInput {
    Code(i64),
    Name(String),
}

impl TryFrom<TimingInput> for PaymentTiming {
    type Error = AmortizationError;

    fn try_from(input: TimingInput) -> Result<Self, Self::Error> {
        match input {
            TimingInput::Code(code) => PaymentTiming::try_from(code),
            TimingInput::Name(name) => name.parse(),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
