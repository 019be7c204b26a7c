//! Display formatting for human-readable output.
//!
//! Amounts render as US-style currency and rates as percentages. Machine
//! formats (JSON, CSV) keep the raw decimal strings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

const MONEY_FIELDS: &[&str] = &[
    "periodic_payment",
    "total_principal",
    "total_interest",
    "running_balance",
    "principal_portion",
    "interest_portion",
    "cumulative_interest",
    "initial_balance",
    "future_value",
];

const RATE_FIELDS: &[&str] = &["monthly_rate"];

const DATE_FIELDS: &[&str] = &["period_date", "start_date"];

/// Preferred left-to-right order for schedule rows.
const PERIOD_COLUMNS: &[&str] = &[
    "period_number",
    "period_date",
    "principal_portion",
    "interest_portion",
    "running_balance",
    "cumulative_interest",
];

/// Currency with two decimals and comma grouping, e.g. `-$1,199.10`.
pub fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

fn group_thousands(whole: &str) -> String {
    let mut out = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Decimal rate as a percentage with two to four decimals, e.g. `0.5833%`.
pub fn percent(rate: Decimal) -> String {
    let scaled = (rate * Decimal::ONE_HUNDRED).round_dp(4).normalize();
    if scaled.scale() < 2 {
        format!("{scaled:.2}%")
    } else {
        format!("{scaled}%")
    }
}

/// Column or field heading for a JSON key.
pub fn label(key: &str) -> String {
    match key {
        "period_number" => "Period",
        "period_date" => "Date",
        "principal_portion" => "Principal",
        "interest_portion" => "Interest",
        "running_balance" => "Balance",
        "cumulative_interest" => "Cumulative Interest",
        "periodic_payment" => "Periodic Payment",
        "monthly_rate" => "Monthly Rate",
        "total_principal" => "Total Principal",
        "total_interest" => "Total Interest",
        "duration_in_months" => "Months",
        "payment_timing" => "Payment Timing",
        other => other,
    }
    .to_string()
}

/// Order row keys with the schedule columns first, remaining keys after.
pub fn order_columns<'a>(keys: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut keys: Vec<String> = keys.into_iter().cloned().collect();
    keys.sort_by_key(|k| {
        PERIOD_COLUMNS
            .iter()
            .position(|c| *c == k.as_str())
            .unwrap_or(PERIOD_COLUMNS.len())
    });
    keys
}

/// Human-readable rendering of a field, formatted by its key.
pub fn display(key: &str, value: &Value) -> String {
    if let Value::String(s) = value {
        if MONEY_FIELDS.contains(&key) {
            if let Ok(amount) = s.parse::<Decimal>() {
                return money(amount);
            }
        }
        if RATE_FIELDS.contains(&key) {
            if let Ok(rate) = s.parse::<Decimal>() {
                return percent(rate);
            }
        }
        if DATE_FIELDS.contains(&key) {
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return date.format("%m/%d/%Y").to_string();
            }
        }
    }
    plain(value)
}

/// Raw rendering with no field-specific formatting.
pub fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(plain).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_money() {
        assert_eq!(money(dec!(-1199.101050305)), "-$1,199.10");
        assert_eq!(money(dec!(200000)), "$200,000.00");
        assert_eq!(money(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(money(dec!(999.999)), "$1,000.00");
        assert_eq!(money(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(dec!(0.005)), "0.50%");
        assert_eq!(percent(dec!(7) / dec!(100) / dec!(12)), "0.5833%");
        assert_eq!(percent(Decimal::ZERO), "0.00%");
    }

    #[test]
    fn test_display_by_key() {
        assert_eq!(display("running_balance", &json!("199800.8989")), "$199,800.90");
        assert_eq!(display("period_date", &json!("2020-02-29")), "02/29/2020");
        assert_eq!(display("monthly_rate", &json!("0.01")), "1.00%");
        assert_eq!(display("period_number", &json!(7)), "7");
        assert_eq!(display("running_balance", &json!("n/a")), "n/a");
    }

    #[test]
    fn test_order_columns() {
        let keys: Vec<String> = [
            "cumulative_interest",
            "interest_portion",
            "period_date",
            "period_number",
            "principal_portion",
            "running_balance",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(
            order_columns(&keys),
            vec![
                "period_number",
                "period_date",
                "principal_portion",
                "interest_portion",
                "running_balance",
                "cumulative_interest",
            ]
        );
    }
}
