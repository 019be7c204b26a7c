use serde_json::Value;

use super::{format, result_of};

/// Key output fields, in order of priority.
const PRIORITY_KEYS: [&str; 2] = ["periodic_payment", "total_interest"];

/// Print just the key answer value from the output, falling back to the
/// first scalar field of the result.
pub fn print_minimal(value: &Value) {
    let result_obj = result_of(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format::plain(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_array() && !v.is_object()) {
            println!("{}: {}", key, format::plain(val));
            return;
        }
    }

    println!("{}", format::plain(result_obj));
}
