use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::format;

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go into a Field/Value summary; each array field
/// (the schedule periods) is rendered as its own row table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => print_rows(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(res_map),
        other => println!("{}", format::plain(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections = Vec::new();
    for (key, val) in map {
        match val {
            Value::Array(rows) => sections.push((key, rows)),
            _ => builder.push_record([format::label(key), format::display(key, val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, rows) in sections {
        println!("\n{}:", format::label(key));
        print_rows(rows);
    }
}

fn print_rows(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            println!("(empty)");
        }
        for item in arr {
            println!("{}", format::plain(item));
        }
        return;
    };

    let headers = format::order_columns(first.keys());
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| format::label(h)));

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h).map(|v| format::display(h, v)).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }

    println!("{}", Table::from(builder));
}
