use serde_json::{Map, Value};
use std::io;

use super::{format, result_of};

/// Write output as CSV to stdout.
///
/// A result holding a row array (the schedule periods) is written one row
/// per element; any other result becomes a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match result_of(value) {
        Value::Object(map) => match map.values().find_map(Value::as_array) {
            Some(rows) => write_rows(&mut wtr, rows),
            None => write_fields(&mut wtr, map),
        },
        Value::Array(rows) => write_rows(&mut wtr, rows),
        other => {
            let _ = wtr.write_record([format::plain(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format::plain(val)]);
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([format::plain(item)]);
        }
        return;
    };

    let headers = format::order_columns(first.keys());
    let _ = wtr.write_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h).map(format::plain).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
