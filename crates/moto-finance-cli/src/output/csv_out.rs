use serde_json::{Map, Value};
use std::io;

use super::plain;

/// Write output as CSV to stdout. A result carrying an array of records
/// (term options, schedule periods) is written one row per record;
/// otherwise a two-column field/value listing is produced.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => match first_record_array(map) {
            Some(records) => write_records(&mut wtr, records),
            None => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &plain(val)]);
                }
            }
        },
        Value::Array(arr) => write_records(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&plain(result)]);
        }
    }

    let _ = wtr.flush();
}

fn first_record_array(map: &Map<String, Value>) -> Option<&[Value]> {
    map.values().find_map(|v| match v {
        Value::Array(arr) if arr.first().is_some_and(Value::is_object) => Some(arr.as_slice()),
        _ => None,
    })
}

fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, records: &[Value]) {
    let Some(Value::Object(first)) = records.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for item in records {
        if let Value::Object(row) = item {
            let _ = wtr.write_record(
                headers
                    .iter()
                    .map(|h| row.get(*h).map(plain).unwrap_or_default()),
            );
        }
    }
}
