use moto_finance_core::format::CurrencyLocale;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::display_field;

/// Format output as tables: scalar result fields as Field/Value rows, and
/// any array of records (term options, schedule periods) as its own table.
pub fn print_table(value: &Value, locale: CurrencyLocale) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                print_result(result, locale);
                print_envelope_notes(map);
            }
            _ => print_fields(map, locale),
        },
        Value::Array(arr) => print_records("", arr, locale),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Map<String, Value>, locale: CurrencyLocale) {
    let (records, scalars): (Vec<_>, Vec<_>) = result
        .iter()
        .partition(|(_, v)| matches!(v, Value::Array(a) if a.first().is_some_and(Value::is_object)));

    if !scalars.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in scalars {
            builder.push_record([key.as_str(), &nested_or_field(key, val, locale)]);
        }
        println!("{}", Table::from(builder));
    }

    for (key, val) in records {
        if let Value::Array(arr) = val {
            print_records(key, arr, locale);
        }
    }
}

fn nested_or_field(key: &str, value: &Value, locale: CurrencyLocale) -> String {
    match value {
        Value::Object(inner) => inner
            .iter()
            .map(|(k, v)| format!("{k}: {}", display_field(k, v, locale)))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => display_field(key, value, locale),
    }
}

fn print_fields(map: &Map<String, Value>, locale: CurrencyLocale) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &nested_or_field(key, val, locale)]);
    }
    println!("{}", Table::from(builder));
}

fn print_records(title: &str, arr: &[Value], locale: CurrencyLocale) {
    let Some(Value::Object(first)) = arr.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in arr {
        if let Value::Object(row) = item {
            let cells: Vec<String> = headers
                .iter()
                .map(|h| {
                    row.get(h.as_str())
                        .map(|v| display_field(h, v, locale))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(cells);
        }
    }

    if !title.is_empty() {
        println!("\n{title}:");
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
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
