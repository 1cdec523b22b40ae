use moto_finance_core::format::{format_currency, CurrencyLocale};
use rust_decimal::Decimal;
use serde_json::Value;

/// Fields that answer the question a command was run for, in priority order
const PRIORITY_KEYS: &[&str] = &["monthly_installment", "url", "masked"];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value, locale: CurrencyLocale) {
    println!("{}", minimal_line(value, locale));
}

fn minimal_line(value: &Value, locale: CurrencyLocale) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result else {
        return super::plain(result);
    };

    for key in PRIORITY_KEYS {
        match map.get(*key) {
            Some(Value::String(s)) if *key == "monthly_installment" => {
                return s
                    .parse::<Decimal>()
                    .map(|d| format_currency(d, locale))
                    .unwrap_or_else(|_| s.clone());
            }
            Some(v) if !v.is_null() => return super::plain(v),
            _ => {}
        }
    }

    // Handoff and submission outcomes nest the url one level down
    if let Some(Value::String(url)) = map.get("handoff").and_then(|h| h.get("url")) {
        return url.clone();
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, super::plain(val)),
        None => String::new(),
    }
}
