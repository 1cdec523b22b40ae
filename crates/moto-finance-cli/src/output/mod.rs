pub mod csv_out;
pub mod minimal;
pub mod table;

use moto_finance_core::format::{format_amount, CurrencyLocale};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::OutputFormat;

/// Result fields holding currency amounts. Rendered rounded to cents in the
/// human-facing formats; JSON keeps the full-precision strings.
const MONEY_FIELDS: &[&str] = &[
    "vehicle_price",
    "down_payment",
    "principal",
    "monthly_installment",
    "total_paid",
    "total_interest",
    "opening_balance",
    "payment",
    "interest",
    "closing_balance",
    "total_interest_paid",
    "total_principal_paid",
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value, locale: CurrencyLocale) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value, locale),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value, locale),
    }
}

/// Render a single field for human display.
pub(crate) fn display_field(key: &str, value: &Value, locale: CurrencyLocale) -> String {
    match value {
        Value::String(s) if MONEY_FIELDS.contains(&key) => s
            .parse::<Decimal>()
            .map(|d| format_amount(d, locale))
            .unwrap_or_else(|_| s.clone()),
        _ => plain(value),
    }
}

pub(crate) fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_money_fields_rounded_for_display() {
        let v = json!("547.5631202035817601148451");
        assert_eq!(
            display_field("monthly_installment", &v, CurrencyLocale::PtBr),
            "547,56"
        );
        assert_eq!(
            display_field("monthly_rate", &json!("0.018"), CurrencyLocale::PtBr),
            "0.018"
        );
    }

    #[test]
    fn test_non_money_passthrough() {
        assert_eq!(display_field("term_months", &json!(48), CurrencyLocale::EnUs), "48");
        assert_eq!(plain(&Value::Null), "");
    }
}
