use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use moto_finance_core::financing::{self, schedule, terms, QuoteTerms, SimulationInput};
use moto_finance_core::format::{self, CurrencyLocale};
use moto_finance_core::lead::{self, HandoffRequest};
use moto_finance_core::FinancingConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Optional config JSON; empty or missing means the dealer defaults.
fn parse_config(config_json: Option<String>) -> NapiResult<FinancingConfig> {
    match config_json.filter(|s| !s.trim().is_empty()) {
        Some(json) => FinancingConfig::from_json(&json).map_err(to_napi_error),
        None => Ok(FinancingConfig::default()),
    }
}

fn parse_locale(locale: Option<String>) -> NapiResult<CurrencyLocale> {
    match locale {
        Some(l) => l.parse().map_err(to_napi_error),
        None => Ok(CurrencyLocale::default()),
    }
}

// ---------------------------------------------------------------------------
// Financing
// ---------------------------------------------------------------------------

/// Raw installment as a decimal string at the configured rate. Called on
/// every keystroke/slider move.
#[napi]
pub fn compute_installment(
    vehicle_price: String,
    down_payment: String,
    term_months: u32,
    config_json: Option<String>,
) -> NapiResult<String> {
    let price: Decimal = vehicle_price.parse().map_err(to_napi_error)?;
    let entry: Decimal = down_payment.parse().map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let installment =
        financing::compute_installment(price, entry, term_months, config.monthly_rate)
            .map_err(to_napi_error)?;
    Ok(installment.to_string())
}

#[napi]
pub fn build_quote(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: SimulationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let output = financing::build_quote(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Throws when the terms may not be submitted (down payment >= price).
#[napi]
pub fn validate_for_submission(terms_json: String, config_json: Option<String>) -> NapiResult<()> {
    let terms: QuoteTerms = serde_json::from_str(&terms_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let quote = terms.price(&config).map_err(to_napi_error)?;
    financing::validate_for_submission(&quote).map_err(to_napi_error)
}

#[napi]
pub fn compare_terms(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: SimulationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let chosen = input.resolve(&config).map_err(to_napi_error)?;
    let output = terms::compare_terms(chosen.vehicle_price, chosen.down_payment, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_schedule(
    terms_json: String,
    config_json: Option<String>,
    first_due_date: Option<String>,
) -> NapiResult<String> {
    let terms: QuoteTerms = serde_json::from_str(&terms_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let first = first_due_date
        .map(|d| d.parse::<NaiveDate>())
        .transpose()
        .map_err(to_napi_error)?;
    let output = schedule::build_schedule(&terms, &config, first).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(amount: String, locale: Option<String>) -> NapiResult<String> {
    let value: Decimal = amount.parse().map_err(to_napi_error)?;
    Ok(format::format_currency(value, parse_locale(locale)?))
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

#[napi]
pub fn mask_phone(raw: String) -> String {
    lead::mask_phone(&raw)
}

#[napi]
pub fn mask_cpf(raw: String) -> String {
    lead::mask_cpf(&raw)
}

#[napi]
pub fn build_handoff(request_json: String, config_json: Option<String>) -> NapiResult<String> {
    let request: HandoffRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let output = lead::build_handoff(&request, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
