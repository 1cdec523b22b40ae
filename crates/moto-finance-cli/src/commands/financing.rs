use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use moto_finance_core::financing::{build_quote, schedule, terms, SimulationInput};
use moto_finance_core::format::format_currency;
use moto_finance_core::FinancingConfig;

use crate::input;

/// Arguments for a single installment calculation
#[derive(Args)]
pub struct InstallmentArgs {
    /// Vehicle price (e.g. 25000)
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment; defaults to the configured entry percentage of the price
    #[arg(long, alias = "entry")]
    pub down_payment: Option<Decimal>,

    /// Number of monthly installments; defaults to the configured term
    #[arg(long)]
    pub term: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a full quote
#[derive(Args)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub simulation: InstallmentArgs,
}

/// Arguments for the term comparison
#[derive(Args)]
pub struct TermsArgs {
    /// Vehicle price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment; defaults to the configured entry percentage of the price
    #[arg(long, alias = "entry")]
    pub down_payment: Option<Decimal>,

    /// Path to JSON input file with `vehicle_price` and optional `down_payment`
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub simulation: InstallmentArgs,

    /// Due date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    pub first_due: Option<NaiveDate>,
}

fn simulation_input(args: &InstallmentArgs) -> Result<SimulationInput, Box<dyn std::error::Error>> {
    if let Some(price) = args.price {
        return Ok(SimulationInput {
            vehicle_price: price,
            down_payment: args.down_payment,
            term_months: args.term,
        });
    }
    input::read_input(args.input.as_deref())?
        .ok_or_else(|| "--price is required (or provide --input / stdin)".into())
}

pub fn run_installment(
    args: InstallmentArgs,
    config: &FinancingConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let output = build_quote(&simulation_input(&args)?, config)?;
    let quote = output.result;

    Ok(json!({
        "result": {
            "monthly_installment": quote.monthly_installment.to_string(),
            "formatted": format_currency(quote.monthly_installment, config.locale),
            "principal": quote.principal.to_string(),
            "term_months": quote.term_months,
            "monthly_rate": quote.monthly_rate.to_string(),
        },
        "warnings": output.warnings,
    }))
}

pub fn run_quote(
    args: QuoteArgs,
    config: &FinancingConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let result = build_quote(&simulation_input(&args.simulation)?, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_terms(
    args: TermsArgs,
    config: &FinancingConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let sim = match args.price {
        Some(price) => SimulationInput {
            vehicle_price: price,
            down_payment: args.down_payment,
            term_months: None,
        },
        None => input::read_input(args.input.as_deref())?
            .ok_or("--price is required (or provide --input / stdin)")?,
    };

    let chosen = sim.resolve(config)?;
    let result = terms::compare_terms(chosen.vehicle_price, chosen.down_payment, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(
    args: ScheduleArgs,
    config: &FinancingConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let chosen = simulation_input(&args.simulation)?.resolve(config)?;
    let result = schedule::build_schedule(&chosen, config, args.first_due)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flags(price: Decimal, down_payment: Option<Decimal>, term: Option<u32>) -> InstallmentArgs {
        InstallmentArgs {
            price: Some(price),
            down_payment,
            term,
            input: None,
        }
    }

    #[test]
    fn test_installment_defaults_from_config() {
        let out = run_installment(flags(dec!(25000), None, None), &FinancingConfig::default()).unwrap();
        assert_eq!(out["result"]["formatted"], "R$ 547,56");
        assert_eq!(out["result"]["term_months"], 48);
        assert_eq!(out["result"]["principal"], "17500.00");
    }

    #[test]
    fn test_installment_uses_configured_rate() {
        let config = FinancingConfig {
            monthly_rate: dec!(0.02),
            ..FinancingConfig::default()
        };
        let out = run_installment(flags(dec!(25000), Some(dec!(7500)), Some(12)), &config).unwrap();
        assert_eq!(out["result"]["monthly_rate"], "0.02");
    }

    #[test]
    fn test_installment_rejects_bad_rate() {
        let config = FinancingConfig {
            monthly_rate: dec!(0),
            ..FinancingConfig::default()
        };
        assert!(run_installment(flags(dec!(25000), Some(dec!(0)), Some(12)), &config).is_err());
    }

    #[test]
    fn test_installment_warns_on_unoffered_term() {
        let out = run_installment(
            flags(dec!(25000), Some(dec!(7500)), Some(60)),
            &FinancingConfig::default(),
        )
        .unwrap();
        assert_eq!(out["warnings"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_schedule_rejects_term_above_ceiling() {
        let args = ScheduleArgs {
            simulation: flags(dec!(12000), Some(dec!(2000)), Some(u32::MAX)),
            first_due: None,
        };
        assert!(run_schedule(args, &FinancingConfig::default()).is_err());
    }

    #[test]
    fn test_terms_lists_each_offered_term() {
        let args = TermsArgs {
            price: Some(dec!(25000)),
            down_payment: Some(dec!(7500)),
            input: None,
        };
        let out = run_terms(args, &FinancingConfig::default()).unwrap();
        let options = out["result"]["options"].as_array().unwrap();
        assert_eq!(options.len(), 4);
        assert_eq!(options[0]["term_months"], 12);
    }

    #[test]
    fn test_schedule_with_first_due_date() {
        let args = ScheduleArgs {
            simulation: flags(dec!(12000), Some(dec!(2000)), Some(12)),
            first_due: NaiveDate::from_ymd_opt(2026, 11, 10),
        };
        let out = run_schedule(args, &FinancingConfig::default()).unwrap();
        let periods = out["result"]["periods"].as_array().unwrap();
        assert_eq!(periods.len(), 12);
        assert_eq!(periods[11]["due_date"], "2027-10-10");
    }
}
