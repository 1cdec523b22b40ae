use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::installment::principal;
use super::quote::LoanQuote;
use crate::config::FinancingConfig;
use crate::types::*;
use crate::MotoFinanceResult;

/// Installment for a single offered term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermOption {
    pub term_months: Months,
    pub monthly_installment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
}

/// Side-by-side view of every term the dealer offers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermComparison {
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub principal: Money,
    pub monthly_rate: Rate,
    pub options: Vec<TermOption>,
}

/// Price the same vehicle and down payment across every offered term.
pub fn compare_terms(
    vehicle_price: Money,
    down_payment: Money,
    config: &FinancingConfig,
) -> MotoFinanceResult<ComputationOutput<TermComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.validate()?;

    let terms = config.sorted_terms();
    let mut options = Vec::with_capacity(terms.len());
    let financed = principal(vehicle_price, down_payment);

    for term_months in terms {
        let quote = LoanQuote::compute(vehicle_price, down_payment, term_months, config.monthly_rate)?;
        options.push(TermOption {
            term_months,
            monthly_installment: quote.monthly_installment,
            total_paid: quote.total_paid,
            total_interest: quote.total_interest,
        });
    }

    if financed <= Decimal::ZERO {
        warnings.push("Down payment covers the vehicle price; all installments are zero".into());
    }

    let output = TermComparison {
        vehicle_price,
        down_payment,
        principal: financed,
        monthly_rate: config.monthly_rate,
        options,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment annuity across offered terms",
        &serde_json::json!({
            "monthly_rate": config.monthly_rate.to_string(),
            "offered_terms": config.sorted_terms(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_installments_fall_as_term_grows() {
        let out = compare_terms(dec!(25000), dec!(7500), &FinancingConfig::default()).unwrap();
        let opts = &out.result.options;
        assert_eq!(
            opts.iter().map(|o| o.term_months).collect::<Vec<_>>(),
            vec![12, 24, 36, 48]
        );
        for pair in opts.windows(2) {
            assert!(pair[0].monthly_installment > pair[1].monthly_installment);
            assert!(pair[0].total_interest < pair[1].total_interest);
        }
        assert_eq!(opts[0].monthly_installment.round_dp(2), dec!(1634.53));
        assert_eq!(opts[1].monthly_installment.round_dp(2), dec!(904.41));
        assert_eq!(opts[2].monthly_installment.round_dp(2), dec!(664.72));
    }

    #[test]
    fn test_degenerate_comparison() {
        let out = compare_terms(dec!(25000), dec!(30000), &FinancingConfig::default()).unwrap();
        assert!(out
            .result
            .options
            .iter()
            .all(|o| o.monthly_installment == Decimal::ZERO));
        assert_eq!(out.warnings.len(), 1);
    }
}
