use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::installment::{compute_installment, principal};
use crate::config::FinancingConfig;
use crate::error::MotoFinanceError;
use crate::format::format_currency;
use crate::types::*;
use crate::MotoFinanceResult;

/// What the customer has entered so far. Omitted fields fall back to the
/// dealer's [`FinancingConfig`]; the rate always comes from there.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationInput {
    pub vehicle_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<Months>,
}

impl SimulationInput {
    /// Fill the missing choices from the dealer defaults.
    pub fn resolve(&self, config: &FinancingConfig) -> MotoFinanceResult<QuoteTerms> {
        let down_payment = match self.down_payment {
            Some(down_payment) => down_payment,
            None => config.default_down_payment(self.vehicle_price)?,
        };
        Ok(QuoteTerms {
            vehicle_price: self.vehicle_price,
            down_payment,
            term_months: self.term_months.unwrap_or(config.default_term_months),
        })
    }
}

/// The customer's choices a quote is priced from.
///
/// Anything derived (principal, installment, totals) is recomputed against
/// the configured rate, so extra fields in a caller's JSON are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteTerms {
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub term_months: Months,
}

impl QuoteTerms {
    pub fn price(&self, config: &FinancingConfig) -> MotoFinanceResult<LoanQuote> {
        config.validate()?;
        LoanQuote::compute(
            self.vehicle_price,
            self.down_payment,
            self.term_months,
            config.monthly_rate,
        )
    }
}

impl From<&LoanQuote> for QuoteTerms {
    fn from(quote: &LoanQuote) -> Self {
        QuoteTerms {
            vehicle_price: quote.vehicle_price,
            down_payment: quote.down_payment,
            term_months: quote.term_months,
        }
    }
}

/// A fully resolved financing simulation. Rebuilt on every input change and
/// never read back from callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanQuote {
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub principal: Money,
    pub term_months: Months,
    pub monthly_rate: Rate,
    pub monthly_installment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Down payment meets or exceeds the price; installment is zero
    pub degenerate: bool,
}

impl LoanQuote {
    pub fn compute(
        vehicle_price: Money,
        down_payment: Money,
        term_months: Months,
        monthly_rate: Rate,
    ) -> MotoFinanceResult<Self> {
        let monthly_installment =
            compute_installment(vehicle_price, down_payment, term_months, monthly_rate)?;
        let financed = principal(vehicle_price, down_payment);
        let degenerate = financed <= Decimal::ZERO;

        let (total_paid, total_interest) = if degenerate {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            let paid = monthly_installment
                .checked_mul(Decimal::from(term_months))
                .ok_or_else(|| {
                    MotoFinanceError::invalid("vehicle_price", "Total paid overflows decimal range")
                })?;
            (paid, paid - financed)
        };

        tracing::debug!(
            %vehicle_price,
            %down_payment,
            term_months,
            %monthly_installment,
            degenerate,
            "quote recomputed"
        );

        Ok(LoanQuote {
            vehicle_price,
            down_payment,
            principal: financed,
            term_months,
            monthly_rate,
            monthly_installment,
            total_paid,
            total_interest,
            degenerate,
        })
    }
}

/// Resolve a simulation against the dealer configuration and price it.
pub fn build_quote(
    input: &SimulationInput,
    config: &FinancingConfig,
) -> MotoFinanceResult<ComputationOutput<LoanQuote>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.validate()?;
    let terms = input.resolve(config)?;
    let quote = terms.price(config)?;

    if quote.degenerate {
        warnings.push(format!(
            "Down payment {} covers the vehicle price {}; no financing needed",
            format_currency(quote.down_payment, config.locale),
            format_currency(quote.vehicle_price, config.locale),
        ));
    } else if terms.down_payment > config.max_down_payment(terms.vehicle_price)? {
        warnings.push(format!(
            "Down payment exceeds {}% of the vehicle price",
            (config.max_entry_pct * Decimal::ONE_HUNDRED).normalize()
        ));
    }
    if !config.is_offered(terms.term_months) {
        warnings.push(format!(
            "Term of {} months is not among the offered terms {:?}",
            terms.term_months,
            config.sorted_terms()
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment annuity (ordinary annuity, end-of-period installments)",
        &serde_json::json!({
            "vehicle_price": input.vehicle_price.to_string(),
            "down_payment": terms.down_payment.to_string(),
            "term_months": terms.term_months,
            "monthly_rate": quote.monthly_rate.to_string(),
            "down_payment_defaulted": input.down_payment.is_none(),
        }),
        warnings,
        elapsed,
        quote,
    ))
}

/// Gate applied before a quote may be sent on as a lead.
///
/// The calculation itself tolerates `down_payment >= vehicle_price` so the
/// simulator can show a zero installment while the customer types; the
/// submission step must not.
pub fn validate_for_submission(quote: &LoanQuote) -> MotoFinanceResult<()> {
    if quote.vehicle_price <= Decimal::ZERO {
        return Err(MotoFinanceError::invalid(
            "vehicle_price",
            "Vehicle price must be positive",
        ));
    }
    if quote.down_payment < Decimal::ZERO {
        return Err(MotoFinanceError::invalid(
            "down_payment",
            "Down payment cannot be negative",
        ));
    }
    if quote.down_payment >= quote.vehicle_price {
        return Err(MotoFinanceError::DegenerateQuote {
            down_payment: quote.down_payment,
            vehicle_price: quote.vehicle_price,
        });
    }
    Ok(())
}
