use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::quote::QuoteTerms;
use crate::config::FinancingConfig;
use crate::error::MotoFinanceError;
use crate::types::*;
use crate::MotoFinanceResult;

/// A single month in the amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePeriod {
    pub month: Months,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// Month-by-month split of each installment into interest and principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub periods: Vec<SchedulePeriod>,
    pub total_interest_paid: Money,
    pub total_principal_paid: Money,
}

/// Price the terms and expand the quote into its amortization table.
///
/// Interest accrues on the opening balance at the configured monthly rate.
/// The final period repays whatever balance remains, so the schedule always
/// closes at exactly zero.
pub fn build_schedule(
    terms: &QuoteTerms,
    config: &FinancingConfig,
    first_due_date: Option<NaiveDate>,
) -> MotoFinanceResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // Term range is enforced here, before anything is allocated per month
    let quote = terms.price(config)?;

    let mut periods = Vec::new();
    let mut total_interest_paid = Decimal::ZERO;
    let mut total_principal_paid = Decimal::ZERO;

    if quote.degenerate {
        warnings.push("Nothing to amortize: down payment covers the vehicle price".into());
    } else {
        periods.reserve(quote.term_months as usize);
        let mut balance = quote.principal;

        for month in 1..=quote.term_months {
            let opening = balance;
            let interest = opening.checked_mul(quote.monthly_rate).ok_or_else(|| {
                MotoFinanceError::invalid("vehicle_price", "Interest overflows decimal range")
            })?;

            let (payment, repaid) = if month == quote.term_months {
                // Absorb residual decimal drift
                (opening + interest, opening)
            } else {
                let repaid = quote.monthly_installment - interest;
                (quote.monthly_installment, repaid)
            };

            balance -= repaid;
            total_interest_paid += interest;
            total_principal_paid += repaid;

            let due_date = match first_due_date {
                Some(first) => Some(
                    first
                        .checked_add_months(chrono::Months::new(month - 1))
                        .ok_or_else(|| {
                            MotoFinanceError::invalid(
                                "first_due_date",
                                format!("Due date for month {month} is out of range"),
                            )
                        })?,
                ),
                None => None,
            };

            periods.push(SchedulePeriod {
                month,
                due_date,
                opening_balance: opening,
                payment,
                interest,
                principal: repaid,
                closing_balance: balance,
            });
        }

        if let Some(last) = periods.last() {
            let drift = (last.payment - quote.monthly_installment).abs();
            if drift >= Decimal::new(1, 2) {
                warnings.push(format!(
                    "Final payment differs from the level installment by {}",
                    drift.round_dp(2)
                ));
            }
        }
    }

    let output = AmortizationSchedule {
        periods,
        total_interest_paid,
        total_principal_paid,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization schedule",
        &serde_json::json!({
            "principal": quote.principal.to_string(),
            "monthly_rate": quote.monthly_rate.to_string(),
            "term_months": quote.term_months,
            "first_due_date": first_due_date,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financing::LoanQuote;
    use rust_decimal_macros::dec;

    fn terms(down_payment: Money, term_months: Months) -> QuoteTerms {
        QuoteTerms {
            vehicle_price: dec!(25000),
            down_payment,
            term_months,
        }
    }

    fn schedule() -> ComputationOutput<AmortizationSchedule> {
        build_schedule(&terms(dec!(7500), 48), &FinancingConfig::default(), None).unwrap()
    }

    fn quote() -> LoanQuote {
        LoanQuote::compute(dec!(25000), dec!(7500), 48, dec!(0.018)).unwrap()
    }

    #[test]
    fn test_schedule_closes_at_zero() {
        let out = schedule();
        let sched = &out.result;
        assert_eq!(sched.periods.len(), 48);
        assert_eq!(sched.periods.last().unwrap().closing_balance, Decimal::ZERO);
        assert_eq!(sched.total_principal_paid.round_dp(8), dec!(17500));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_first_month_split() {
        let out = schedule();
        let first = &out.result.periods[0];
        assert_eq!(first.opening_balance, dec!(17500));
        // 17,500 * 1.8% = 315.00
        assert_eq!(first.interest, dec!(315.000));
        assert_eq!(
            (first.principal + first.interest).round_dp(10),
            quote().monthly_installment.round_dp(10)
        );
    }

    #[test]
    fn test_interest_declines_each_month() {
        let out = schedule();
        for pair in out.result.periods.windows(2) {
            assert!(pair[0].interest > pair[1].interest);
            assert!(pair[0].principal < pair[1].principal);
        }
    }

    #[test]
    fn test_total_interest_matches_quote() {
        let q = quote();
        let out = schedule();
        assert_eq!(
            out.result.total_interest_paid.round_dp(2),
            q.total_interest.round_dp(2)
        );
    }

    #[test]
    fn test_due_dates_step_monthly() {
        let first = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let out =
            build_schedule(&terms(dec!(7500), 48), &FinancingConfig::default(), Some(first))
                .unwrap();
        let dates: Vec<_> = out.result.periods[..3]
            .iter()
            .map(|p| p.due_date.unwrap())
            .collect();
        assert_eq!(dates[0], first);
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
    }

    #[test]
    fn test_degenerate_schedule_is_empty() {
        let out = build_schedule(&terms(dec!(25000), 48), &FinancingConfig::default(), None)
            .unwrap();
        assert!(out.result.periods.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_huge_term_rejected_before_allocation() {
        let err = build_schedule(&terms(dec!(7500), u32::MAX), &FinancingConfig::default(), None)
            .unwrap_err();
        match err {
            MotoFinanceError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rate_taken_from_config() {
        let config = FinancingConfig {
            monthly_rate: dec!(0.02),
            ..FinancingConfig::default()
        };
        let out = build_schedule(&terms(dec!(7500), 12), &config, None).unwrap();
        // 17,500 * 2% = 350.00
        assert_eq!(out.result.periods[0].interest, dec!(350.00));
    }
}
