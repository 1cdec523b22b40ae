use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MotoFinanceError;
use crate::format::CurrencyLocale;
use crate::types::{Money, Months, Rate};
use crate::MotoFinanceResult;

/// Dealer-level financing settings.
///
/// The rate is configuration, never user input. Both storefront surfaces
/// (standalone simulator and the vehicle modal) read the same instance so
/// their defaults cannot drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingConfig {
    /// Nominal rate applied per monthly period
    pub monthly_rate: Rate,
    /// Terms offered to the customer, in months
    pub offered_terms: Vec<Months>,
    /// Term preselected when the simulator opens
    pub default_term_months: Months,
    /// Down payment preselected as a fraction of the vehicle price
    pub default_entry_pct: Rate,
    /// Ceiling of the down-payment slider as a fraction of the price
    pub max_entry_pct: Rate,
    pub locale: CurrencyLocale,
}

impl Default for FinancingConfig {
    fn default() -> Self {
        Self {
            monthly_rate: dec!(0.018),
            offered_terms: vec![12, 24, 36, 48],
            default_term_months: 48,
            default_entry_pct: dec!(0.30),
            max_entry_pct: dec!(0.90),
            locale: CurrencyLocale::default(),
        }
    }
}

impl FinancingConfig {
    pub fn validate(&self) -> MotoFinanceResult<()> {
        if self.monthly_rate <= Decimal::ZERO {
            return Err(MotoFinanceError::Config(
                "monthly_rate must be positive".into(),
            ));
        }
        if self.offered_terms.is_empty() {
            return Err(MotoFinanceError::Config(
                "offered_terms must list at least one term".into(),
            ));
        }
        if self.offered_terms.contains(&0) || self.default_term_months == 0 {
            return Err(MotoFinanceError::Config(
                "terms must be at least 1 month".into(),
            ));
        }
        if self.default_entry_pct < Decimal::ZERO || self.default_entry_pct >= Decimal::ONE {
            return Err(MotoFinanceError::Config(
                "default_entry_pct must be in [0, 1)".into(),
            ));
        }
        if self.max_entry_pct <= Decimal::ZERO || self.max_entry_pct > Decimal::ONE {
            return Err(MotoFinanceError::Config(
                "max_entry_pct must be in (0, 1]".into(),
            ));
        }
        if self.default_entry_pct > self.max_entry_pct {
            return Err(MotoFinanceError::Config(
                "default_entry_pct cannot exceed max_entry_pct".into(),
            ));
        }
        Ok(())
    }

    /// Offered terms, deduplicated and in ascending order.
    pub fn sorted_terms(&self) -> Vec<Months> {
        let mut terms = self.offered_terms.clone();
        terms.sort_unstable();
        terms.dedup();
        terms
    }

    /// Down payment preselected for a vehicle at `vehicle_price`.
    pub fn default_down_payment(&self, vehicle_price: Money) -> MotoFinanceResult<Money> {
        share_of_price(vehicle_price, self.default_entry_pct, "default_entry_pct")
    }

    /// Upper end of the down-payment slider for a vehicle at `vehicle_price`.
    pub fn max_down_payment(&self, vehicle_price: Money) -> MotoFinanceResult<Money> {
        share_of_price(vehicle_price, self.max_entry_pct, "max_entry_pct")
    }

    pub fn is_offered(&self, term_months: Months) -> bool {
        self.offered_terms.contains(&term_months)
    }

    /// Parse a JSON document, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> MotoFinanceResult<Self> {
        let config: FinancingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

fn share_of_price(vehicle_price: Money, pct: Rate, field: &str) -> MotoFinanceResult<Money> {
    vehicle_price
        .checked_mul(pct)
        .ok_or_else(|| MotoFinanceError::invalid(field, "Share of the vehicle price overflows"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = FinancingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.monthly_rate, dec!(0.018));
        assert_eq!(config.sorted_terms(), vec![12, 24, 36, 48]);
    }

    #[test]
    fn test_rejects_zero_rate() {
        let config = FinancingConfig {
            monthly_rate: Decimal::ZERO,
            ..FinancingConfig::default()
        };
        assert!(matches!(config.validate(), Err(MotoFinanceError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_term() {
        let config = FinancingConfig {
            offered_terms: vec![0, 12],
            ..FinancingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_entry_above_ceiling() {
        let config = FinancingConfig {
            default_entry_pct: dec!(0.95),
            ..FinancingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sorted_terms_dedups() {
        let config = FinancingConfig {
            offered_terms: vec![48, 12, 24, 12],
            ..FinancingConfig::default()
        };
        assert_eq!(config.sorted_terms(), vec![12, 24, 48]);
    }

    #[test]
    fn test_entry_shares_of_price() {
        let config = FinancingConfig::default();
        assert_eq!(config.default_down_payment(dec!(25000)).unwrap(), dec!(7500));
        assert_eq!(config.max_down_payment(dec!(25000)).unwrap(), dec!(22500));
    }

    #[test]
    fn test_from_json_partial() {
        let config = FinancingConfig::from_json(r#"{"monthly_rate": "0.021"}"#).unwrap();
        assert_eq!(config.monthly_rate, dec!(0.021));
        assert_eq!(config.default_term_months, 48);
    }
}
