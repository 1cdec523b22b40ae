//! Currency rendering for display surfaces.
//!
//! Kept apart from the arithmetic so quotes stay unrounded until the moment
//! they are shown to a customer.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Locale used for grouping, decimal separator and currency symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyLocale {
    /// Brazilian real, "R$ 1.234,56"
    #[default]
    #[serde(rename = "pt-BR", alias = "pt_br", alias = "PtBr")]
    PtBr,
    /// US dollar, "$1,234.56"
    #[serde(rename = "en-US", alias = "en_us", alias = "EnUs")]
    EnUs,
}

impl CurrencyLocale {
    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyLocale::PtBr => "R$",
            CurrencyLocale::EnUs => "$",
        }
    }

    fn group_separator(&self) -> char {
        match self {
            CurrencyLocale::PtBr => '.',
            CurrencyLocale::EnUs => ',',
        }
    }

    fn decimal_separator(&self) -> char {
        match self {
            CurrencyLocale::PtBr => ',',
            CurrencyLocale::EnUs => '.',
        }
    }

    fn symbol_separator(&self) -> &'static str {
        match self {
            CurrencyLocale::PtBr => " ",
            CurrencyLocale::EnUs => "",
        }
    }
}

impl std::str::FromStr for CurrencyLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" => Ok(CurrencyLocale::PtBr),
            "en-us" => Ok(CurrencyLocale::EnUs),
            other => Err(format!("unsupported locale '{other}' (expected pt-BR or en-US)")),
        }
    }
}

/// Render `amount` with currency symbol, grouping and exactly 2 decimals.
pub fn format_currency(amount: Money, locale: CurrencyLocale) -> String {
    let (negative, body) = grouped(amount, locale);
    let sign = if negative { "-" } else { "" };
    format!(
        "{sign}{}{}{body}",
        locale.symbol(),
        locale.symbol_separator()
    )
}

/// Render `amount` with grouping and exactly 2 decimals, no symbol.
pub fn format_amount(amount: Money, locale: CurrencyLocale) -> String {
    let (negative, body) = grouped(amount, locale);
    if negative {
        format!("-{body}")
    } else {
        body
    }
}

fn grouped(amount: Money, locale: CurrencyLocale) -> (bool, String) {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    let negative = rounded < Decimal::ZERO;

    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut int_grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            int_grouped.push(locale.group_separator());
        }
        int_grouped.push(ch);
    }

    (
        negative,
        format!("{int_grouped}{}{frac_part}", locale.decimal_separator()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pt_br_grouping_and_comma() {
        assert_eq!(
            format_currency(dec!(547.5631202), CurrencyLocale::PtBr),
            "R$ 547,56"
        );
        assert_eq!(
            format_currency(dec!(25000), CurrencyLocale::PtBr),
            "R$ 25.000,00"
        );
        assert_eq!(
            format_currency(dec!(1234567.891), CurrencyLocale::PtBr),
            "R$ 1.234.567,89"
        );
    }

    #[test]
    fn test_en_us() {
        assert_eq!(
            format_currency(dec!(1634.5345952), CurrencyLocale::EnUs),
            "$1,634.53"
        );
        assert_eq!(format_currency(dec!(0), CurrencyLocale::EnUs), "$0.00");
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(format_amount(dec!(0.125), CurrencyLocale::EnUs), "0.13");
        assert_eq!(format_amount(dec!(-0.125), CurrencyLocale::EnUs), "-0.13");
    }

    #[test]
    fn test_negative_sign_before_symbol() {
        assert_eq!(
            format_currency(dec!(-1500.5), CurrencyLocale::PtBr),
            "-R$ 1.500,50"
        );
    }

    #[test]
    fn test_exact_thousand_boundaries() {
        assert_eq!(format_amount(dec!(999.999), CurrencyLocale::PtBr), "1.000,00");
        assert_eq!(format_amount(dec!(100000), CurrencyLocale::EnUs), "100,000.00");
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("pt-BR".parse::<CurrencyLocale>().unwrap(), CurrencyLocale::PtBr);
        assert_eq!("en_us".parse::<CurrencyLocale>().unwrap(), CurrencyLocale::EnUs);
        assert!("fr-FR".parse::<CurrencyLocale>().is_err());
    }
}
