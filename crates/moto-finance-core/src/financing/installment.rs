use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::MotoFinanceError;
use crate::types::{Money, Months, Rate};
use crate::MotoFinanceResult;

/// Longest term accepted by the calculator (40 years).
pub const MAX_TERM_MONTHS: Months = 480;

/// Financed amount: price minus down payment. May be zero or negative.
pub fn principal(vehicle_price: Money, down_payment: Money) -> Money {
    vehicle_price - down_payment
}

/// Ordinary-annuity payment factor `r(1+r)^n / ((1+r)^n - 1)`.
///
/// Multiplying a principal by this factor gives the level payment that
/// fully amortises it over `n` end-of-period installments.
pub fn annuity_factor(monthly_rate: Rate, term_months: Months) -> MotoFinanceResult<Decimal> {
    if term_months == 0 {
        return Err(MotoFinanceError::invalid(
            "term_months",
            "Term must be at least 1 month",
        ));
    }
    if term_months > MAX_TERM_MONTHS {
        return Err(MotoFinanceError::invalid(
            "term_months",
            format!("Term cannot exceed {MAX_TERM_MONTHS} months"),
        ));
    }
    if monthly_rate <= Decimal::ZERO {
        return Err(MotoFinanceError::invalid(
            "monthly_rate",
            "Monthly rate must be positive",
        ));
    }

    let growth = (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(term_months))
        .ok_or_else(|| {
            MotoFinanceError::invalid(
                "term_months",
                format!("(1 + {monthly_rate})^{term_months} overflows decimal range"),
            )
        })?;

    let denominator = growth - Decimal::ONE;
    if denominator <= Decimal::ZERO {
        // (1+r)^n underflowed back to 1 for a vanishingly small rate
        return Err(MotoFinanceError::invalid(
            "monthly_rate",
            "Monthly rate is too small to compound",
        ));
    }

    monthly_rate
        .checked_mul(growth)
        .and_then(|numerator| numerator.checked_div(denominator))
        .ok_or_else(|| MotoFinanceError::invalid("monthly_rate", "Annuity factor overflow"))
}

/// Fixed monthly installment for a vehicle financed at `monthly_rate`.
///
/// Returns zero when the down payment covers the whole price. The result is
/// left unrounded; use [`crate::format`] at the display boundary.
pub fn compute_installment(
    vehicle_price: Money,
    down_payment: Money,
    term_months: Months,
    monthly_rate: Rate,
) -> MotoFinanceResult<Money> {
    if vehicle_price <= Decimal::ZERO {
        return Err(MotoFinanceError::invalid(
            "vehicle_price",
            "Vehicle price must be positive",
        ));
    }
    if down_payment < Decimal::ZERO {
        return Err(MotoFinanceError::invalid(
            "down_payment",
            "Down payment cannot be negative",
        ));
    }

    let factor = annuity_factor(monthly_rate, term_months)?;

    let financed = principal(vehicle_price, down_payment);
    if financed <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    financed.checked_mul(factor).ok_or_else(|| {
        MotoFinanceError::invalid(
            "vehicle_price",
            "Installment overflows decimal range",
        )
    })
}
