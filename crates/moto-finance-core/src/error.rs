use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotoFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Degenerate quote: down payment {down_payment} must be less than vehicle price {vehicle_price}")]
    DegenerateQuote {
        down_payment: Decimal,
        vehicle_price: Decimal,
    },

    #[error("Lead capture failed: {0}")]
    LeadCapture(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl MotoFinanceError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        MotoFinanceError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for MotoFinanceError {
    fn from(e: serde_json::Error) -> Self {
        MotoFinanceError::SerializationError(e.to_string())
    }
}
