pub mod config;
pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "financing")]
pub mod financing;

#[cfg(feature = "leads")]
pub mod lead;

pub use config::FinancingConfig;
pub use error::MotoFinanceError;
pub use types::*;

/// Standard result type for all moto-finance operations
pub type MotoFinanceResult<T> = Result<T, MotoFinanceError>;
