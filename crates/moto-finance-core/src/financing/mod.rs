pub mod installment;
pub mod quote;
pub mod schedule;
pub mod terms;

pub use installment::{annuity_factor, compute_installment, MAX_TERM_MONTHS};
pub use quote::{build_quote, validate_for_submission, LoanQuote, QuoteTerms, SimulationInput};
