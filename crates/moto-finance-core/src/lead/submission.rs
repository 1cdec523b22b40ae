use serde::{Deserialize, Serialize};

use super::handoff::{render_handoff, Handoff, HandoffRequest};
use super::{Lead, LeadSink};
use crate::config::FinancingConfig;
use crate::financing::validate_for_submission;
use crate::MotoFinanceResult;

/// Result of sending a simulation on to the dealer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub handoff: Handoff,
    pub lead: Lead,
    pub lead_persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_error: Option<String>,
}

/// Reprice and validate the quote, record the lead and build the messaging
/// handoff.
///
/// A degenerate quote or invalid contact data stops the submission. A sink
/// failure does not: it is logged and reported in the outcome, and the
/// handoff is still returned so the customer's message reaches the dealer.
pub async fn submit_simulation<S>(
    sink: &S,
    store_slug: &str,
    request: &HandoffRequest,
    source: &str,
    config: &FinancingConfig,
) -> MotoFinanceResult<SubmissionOutcome>
where
    S: LeadSink + ?Sized,
{
    let quote = request.terms.price(config)?;
    validate_for_submission(&quote)?;

    let lead = Lead::new(
        &request.customer.name,
        &request.customer.phone,
        Some(request.vehicle.id.as_str()),
        source,
    )?;
    let handoff = render_handoff(request, &quote, config.locale)?;

    let (lead_persisted, lead_error) = match sink.create_lead(store_slug, &lead).await {
        Ok(()) => {
            tracing::info!(store_slug, source, "lead recorded");
            (true, None)
        }
        Err(e) => {
            tracing::warn!(store_slug, source, error = %e, "lead capture failed; continuing with handoff");
            (false, Some(e.to_string()))
        }
    };

    Ok(SubmissionOutcome {
        handoff,
        lead,
        lead_persisted,
        lead_error,
    })
}
