//! Lead capture: the customer contact record produced by a financing
//! simulation, and the sink it is persisted through.

pub mod handoff;
pub mod submission;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::error::MotoFinanceError;
use crate::MotoFinanceResult;

pub use handoff::{build_handoff, CustomerContact, Handoff, HandoffRequest, VehicleRef};
pub use submission::{submit_simulation, SubmissionOutcome};

/// Source tag for leads raised from the vehicle-page financing modal
pub const SOURCE_FINANCING_MODAL: &str = "financing_modal";
/// Source tag for leads raised from the standalone simulator page
pub const SOURCE_FINANCING_SIMULATOR: &str = "financing_simulator";

const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 13;
const MASK_DIGITS: usize = 11;

/// A prospective customer captured by the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    /// Digits only
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_reference: Option<String>,
    pub source: String,
    pub captured_at: DateTime<Utc>,
}

impl Lead {
    pub fn new(
        name: &str,
        phone: &str,
        vehicle_reference: Option<&str>,
        source: &str,
    ) -> MotoFinanceResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MotoFinanceError::invalid("name", "Customer name is required"));
        }

        let phone = digits_only(phone);
        if phone.len() < MIN_PHONE_DIGITS || phone.len() > MAX_PHONE_DIGITS {
            return Err(MotoFinanceError::invalid(
                "phone",
                format!(
                    "Phone must have {MIN_PHONE_DIGITS} to {MAX_PHONE_DIGITS} digits, got {}",
                    phone.len()
                ),
            ));
        }

        if source.trim().is_empty() {
            return Err(MotoFinanceError::invalid("source", "Lead source is required"));
        }

        Ok(Lead {
            name: name.to_string(),
            phone,
            vehicle_reference: vehicle_reference
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from),
            source: source.to_string(),
            captured_at: Utc::now(),
        })
    }
}

/// Persistence collaborator for captured leads (hosted backend, CRM, ...).
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn create_lead(&self, store_slug: &str, lead: &Lead) -> MotoFinanceResult<()>;
}

/// Keeps leads in process memory. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryLeadSink {
    leads: Mutex<Vec<(String, Lead)>>,
}

impl InMemoryLeadSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every `(store_slug, lead)` recorded so far.
    pub fn leads(&self) -> Vec<(String, Lead)> {
        match self.leads.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl LeadSink for InMemoryLeadSink {
    async fn create_lead(&self, store_slug: &str, lead: &Lead) -> MotoFinanceResult<()> {
        if store_slug.trim().is_empty() {
            return Err(MotoFinanceError::LeadCapture("store slug is empty".into()));
        }
        let mut guard = self
            .leads
            .lock()
            .map_err(|e| MotoFinanceError::LeadCapture(e.to_string()))?;
        guard.push((store_slug.to_string(), lead.clone()));
        Ok(())
    }
}

/// Strip everything but ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Progressive Brazilian phone mask: "(82) 99999-8888".
pub fn mask_phone(raw: &str) -> String {
    let digits: String = digits_only(raw).chars().take(MASK_DIGITS).collect();
    if digits.len() <= 2 {
        return digits;
    }

    let (area, rest) = digits.split_at(2);
    if rest.len() > 4 {
        let (head, tail) = rest.split_at(rest.len() - 4);
        format!("({area}) {head}-{tail}")
    } else {
        format!("({area}) {rest}")
    }
}

/// Progressive CPF mask: "000.000.000-00".
pub fn mask_cpf(raw: &str) -> String {
    let digits: String = digits_only(raw).chars().take(MASK_DIGITS).collect();
    let (body, check) = digits.split_at(digits.len().min(9));

    let groups: Vec<&str> = body
        .as_bytes()
        .chunks(3)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect();

    let mut masked = groups.join(".");
    if !check.is_empty() {
        masked.push('-');
        masked.push_str(check);
    }
    masked
}
