use serde::{Deserialize, Serialize};

use super::digits_only;
use crate::error::MotoFinanceError;
use crate::config::FinancingConfig;
use crate::financing::{LoanQuote, QuoteTerms};
use crate::format::{format_currency, CurrencyLocale};
use crate::MotoFinanceResult;

const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Vehicle the simulation was run for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRef {
    pub id: String,
    pub make: String,
    pub model: String,
}

impl VehicleRef {
    pub fn label(&self) -> String {
        format!("{} {}", self.make.trim(), self.model.trim())
            .trim()
            .to_string()
    }
}

/// Contact details typed by the customer in the lead step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
}

/// Everything the storefront sends when the customer asks to talk to the
/// dealer. Only the customer's choices travel; the quote is repriced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffRequest {
    /// Dealer's messaging number, any punctuation
    pub dealer_phone: String,
    pub vehicle: VehicleRef,
    pub terms: QuoteTerms,
    pub customer: CustomerContact,
}

/// Ready-to-open deep link plus the plain message it carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handoff {
    pub message: String,
    pub url: String,
}

struct Labels {
    title: &'static str,
    vehicle: &'static str,
    price: &'static str,
    entry: &'static str,
    term: &'static str,
    of: &'static str,
    customer: &'static str,
    tax_id: &'static str,
    phone: &'static str,
    closing: &'static str,
}

fn labels(locale: CurrencyLocale) -> Labels {
    match locale {
        CurrencyLocale::PtBr => Labels {
            title: "Simulação de Financiamento",
            vehicle: "Moto",
            price: "Valor",
            entry: "Entrada",
            term: "Prazo",
            of: "de",
            customer: "Cliente",
            tax_id: "CPF",
            phone: "Tel",
            closing: "Gostaria de verificar a aprovação para esta condição.",
        },
        CurrencyLocale::EnUs => Labels {
            title: "Financing Simulation",
            vehicle: "Motorcycle",
            price: "Price",
            entry: "Down payment",
            term: "Term",
            of: "of",
            customer: "Customer",
            tax_id: "Tax ID",
            phone: "Phone",
            closing: "I would like to check approval for these terms.",
        },
    }
}

/// Render the simulation summary sent to the dealer.
pub fn format_message(request: &HandoffRequest, q: &LoanQuote, locale: CurrencyLocale) -> String {
    let l = labels(locale);

    let mut message = format!("*{}*\n\n", l.title);
    message.push_str(&format!("🏍️ *{}:* {}\n", l.vehicle, request.vehicle.label()));
    message.push_str(&format!(
        "💰 *{}:* {}\n",
        l.price,
        format_currency(q.vehicle_price, locale)
    ));
    message.push_str(&format!(
        "📉 *{}:* {}\n",
        l.entry,
        format_currency(q.down_payment, locale)
    ));
    message.push_str(&format!(
        "📅 *{}:* {}x {} {}\n\n",
        l.term,
        q.term_months,
        l.of,
        format_currency(q.monthly_installment, locale)
    ));
    message.push_str(&format!("👤 *{}:* {}\n", l.customer, request.customer.name.trim()));
    if let Some(cpf) = request.customer.cpf.as_deref().filter(|c| !c.trim().is_empty()) {
        message.push_str(&format!("📄 *{}:* {}\n", l.tax_id, cpf.trim()));
    }
    message.push_str(&format!("📱 *{}:* {}\n\n", l.phone, request.customer.phone.trim()));
    message.push_str(&format!("_{}_", l.closing));
    message
}

/// Reprice the request at the configured rate and build the messaging deep
/// link for it.
pub fn build_handoff(
    request: &HandoffRequest,
    config: &FinancingConfig,
) -> MotoFinanceResult<Handoff> {
    let quote = request.terms.price(config)?;
    render_handoff(request, &quote, config.locale)
}

pub(crate) fn render_handoff(
    request: &HandoffRequest,
    quote: &LoanQuote,
    locale: CurrencyLocale,
) -> MotoFinanceResult<Handoff> {
    let dealer = digits_only(&request.dealer_phone);
    if dealer.is_empty() {
        return Err(MotoFinanceError::invalid(
            "dealer_phone",
            "Dealer messaging number is not configured",
        ));
    }

    let message = format_message(request, quote, locale);
    let url = format!(
        "{WHATSAPP_BASE_URL}/{dealer}?text={}",
        urlencoding::encode(&message)
    );

    Ok(Handoff { message, url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> HandoffRequest {
        HandoffRequest {
            dealer_phone: "+55 (82) 99999-0000".into(),
            vehicle: VehicleRef {
                id: "b3f1c2d4-0000-4a5b-9c8d-123456789abc".into(),
                make: "Honda".into(),
                model: "CG 160 Titan".into(),
            },
            terms: QuoteTerms {
                vehicle_price: dec!(25000),
                down_payment: dec!(7500),
                term_months: 48,
            },
            customer: CustomerContact {
                name: "Maria Souza".into(),
                phone: "(82) 98888-7777".into(),
                cpf: Some("123.456.789-01".into()),
            },
        }
    }

    fn message(req: &HandoffRequest, locale: CurrencyLocale) -> String {
        let config = FinancingConfig {
            locale,
            ..FinancingConfig::default()
        };
        build_handoff(req, &config).unwrap().message
    }

    #[test]
    fn test_message_contents_pt_br() {
        let msg = message(&request(), CurrencyLocale::PtBr);
        assert!(msg.starts_with("*Simulação de Financiamento*"));
        assert!(msg.contains("*Moto:* Honda CG 160 Titan"));
        assert!(msg.contains("*Valor:* R$ 25.000,00"));
        assert!(msg.contains("*Entrada:* R$ 7.500,00"));
        assert!(msg.contains("*Prazo:* 48x de R$ 547,56"));
        assert!(msg.contains("*CPF:* 123.456.789-01"));
        assert!(msg.contains("*Tel:* (82) 98888-7777"));
    }

    #[test]
    fn test_message_omits_missing_cpf() {
        let mut req = request();
        req.customer.cpf = None;
        let msg = message(&req, CurrencyLocale::EnUs);
        assert!(!msg.contains("Tax ID"));
        assert!(msg.contains("*Term:* 48x of $547.56"));
    }

    #[test]
    fn test_url_is_encoded() {
        let handoff = build_handoff(&request(), &FinancingConfig::default()).unwrap();
        assert!(handoff.url.starts_with("https://wa.me/5582999990000?text="));
        assert!(!handoff.url.contains(' '));
        assert!(!handoff.url.contains('\n'));
        assert!(handoff.url.contains("%0A"));
    }

    #[test]
    fn test_missing_dealer_number() {
        let mut req = request();
        req.dealer_phone = "n/a".into();
        assert!(build_handoff(&req, &FinancingConfig::default()).is_err());
    }

    #[test]
    fn test_installment_in_payload_is_recomputed() {
        let req: HandoffRequest = serde_json::from_value(serde_json::json!({
            "dealer_phone": "5582999990000",
            "vehicle": { "id": "moto-1", "make": "Honda", "model": "Biz 125" },
            "terms": {
                "vehicle_price": "14990",
                "down_payment": "4497",
                "term_months": 24,
                "monthly_installment": "0",
                "principal": "0",
                "degenerate": false
            },
            "customer": { "name": "Ana", "phone": "82988887777" }
        }))
        .unwrap();
        let msg = message(&req, CurrencyLocale::PtBr);
        assert!(msg.contains("*Prazo:* 24x de R$ 542,29"), "{msg}");
        assert!(!msg.contains("R$ 0,00"));
    }

    #[test]
    fn test_rate_comes_from_config() {
        let config = FinancingConfig {
            monthly_rate: dec!(0.025),
            ..FinancingConfig::default()
        };
        let handoff = build_handoff(&request(), &config).unwrap();
        let expected = LoanQuote::compute(dec!(25000), dec!(7500), 48, dec!(0.025)).unwrap();
        assert!(handoff
            .message
            .contains(&format_currency(expected.monthly_installment, CurrencyLocale::PtBr)));
    }
}
