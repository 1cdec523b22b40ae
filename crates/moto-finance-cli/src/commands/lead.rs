use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use moto_finance_core::lead::{
    self, build_handoff, submit_simulation, HandoffRequest, InMemoryLeadSink,
};
use moto_finance_core::FinancingConfig;

use crate::input;

/// Arguments for building the messaging handoff
#[derive(Args)]
pub struct HandoffArgs {
    /// Path to JSON file with dealer_phone, vehicle, terms and customer
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a dry-run submission
#[derive(Args)]
pub struct SubmitArgs {
    /// Path to JSON file with dealer_phone, vehicle, terms and customer
    #[arg(long)]
    pub input: Option<String>,

    /// Storefront slug the lead belongs to
    #[arg(long)]
    pub store: String,

    /// Lead source tag
    #[arg(long, default_value = lead::SOURCE_FINANCING_MODAL)]
    pub source: String,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum MaskKind {
    Phone,
    Cpf,
}

/// Arguments for the input masks
#[derive(Args)]
pub struct MaskArgs {
    /// Which mask to apply
    #[arg(value_enum)]
    pub kind: MaskKind,

    /// Raw value as typed by the customer
    pub value: String,
}

fn handoff_request(path: Option<&str>) -> Result<HandoffRequest, Box<dyn std::error::Error>> {
    input::read_input(path)?
        .ok_or_else(|| "--input <file.json> or stdin required for the handoff".into())
}

pub fn run_handoff(
    args: HandoffArgs,
    config: &FinancingConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request = handoff_request(args.input.as_deref())?;
    let handoff = build_handoff(&request, config)?;
    Ok(json!({ "result": handoff }))
}

pub fn run_submit(
    args: SubmitArgs,
    config: &FinancingConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request = handoff_request(args.input.as_deref())?;
    let sink = InMemoryLeadSink::new();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(submit_simulation(
        &sink,
        &args.store,
        &request,
        &args.source,
        config,
    ))?;

    let mut warnings = Vec::new();
    if let Some(err) = &outcome.lead_error {
        warnings.push(format!("Lead was not recorded: {err}"));
    }
    Ok(json!({ "result": outcome, "warnings": warnings }))
}

pub fn run_mask(args: MaskArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let masked = match args.kind {
        MaskKind::Phone => lead::mask_phone(&args.value),
        MaskKind::Cpf => lead::mask_cpf(&args.value),
    };
    Ok(json!({
        "result": {
            "masked": masked,
            "digits": lead::digits_only(&args.value),
        }
    }))
}
