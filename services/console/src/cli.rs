use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use partner_review::config::AppConfig;
use partner_review::error::AppError;
use partner_review::telemetry;
use partner_review::workflows::channel_partner::{
    FormField, HttpPartnerGateway, Notifier, PartnerGateway, PartnerId, ReviewForm, SectionId,
    SectionStatus,
};
use tracing::info;

use crate::infra::{
    canonical_decision, override_backend, parse_review_status, parse_timeout, resolve_partner,
    ConsoleNotifier,
};
use crate::render::{application_json, render_application, ApplicationView};

#[derive(Parser, Debug)]
#[command(
    name = "partner-review",
    about = "Review channel partner applications against the partner backend",
    version
)]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct BackendArgs {
    /// Override PARTNER_API_BASE_URL (e.g. http://localhost:5000/api)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Override PARTNER_API_TIMEOUT_SECS for every backend request
    #[arg(long, global = true, value_parser = parse_timeout)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Load an application and print every section of the review form
    Show(ShowArgs),
    /// Approve or reject a section; repeating the current outcome clears it
    Toggle(ToggleArgs),
    /// Record the final decision and its reason
    Decide(DecideArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct PartnerArgs {
    /// Partner application to review. Defaults to PARTNER_ID.
    #[arg(long)]
    pub(crate) partner_id: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    pub(crate) target: PartnerArgs,
    /// List every submitted document with its slot, including duplicates
    #[arg(long)]
    pub(crate) documents: bool,
    /// Print the mapped application as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ToggleArgs {
    #[command(flatten)]
    pub(crate) target: PartnerArgs,
    /// Section key, e.g. applicant_details or kyc-documents
    #[arg(long)]
    pub(crate) section: SectionId,
    /// approved or rejected
    #[arg(long, value_parser = parse_review_status)]
    pub(crate) status: SectionStatus,
}

#[derive(Args, Debug)]
pub(crate) struct DecideArgs {
    #[command(flatten)]
    pub(crate) target: PartnerArgs,
    /// Pending, Approved or Rejected
    #[arg(long)]
    pub(crate) decision: String,
    /// Reason recorded with the decision
    #[arg(long, default_value = "")]
    pub(crate) reason: String,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    config.backend = override_backend(
        config.backend,
        cli.backend.base_url,
        cli.backend.timeout_secs,
    )?;
    info!(
        ?config.environment,
        base_url = %config.backend.base_url,
        timeout_secs = config.backend.request_timeout.as_secs(),
        "partner review console starting"
    );

    let gateway = Arc::new(HttpPartnerGateway::new(&config.backend)?);
    let output = execute(
        cli.command,
        gateway,
        Arc::new(ConsoleNotifier),
        config.default_partner,
    )
    .await?;
    print!("{output}");
    Ok(())
}

/// Runs one command against a gateway and returns what should be printed.
pub(crate) async fn execute<G, N>(
    command: Command,
    gateway: Arc<G>,
    notifier: Arc<N>,
    default_partner: Option<PartnerId>,
) -> Result<String, AppError>
where
    G: PartnerGateway + ?Sized,
    N: Notifier + ?Sized,
{
    match command {
        Command::Show(args) => {
            let partner = resolve_partner(args.target.partner_id, default_partner)?;
            let review = ReviewForm::load(gateway, notifier, partner).await?;
            let view = ApplicationView::of(&review);
            if args.json {
                Ok(format!("{:#}\n", application_json(&view)))
            } else {
                Ok(render_application(&view, args.documents))
            }
        }
        Command::Toggle(args) => {
            let partner = resolve_partner(args.target.partner_id, default_partner)?;
            let review = ReviewForm::load(gateway, notifier, partner).await?;
            let before = review.status(args.section);
            let settled = review.toggle_status(args.section, args.status).await?;
            Ok(format!("{}: {before} -> {settled}\n", args.section))
        }
        Command::Decide(args) => {
            let decision = canonical_decision(&args.decision).ok_or_else(|| {
                AppError::Usage(format!(
                    "unknown decision '{}' (expected one of {})",
                    args.decision,
                    FormField::FinalDecision.options().join(", ")
                ))
            })?;
            let partner = resolve_partner(args.target.partner_id, default_partner)?;
            let review = ReviewForm::load(gateway, notifier, partner).await?;
            review.set_field(FormField::FinalDecision, decision)?;
            review.set_field(FormField::AnyReason, args.reason)?;
            let update = review.submit_decision().await?;
            Ok(format!(
                "final decision: {} ({})\n",
                update.final_decision,
                if update.final_decision_reason.is_empty() {
                    "no reason given"
                } else {
                    update.final_decision_reason.as_str()
                }
            ))
        }
    }
}
