use tracing::info;

use super::domain::{DecisionUpdate, PartnerId};
use super::gateway::{GatewayError, PartnerGateway};
use super::mapping::{FormField, FormState};

/// Builds the decision PATCH from the editable subsection. Signature type and
/// OTP stay local; only the decision and its reason go over the wire.
pub fn decision_update(form: &FormState) -> DecisionUpdate {
    DecisionUpdate {
        final_decision: form.get(FormField::FinalDecision).to_string(),
        final_decision_reason: form.get(FormField::AnyReason).to_string(),
    }
}

pub async fn submit_decision<G>(
    gateway: &G,
    partner: &PartnerId,
    form: &FormState,
) -> Result<DecisionUpdate, GatewayError>
where
    G: PartnerGateway + ?Sized,
{
    let update = decision_update(form);
    gateway.update_decision(partner, &update).await?;
    info!(
        %partner,
        decision = %update.final_decision,
        reason = %update.final_decision_reason,
        "final decision recorded"
    );
    Ok(update)
}
