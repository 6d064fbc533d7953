use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use super::decision::submit_decision;
use super::documents::ClassifiedDocuments;
use super::domain::{DecisionUpdate, PartnerId, SectionId, SectionStatus};
use super::gateway::{GatewayError, PartnerGateway};
use super::mapping::{map_payload, FormField, FormState};
use super::notice::{
    Notifier, ReviewNotice, DECISION_UPDATED, DECISION_UPDATE_FAILED, STATUS_UPDATE_FAILED,
};
use super::status::SectionStatusBoard;

pub const LOAD_FAILED: &str =
    "Could not load application data. Please ensure the backend server is running and reachable.";

/// Error raised by the review form.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("{}", LOAD_FAILED)]
    Load(#[source] GatewayError),
    #[error("{}", STATUS_UPDATE_FAILED)]
    StatusUpdate {
        section: SectionId,
        restored: SectionStatus,
        #[source]
        source: GatewayError,
    },
    #[error("{}", DECISION_UPDATE_FAILED)]
    DecisionUpdate(#[source] GatewayError),
    #[error("field '{0}' is read-only")]
    ReadOnlyField(FormField),
}

impl ReviewError {
    /// The underlying backend failure, if any.
    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            ReviewError::Load(source)
            | ReviewError::StatusUpdate { source, .. }
            | ReviewError::DecisionUpdate(source) => Some(source),
            ReviewError::ReadOnlyField(_) => None,
        }
    }
}

/// One loaded partner application under review.
///
/// A value only exists once the initial GET has succeeded, so every PATCH
/// path runs against loaded state.
pub struct ReviewForm<G: ?Sized, N: ?Sized> {
    partner: PartnerId,
    gateway: Arc<G>,
    notifier: Arc<N>,
    form: RwLock<FormState>,
    documents: ClassifiedDocuments,
    statuses: SectionStatusBoard,
}

impl<G, N> ReviewForm<G, N>
where
    G: PartnerGateway + ?Sized,
    N: Notifier + ?Sized,
{
    pub async fn load(
        gateway: Arc<G>,
        notifier: Arc<N>,
        partner: PartnerId,
    ) -> Result<Self, ReviewError> {
        let payload = match gateway.fetch_partner(&partner).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%partner, error = %err, "failed to fetch partner data");
                return Err(ReviewError::Load(err));
            }
        };

        let mapped = map_payload(payload);
        info!(
            %partner,
            documents = mapped.documents.entries().len(),
            duplicate_documents = mapped.documents.duplicates(),
            "review form ready"
        );

        Ok(Self {
            partner,
            gateway,
            notifier,
            form: RwLock::new(mapped.form),
            documents: mapped.documents,
            statuses: SectionStatusBoard::new(&mapped.statuses),
        })
    }

    pub fn partner(&self) -> &PartnerId {
        &self.partner
    }

    pub fn field(&self, field: FormField) -> String {
        self.form
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(field)
            .to_string()
    }

    pub fn form(&self) -> FormState {
        self.form
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn documents(&self) -> &ClassifiedDocuments {
        &self.documents
    }

    pub fn status(&self, section: SectionId) -> SectionStatus {
        self.statuses.get(section)
    }

    pub fn statuses(&self) -> BTreeMap<SectionId, SectionStatus> {
        self.statuses.snapshot()
    }

    /// Local edit of a decision-subsection field. No validation, no network.
    pub fn set_field(&self, field: FormField, value: impl Into<String>) -> Result<(), ReviewError> {
        if !field.is_editable() {
            return Err(ReviewError::ReadOnlyField(field));
        }

        self.form
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(field, value.into());
        Ok(())
    }

    /// Toggle a section between `requested` and pending, optimistically.
    ///
    /// Returns the settled status. On failure the previous status is restored
    /// and the reviewer is notified.
    pub async fn toggle_status(
        &self,
        section: SectionId,
        requested: SectionStatus,
    ) -> Result<SectionStatus, ReviewError> {
        match self
            .statuses
            .toggle(self.gateway.as_ref(), &self.partner, section, requested)
            .await
        {
            Ok(status) => {
                info!(partner = %self.partner, %section, %status, "section status updated");
                Ok(status)
            }
            Err(rolled_back) => {
                self.notifier.notify(ReviewNotice::failure(
                    STATUS_UPDATE_FAILED,
                    &rolled_back.source,
                ));
                Err(ReviewError::StatusUpdate {
                    section,
                    restored: rolled_back.restored,
                    source: rolled_back.source,
                })
            }
        }
    }

    /// Send the final decision and its reason. Section statuses are untouched.
    pub async fn submit_decision(&self) -> Result<DecisionUpdate, ReviewError> {
        let form = self.form();
        match submit_decision(self.gateway.as_ref(), &self.partner, &form).await {
            Ok(update) => {
                self.notifier.notify(ReviewNotice::success(DECISION_UPDATED));
                Ok(update)
            }
            Err(err) => {
                warn!(partner = %self.partner, error = %err, "failed to update final decision");
                self.notifier
                    .notify(ReviewNotice::failure(DECISION_UPDATE_FAILED, &err));
                Err(ReviewError::DecisionUpdate(err))
            }
        }
    }
}
