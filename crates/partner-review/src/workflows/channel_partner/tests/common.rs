use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use crate::workflows::channel_partner::domain::{
    DecisionUpdate, PartnerId, PartnerPayload, SectionStatusUpdate,
};
use crate::workflows::channel_partner::form::ReviewForm;
use crate::workflows::channel_partner::gateway::{GatewayError, GatewayOperation, PartnerGateway};
use crate::workflows::channel_partner::notice::{Notifier, ReviewNotice};

pub(super) fn partner() -> PartnerId {
    PartnerId::from(5)
}

pub(super) fn payload(value: Value) -> PartnerPayload {
    serde_json::from_value(value).expect("fixture payload deserializes")
}

pub(super) fn full_payload() -> PartnerPayload {
    payload(json!({
        "id": 5,
        "application_reference_id": "CP-2024-0005",
        "application_date": "2024-03-01T10:00:00Z",
        "application_ref_by": "Field Office Pune",
        "applicant_class": "Gold",
        "first_name": "Asha",
        "middle_name": null,
        "last_name": "Kulkarni",
        "date_of_birth": "1990-07-14T00:00:00.000Z",
        "mobile_number": 9876543210u64,
        "email_id": "asha@example.com",
        "current_address1": "14 MG Road",
        "current_pincode1": "411001",
        "permanent_city2": "Nashik",
        "bank_name": "State Bank",
        "bank_account_type": "Savings",
        "final_decision": "Pending",
        "final_decision_reason": "",
        "uc_code": "UC-7",
        "approval_date": "2024-03-05",
        "applicant_details_status": "Approved",
        "current_address_status": "Rejected",
        "permanent_address_status": null,
        "kyc_documents_status": "Pending",
        "documents": [
            {
                "id": 11,
                "document_proof_type": "Applicant PAN Card / ID Proof",
                "document_number": "ABCDE1234F",
                "front_side_url": "https://files.example.com/pan-front.png",
                "back_side_url": null
            },
            {
                "id": 12,
                "document_proof_type": "Applicant Aadhar Card",
                "document_number": 123412341234u64,
                "front_side_url": "https://files.example.com/aadhar-front.png",
                "back_side_url": "https://files.example.com/aadhar-back.png"
            },
            {
                "id": 13,
                "document_proof_type": "Channel Partner Credit Report",
                "document_number": "CR-1"
            }
        ]
    }))
}

#[derive(Default)]
pub(super) struct MemoryGateway {
    payload: Mutex<Option<PartnerPayload>>,
    status_failures: Mutex<VecDeque<bool>>,
    fail_decisions: AtomicBool,
    status_gate: Mutex<Option<Arc<Semaphore>>>,
    status_calls: Mutex<Vec<SectionStatusUpdate>>,
    decision_calls: Mutex<Vec<DecisionUpdate>>,
}

impl MemoryGateway {
    pub(super) fn with_payload(payload: PartnerPayload) -> Self {
        let gateway = Self::default();
        *gateway.payload.lock().expect("payload mutex poisoned") = Some(payload);
        gateway
    }

    /// Queue outcomes for upcoming status PATCHes; `true` fails the call.
    pub(super) fn script_status_failures(&self, outcomes: impl IntoIterator<Item = bool>) {
        self.status_failures
            .lock()
            .expect("script mutex poisoned")
            .extend(outcomes);
    }

    pub(super) fn fail_decisions(&self) {
        self.fail_decisions.store(true, Ordering::SeqCst);
    }

    /// Status PATCHes block until permits are added to the returned gate.
    pub(super) fn hold_status_updates(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.status_gate.lock().expect("gate mutex poisoned") = Some(gate.clone());
        gate
    }

    pub(super) fn status_calls(&self) -> Vec<SectionStatusUpdate> {
        self.status_calls
            .lock()
            .expect("calls mutex poisoned")
            .clone()
    }

    pub(super) fn decision_calls(&self) -> Vec<DecisionUpdate> {
        self.decision_calls
            .lock()
            .expect("calls mutex poisoned")
            .clone()
    }
}

fn unavailable(operation: GatewayOperation) -> GatewayError {
    GatewayError::Status {
        operation,
        status: 503,
        body: "backend unavailable".to_string(),
    }
}

#[async_trait]
impl PartnerGateway for MemoryGateway {
    async fn fetch_partner(&self, _partner: &PartnerId) -> Result<PartnerPayload, GatewayError> {
        self.payload
            .lock()
            .expect("payload mutex poisoned")
            .clone()
            .ok_or_else(|| unavailable(GatewayOperation::LoadPartner))
    }

    async fn update_section_status(
        &self,
        _partner: &PartnerId,
        update: &SectionStatusUpdate,
    ) -> Result<(), GatewayError> {
        self.status_calls
            .lock()
            .expect("calls mutex poisoned")
            .push(update.clone());

        let gate = self.status_gate.lock().expect("gate mutex poisoned").clone();
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .expect("gate stays open for the test")
                .forget();
        }

        let fail = self
            .status_failures
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or(false);
        if fail {
            Err(unavailable(GatewayOperation::UpdateSectionStatus))
        } else {
            Ok(())
        }
    }

    async fn update_decision(
        &self,
        _partner: &PartnerId,
        update: &DecisionUpdate,
    ) -> Result<(), GatewayError> {
        self.decision_calls
            .lock()
            .expect("calls mutex poisoned")
            .push(update.clone());

        if self.fail_decisions.load(Ordering::SeqCst) {
            Err(unavailable(GatewayOperation::UpdateDecision))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    notices: Mutex<Vec<ReviewNotice>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<ReviewNotice> {
        self.notices
            .lock()
            .expect("notice mutex poisoned")
            .clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: ReviewNotice) {
        self.notices
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
    }
}

pub(super) type TestForm = ReviewForm<MemoryGateway, MemoryNotifier>;

pub(super) async fn load_form(
    payload: PartnerPayload,
) -> (TestForm, Arc<MemoryGateway>, Arc<MemoryNotifier>) {
    let gateway = Arc::new(MemoryGateway::with_payload(payload));
    let notifier = Arc::new(MemoryNotifier::default());
    let form = ReviewForm::load(gateway.clone(), notifier.clone(), partner())
        .await
        .expect("fixture payload loads");
    (form, gateway, notifier)
}

/// Yield until the gateway has seen `count` status PATCHes.
pub(super) async fn wait_for_status_calls(gateway: &MemoryGateway, count: usize) {
    for _ in 0..1_000 {
        if gateway.status_calls().len() >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("expected {count} status updates, saw {}", gateway.status_calls().len());
}
