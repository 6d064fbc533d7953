use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identifier of the partner application under review.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartnerId(pub String);

impl fmt::Display for PartnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for PartnerId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Sections of the application that carry their own review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    ApplicantDetails,
    CurrentAddress,
    PermanentAddress,
    KycDocuments,
    BankingDetails,
}

impl SectionId {
    pub const ALL: [SectionId; 5] = [
        SectionId::ApplicantDetails,
        SectionId::CurrentAddress,
        SectionId::PermanentAddress,
        SectionId::KycDocuments,
        SectionId::BankingDetails,
    ];

    /// Wire key used in the `section` field of status patches.
    pub const fn key(self) -> &'static str {
        match self {
            SectionId::ApplicantDetails => "applicant_details",
            SectionId::CurrentAddress => "current_address",
            SectionId::PermanentAddress => "permanent_address",
            SectionId::KycDocuments => "kyc_documents",
            SectionId::BankingDetails => "banking_details",
        }
    }

    /// Payload field holding the section's persisted status.
    pub const fn status_field(self) -> &'static str {
        match self {
            SectionId::ApplicantDetails => "applicant_details_status",
            SectionId::CurrentAddress => "current_address_status",
            SectionId::PermanentAddress => "permanent_address_status",
            SectionId::KycDocuments => "kyc_documents_status",
            SectionId::BankingDetails => "banking_details_status",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for SectionId {
    type Err = UnknownSection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        SectionId::ALL
            .into_iter()
            .find(|section| section.key() == normalized)
            .ok_or_else(|| UnknownSection(value.to_string()))
    }
}

/// Review state of a single section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SectionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SectionStatus {
    /// Only the exact strings `"Approved"` and `"Rejected"` count; anything
    /// else, including other casings, reads as pending.
    pub fn from_server(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("Approved") => SectionStatus::Approved,
            Some("Rejected") => SectionStatus::Rejected,
            _ => SectionStatus::Pending,
        }
    }

    /// Clicking the active status clears it; clicking the other one switches.
    pub fn toggled(self, requested: SectionStatus) -> SectionStatus {
        if self == requested {
            SectionStatus::Pending
        } else {
            requested
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SectionStatus::Pending => "Pending",
            SectionStatus::Approved => "Approved",
            SectionStatus::Rejected => "Rejected",
        }
    }

    pub const fn review_reason(self) -> &'static str {
        match self {
            SectionStatus::Rejected => "Rejected by admin",
            SectionStatus::Approved | SectionStatus::Pending => "Approved by admin",
        }
    }
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A KYC document as returned by the backend. Unknown keys ride along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentEntry {
    #[serde(rename = "document_proof_type", default)]
    pub proof_type_label: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub document_number: Option<String>,
    #[serde(default)]
    pub front_side_url: Option<String>,
    #[serde(default)]
    pub back_side_url: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Raw applicant payload from `GET /partners/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PartnerPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub documents: Vec<DocumentEntry>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PartnerPayload {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }
}

/// Body of `PATCH /partners/{id}/section-status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionStatusUpdate {
    pub section: SectionId,
    pub status: SectionStatus,
    pub reason: String,
}

impl SectionStatusUpdate {
    pub fn new(section: SectionId, status: SectionStatus) -> Self {
        Self {
            section,
            status,
            reason: status.review_reason().to_string(),
        }
    }
}

/// Body of `PATCH /partners/{id}/decision`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionUpdate {
    pub final_decision: String,
    pub final_decision_reason: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<DocumentEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<Vec<DocumentEntry>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| display_scalar(&value)))
}

/// Text shown for a scalar JSON value; containers and null have no display form.
pub(crate) fn display_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
