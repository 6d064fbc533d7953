//! Translation of the snake_case backend payload into the flat form state.
//!
//! The field table here is the compatibility contract between the backend
//! and the review form: every UI field names exactly one source.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::documents::{ClassifiedDocuments, DocumentSlot};
use super::domain::{display_scalar, PartnerPayload, SectionId, SectionStatus};

/// Visual groups of the review form, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormGroup {
    Header,
    ApplicantDetails,
    CurrentAddress,
    PermanentAddress,
    KycDocuments,
    BankingDetails,
    FinalDecision,
    AuthorizedPerson,
}

impl FormGroup {
    pub const ALL: [FormGroup; 8] = [
        FormGroup::Header,
        FormGroup::ApplicantDetails,
        FormGroup::CurrentAddress,
        FormGroup::PermanentAddress,
        FormGroup::KycDocuments,
        FormGroup::BankingDetails,
        FormGroup::FinalDecision,
        FormGroup::AuthorizedPerson,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            FormGroup::Header => "Channel Partner Application Form",
            FormGroup::ApplicantDetails => "1. Applicant Details",
            FormGroup::CurrentAddress => "2. Applicant Current Address",
            FormGroup::PermanentAddress => "3. Applicant Permanent Address",
            FormGroup::KycDocuments => "4. Applicant KYC Documents",
            FormGroup::BankingDetails => "5. Applicant Banking Details",
            FormGroup::FinalDecision => "6. Final Authority Decision (Official Use Only)",
            FormGroup::AuthorizedPerson => "7. Authorized Person Details (Internal Use Only)",
        }
    }

    /// The reviewable section backing this group, if it carries a status.
    pub const fn section(self) -> Option<SectionId> {
        match self {
            FormGroup::ApplicantDetails => Some(SectionId::ApplicantDetails),
            FormGroup::CurrentAddress => Some(SectionId::CurrentAddress),
            FormGroup::PermanentAddress => Some(SectionId::PermanentAddress),
            FormGroup::KycDocuments => Some(SectionId::KycDocuments),
            FormGroup::BankingDetails => Some(SectionId::BankingDetails),
            FormGroup::Header | FormGroup::FinalDecision | FormGroup::AuthorizedPerson => None,
        }
    }
}

/// Where a form field takes its initial value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Text(&'static str),
    Date(&'static str),
    Document(DocumentSlot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub source: FieldSource,
    pub group: FormGroup,
}

const fn text(id: &'static str, key: &'static str, label: &'static str, group: FormGroup) -> FieldDefinition {
    FieldDefinition {
        id,
        label,
        source: FieldSource::Text(key),
        group,
    }
}

const fn date(id: &'static str, key: &'static str, label: &'static str, group: FormGroup) -> FieldDefinition {
    FieldDefinition {
        id,
        label,
        source: FieldSource::Date(key),
        group,
    }
}

const fn document(id: &'static str, slot: DocumentSlot, label: &'static str) -> FieldDefinition {
    FieldDefinition {
        id,
        label,
        source: FieldSource::Document(slot),
        group: FormGroup::KycDocuments,
    }
}

/// Every field shown on the review form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    ApplicationReferenceId,
    ApplicationDate,
    ApplicationRefBy,
    ApplicantClass,
    ApplicantPhotoUrl,
    FirstName,
    MiddleName,
    LastName,
    FatherName,
    Dob,
    Gender,
    AadharNumber,
    PanCardNumber,
    MobileNumber,
    EmailId,
    MaritalStatus,
    SpouseName,
    MotherName,
    Education,
    Occupation,
    CurrentAddress1,
    CurrentPincode1,
    CurrentState1,
    CurrentDistrict1,
    CurrentCity1,
    CurrentLocality1,
    CurrentLandmark1,
    CurrentAddress2,
    CurrentPincode2,
    CurrentState2,
    CurrentDistrict2,
    CurrentCity2,
    CurrentLocality2,
    CurrentLandmark2,
    PermanentAddress1,
    PermanentPincode1,
    PermanentState1,
    PermanentDistrict1,
    PermanentCity1,
    PermanentLocality1,
    PermanentLandmark1,
    PermanentAddress2,
    PermanentPincode2,
    PermanentState2,
    PermanentDistrict2,
    PermanentCity2,
    PermanentLocality2,
    PermanentLandmark2,
    KycPanNumber,
    KycAadharNumber,
    KycElecBillNumber,
    KycShopActNumber,
    KycEducationDoc,
    KycCreditReport,
    BankName,
    AccountHolderName,
    BankAccountNumber,
    IfscCode,
    BranchName,
    AccountType,
    AnyReason,
    FinalDecision,
    AuthSignature,
    DigitalOtp,
    UcCode,
    LcCode,
    AuthPersonName,
    Designation,
    EmployeeId,
    ApprovalDate,
}

impl FormField {
    pub const ALL: [FormField; 70] = [
        FormField::ApplicationReferenceId,
        FormField::ApplicationDate,
        FormField::ApplicationRefBy,
        FormField::ApplicantClass,
        FormField::ApplicantPhotoUrl,
        FormField::FirstName,
        FormField::MiddleName,
        FormField::LastName,
        FormField::FatherName,
        FormField::Dob,
        FormField::Gender,
        FormField::AadharNumber,
        FormField::PanCardNumber,
        FormField::MobileNumber,
        FormField::EmailId,
        FormField::MaritalStatus,
        FormField::SpouseName,
        FormField::MotherName,
        FormField::Education,
        FormField::Occupation,
        FormField::CurrentAddress1,
        FormField::CurrentPincode1,
        FormField::CurrentState1,
        FormField::CurrentDistrict1,
        FormField::CurrentCity1,
        FormField::CurrentLocality1,
        FormField::CurrentLandmark1,
        FormField::CurrentAddress2,
        FormField::CurrentPincode2,
        FormField::CurrentState2,
        FormField::CurrentDistrict2,
        FormField::CurrentCity2,
        FormField::CurrentLocality2,
        FormField::CurrentLandmark2,
        FormField::PermanentAddress1,
        FormField::PermanentPincode1,
        FormField::PermanentState1,
        FormField::PermanentDistrict1,
        FormField::PermanentCity1,
        FormField::PermanentLocality1,
        FormField::PermanentLandmark1,
        FormField::PermanentAddress2,
        FormField::PermanentPincode2,
        FormField::PermanentState2,
        FormField::PermanentDistrict2,
        FormField::PermanentCity2,
        FormField::PermanentLocality2,
        FormField::PermanentLandmark2,
        FormField::KycPanNumber,
        FormField::KycAadharNumber,
        FormField::KycElecBillNumber,
        FormField::KycShopActNumber,
        FormField::KycEducationDoc,
        FormField::KycCreditReport,
        FormField::BankName,
        FormField::AccountHolderName,
        FormField::BankAccountNumber,
        FormField::IfscCode,
        FormField::BranchName,
        FormField::AccountType,
        FormField::AnyReason,
        FormField::FinalDecision,
        FormField::AuthSignature,
        FormField::DigitalOtp,
        FormField::UcCode,
        FormField::LcCode,
        FormField::AuthPersonName,
        FormField::Designation,
        FormField::EmployeeId,
        FormField::ApprovalDate,
    ];

    #[rustfmt::skip]
    pub const fn definition(self) -> FieldDefinition {
        use FormGroup::{
            ApplicantDetails as Ad, AuthorizedPerson as Auth, BankingDetails as Bank,
            CurrentAddress as Cur, FinalDecision as Fin, Header as Hd, PermanentAddress as Perm,
        };

        match self {
            FormField::ApplicationReferenceId => text("applicationReferenceId", "application_reference_id", "Application Reference Id", Hd),
            FormField::ApplicationDate => date("applicationDate", "application_date", "Application Date", Hd),
            FormField::ApplicationRefBy => text("applicationRefBy", "application_ref_by", "Application Ref By", Hd),
            FormField::ApplicantClass => text("applicantClass", "applicant_class", "Applicant Class", Hd),
            FormField::ApplicantPhotoUrl => text("applicantPhotoUrl", "applicant_photo_url", "Applicant Photo", Hd),
            FormField::FirstName => text("firstName", "first_name", "First Name", Ad),
            FormField::MiddleName => text("middleName", "middle_name", "Middle Name", Ad),
            FormField::LastName => text("lastName", "last_name", "Last Name", Ad),
            FormField::FatherName => text("fatherName", "father_name", "Father Name", Ad),
            FormField::Dob => date("dob", "date_of_birth", "Date of Birth", Ad),
            FormField::Gender => text("gender", "gender", "Gender", Ad),
            FormField::AadharNumber => text("aadharNumber", "aadhar_number", "Aadhar Number", Ad),
            FormField::PanCardNumber => text("panCardNumber", "pan_card_number", "PAN Card Number", Ad),
            FormField::MobileNumber => text("mobileNumber", "mobile_number", "Mobile Number", Ad),
            FormField::EmailId => text("emailId", "email_id", "Email ID", Ad),
            FormField::MaritalStatus => text("maritalStatus", "marital_status", "Marital Status", Ad),
            FormField::SpouseName => text("spouseName", "spouse_name", "Spouse Name", Ad),
            FormField::MotherName => text("motherName", "mother_name", "Mother Name", Ad),
            FormField::Education => text("education", "education", "Education", Ad),
            FormField::Occupation => text("occupation", "occupation", "Occupation", Ad),
            FormField::CurrentAddress1 => text("currentAddress1", "current_address1", "Address", Cur),
            FormField::CurrentPincode1 => text("currentPincode1", "current_pincode1", "Pin Code", Cur),
            FormField::CurrentState1 => text("currentState1", "current_state1", "State", Cur),
            FormField::CurrentDistrict1 => text("currentDistrict1", "current_district1", "District", Cur),
            FormField::CurrentCity1 => text("currentCity1", "current_city1", "City", Cur),
            FormField::CurrentLocality1 => text("currentLocality1", "current_locality1", "Locality/Village", Cur),
            FormField::CurrentLandmark1 => text("currentLandmark1", "current_landmark1", "Near Landmark", Cur),
            FormField::CurrentAddress2 => text("currentAddress2", "current_address2", "Address", Cur),
            FormField::CurrentPincode2 => text("currentPincode2", "current_pincode2", "Pin Code", Cur),
            FormField::CurrentState2 => text("currentState2", "current_state2", "State", Cur),
            FormField::CurrentDistrict2 => text("currentDistrict2", "current_district2", "District", Cur),
            FormField::CurrentCity2 => text("currentCity2", "current_city2", "City", Cur),
            FormField::CurrentLocality2 => text("currentLocality2", "current_locality2", "Locality/Village", Cur),
            FormField::CurrentLandmark2 => text("currentLandmark2", "current_landmark2", "Near Landmark", Cur),
            FormField::PermanentAddress1 => text("permanentAddress1", "permanent_address1", "Address", Perm),
            FormField::PermanentPincode1 => text("permanentPincode1", "permanent_pincode1", "Pin Code", Perm),
            FormField::PermanentState1 => text("permanentState1", "permanent_state1", "State", Perm),
            FormField::PermanentDistrict1 => text("permanentDistrict1", "permanent_district1", "District", Perm),
            FormField::PermanentCity1 => text("permanentCity1", "permanent_city1", "City", Perm),
            FormField::PermanentLocality1 => text("permanentLocality1", "permanent_locality1", "Locality/Village", Perm),
            FormField::PermanentLandmark1 => text("permanentLandmark1", "permanent_landmark1", "Near Landmark", Perm),
            FormField::PermanentAddress2 => text("permanentAddress2", "permanent_address2", "Address", Perm),
            FormField::PermanentPincode2 => text("permanentPincode2", "permanent_pincode2", "Pin Code", Perm),
            FormField::PermanentState2 => text("permanentState2", "permanent_state2", "State", Perm),
            FormField::PermanentDistrict2 => text("permanentDistrict2", "permanent_district2", "District", Perm),
            FormField::PermanentCity2 => text("permanentCity2", "permanent_city2", "City", Perm),
            FormField::PermanentLocality2 => text("permanentLocality2", "permanent_locality2", "Locality/Village", Perm),
            FormField::PermanentLandmark2 => text("permanentLandmark2", "permanent_landmark2", "Near Landmark", Perm),
            FormField::KycPanNumber => document("kycPanNumber", DocumentSlot::Pan, "PAN Number"),
            FormField::KycAadharNumber => document("kycAadharNumber", DocumentSlot::Aadhar, "Aadhar Number"),
            FormField::KycElecBillNumber => document("kycElecBillNumber", DocumentSlot::AddressProof, "Bill Number"),
            FormField::KycShopActNumber => document("kycShopActNumber", DocumentSlot::FirmDocuments, "Document Number"),
            FormField::KycEducationDoc => document("kycEducationDoc", DocumentSlot::Education, "Education Doc Number"),
            FormField::KycCreditReport => document("kycCreditReport", DocumentSlot::CreditReport, "Credit Report Number"),
            FormField::BankName => text("bankName", "bank_name", "Bank Name", Bank),
            FormField::AccountHolderName => text("accountHolderName", "account_holder_name", "Account Holder Name", Bank),
            FormField::BankAccountNumber => text("bankAccountNumber", "bank_account_number", "Bank Account Number", Bank),
            FormField::IfscCode => text("ifscCode", "ifsc_code", "IFSC Code", Bank),
            FormField::BranchName => text("branchName", "branch_name", "Branch Name", Bank),
            FormField::AccountType => text("accountType", "bank_account_type", "Type of Bank Account", Bank),
            FormField::AnyReason => text("anyReason", "final_decision_reason", "Any Reason", Fin),
            FormField::FinalDecision => text("finalDecision", "final_decision", "Final Decision", Fin),
            FormField::AuthSignature => text("authSignature", "authorized_person_signature_url", "Authorized Person Signature", Fin),
            FormField::DigitalOtp => text("digitalOTP", "digital_otp", "Digital OTP", Fin),
            FormField::UcCode => text("ucCode", "uc_code", "UC Code", Auth),
            FormField::LcCode => text("lcCode", "lc_code", "LC Code", Auth),
            FormField::AuthPersonName => text("authPersonName", "authorized_person_name", "Name of Authorized Approval Person", Auth),
            FormField::Designation => text("designation", "authorized_person_designation", "Designation", Auth),
            FormField::EmployeeId => text("employeeId", "authorized_person_employee_id", "Employee ID", Auth),
            FormField::ApprovalDate => date("approvalDate", "approval_date", "Approval Date", Auth),
        }
    }

    pub const fn id(self) -> &'static str {
        self.definition().id
    }

    pub const fn label(self) -> &'static str {
        self.definition().label
    }

    pub const fn group(self) -> FormGroup {
        self.definition().group
    }

    /// Only the final decision subsection accepts local edits; the
    /// internal-use authority fields have no submission path and stay read-only.
    pub const fn is_editable(self) -> bool {
        matches!(
            self,
            FormField::AnyReason
                | FormField::FinalDecision
                | FormField::AuthSignature
                | FormField::DigitalOtp
        )
    }

    /// Suggested values for the select-style editable fields.
    pub const fn options(self) -> &'static [&'static str] {
        match self {
            FormField::AnyReason => &["", "Incomplete Documents", "Failed Verification", "Other"],
            FormField::FinalDecision => &["Pending", "Approved", "Rejected"],
            FormField::AuthSignature => &["", "digital", "manual"],
            _ => &[],
        }
    }

    pub fn in_group(group: FormGroup) -> impl Iterator<Item = FormField> {
        FormField::ALL
            .into_iter()
            .filter(move |field| field.group() == group)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        FormField::ALL
            .into_iter()
            .find(|field| field.id().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownField(value.to_string()))
    }
}

/// Flat field-to-display-value mapping. Every field is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    values: BTreeMap<FormField, String>,
}

impl FormState {
    pub fn empty() -> Self {
        Self {
            values: FormField::ALL
                .into_iter()
                .map(|field| (field, String::new()))
                .collect(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    /// Parsed value of a date-valued field, if it holds a calendar date.
    pub fn date(&self, field: FormField) -> Option<NaiveDate> {
        match field.definition().source {
            FieldSource::Date(_) => NaiveDate::parse_from_str(self.get(field), "%Y-%m-%d").ok(),
            FieldSource::Text(_) | FieldSource::Document(_) => None,
        }
    }

    pub(crate) fn set(&mut self, field: FormField, value: String) {
        self.values.insert(field, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Everything the review form derives from one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedApplication {
    pub form: FormState,
    pub documents: ClassifiedDocuments,
    pub statuses: BTreeMap<SectionId, SectionStatus>,
}

/// Maps a backend payload. Never fails: absent fields become empty strings.
pub fn map_payload(mut payload: PartnerPayload) -> MappedApplication {
    let documents = ClassifiedDocuments::classify(std::mem::take(&mut payload.documents));

    let mut form = FormState::empty();
    for field in FormField::ALL {
        let value = match field.definition().source {
            FieldSource::Text(key) => payload.field(key).and_then(display_scalar),
            FieldSource::Date(key) => payload
                .field(key)
                .and_then(display_scalar)
                .map(|raw| display_date(&raw)),
            FieldSource::Document(slot) => documents.document_number(slot).map(str::to_string),
        };
        form.set(field, value.unwrap_or_default());
    }

    let statuses = SectionId::ALL
        .into_iter()
        .map(|section| {
            let status = SectionStatus::from_server(payload.field(section.status_field()));
            (section, status)
        })
        .collect();

    MappedApplication {
        form,
        documents,
        statuses,
    }
}

/// Date portion of a backend date or timestamp, as `YYYY-MM-DD` where parseable.
pub fn display_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.date_naive().to_string();
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return dt.date().to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.to_string();
    }

    trimmed
        .split('T')
        .next()
        .unwrap_or_default()
        .to_string()
}
