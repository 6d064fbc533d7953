use super::common::*;
use crate::workflows::channel_partner::domain::{PartnerPayload, SectionId, SectionStatus};
use crate::workflows::channel_partner::mapping::{
    display_date, map_payload, FormField, FormGroup, FormState,
};
use chrono::NaiveDate;
use serde_json::json;

#[test]
fn empty_payload_maps_every_field_to_empty_text() {
    let mapped = map_payload(PartnerPayload::default());

    for field in FormField::ALL {
        assert_eq!(mapped.form.get(field), "", "{field} should be empty");
    }
    assert!(mapped.documents.entries().is_empty());
    assert_eq!(mapped.statuses.len(), SectionId::ALL.len());
    assert!(mapped
        .statuses
        .values()
        .all(|status| *status == SectionStatus::Pending));
}

#[test]
fn timestamps_are_truncated_to_their_date() {
    let mapped = map_payload(full_payload());

    assert_eq!(mapped.form.get(FormField::ApplicationDate), "2024-03-01");
    assert_eq!(mapped.form.get(FormField::Dob), "1990-07-14");
    assert_eq!(mapped.form.get(FormField::ApprovalDate), "2024-03-05");
    assert_eq!(
        mapped.form.date(FormField::ApplicationDate),
        NaiveDate::from_ymd_opt(2024, 3, 1)
    );
    assert_eq!(mapped.form.date(FormField::FirstName), None);
}

#[test]
fn display_date_handles_offsets_naive_and_unparseable_values() {
    assert_eq!(display_date("2024-03-01T10:00:00Z"), "2024-03-01");
    assert_eq!(display_date("2024-03-01T23:30:00+05:30"), "2024-03-01");
    assert_eq!(display_date("2024-03-01T10:00:00.250"), "2024-03-01");
    assert_eq!(display_date("2024-03-01 08:15:00"), "2024-03-01");
    assert_eq!(display_date("01/03/2024Textra"), "01/03/2024");
    assert_eq!(display_date("   "), "");
}

#[test]
fn scalar_fields_keep_their_text_and_nulls_become_empty() {
    let mapped = map_payload(full_payload());

    assert_eq!(mapped.form.get(FormField::FirstName), "Asha");
    assert_eq!(mapped.form.get(FormField::MiddleName), "");
    assert_eq!(mapped.form.get(FormField::MobileNumber), "9876543210");
    assert_eq!(mapped.form.get(FormField::CurrentPincode1), "411001");
    assert_eq!(mapped.form.get(FormField::PermanentCity2), "Nashik");
    assert_eq!(mapped.form.get(FormField::AccountType), "Savings");
    assert_eq!(mapped.form.get(FormField::UcCode), "UC-7");
    assert_eq!(mapped.form.get(FormField::LcCode), "");
}

#[test]
fn section_statuses_come_from_status_fields() {
    let mapped = map_payload(full_payload());

    assert_eq!(
        mapped.statuses[&SectionId::ApplicantDetails],
        SectionStatus::Approved
    );
    assert_eq!(
        mapped.statuses[&SectionId::CurrentAddress],
        SectionStatus::Rejected
    );
    assert_eq!(
        mapped.statuses[&SectionId::PermanentAddress],
        SectionStatus::Pending
    );
    assert_eq!(
        mapped.statuses[&SectionId::BankingDetails],
        SectionStatus::Pending
    );
}

#[test]
fn section_status_text_must_match_exactly() {
    let mapped = map_payload(payload(json!({
        "applicant_details_status": "approved",
        "current_address_status": "REJECTED",
        "permanent_address_status": " Approved",
        "kyc_documents_status": "Approved",
        "banking_details_status": 1
    })));

    assert_eq!(
        mapped.statuses[&SectionId::ApplicantDetails],
        SectionStatus::Pending
    );
    assert_eq!(
        mapped.statuses[&SectionId::CurrentAddress],
        SectionStatus::Pending
    );
    assert_eq!(
        mapped.statuses[&SectionId::PermanentAddress],
        SectionStatus::Pending
    );
    assert_eq!(
        mapped.statuses[&SectionId::KycDocuments],
        SectionStatus::Approved
    );
    assert_eq!(
        mapped.statuses[&SectionId::BankingDetails],
        SectionStatus::Pending
    );
}

#[test]
fn unexpected_shapes_do_not_break_mapping() {
    let mapped = map_payload(payload(json!({
        "first_name": ["not", "a", "scalar"],
        "gender": true,
        "application_date": 20240301,
        "banking_details_status": "on hold",
        "documents": null
    })));

    assert_eq!(mapped.form.get(FormField::FirstName), "");
    assert_eq!(mapped.form.get(FormField::Gender), "true");
    assert_eq!(mapped.form.get(FormField::ApplicationDate), "20240301");
    assert_eq!(
        mapped.statuses[&SectionId::BankingDetails],
        SectionStatus::Pending
    );
    assert!(mapped.documents.entries().is_empty());
}

#[test]
fn end_to_end_payload_populates_name_status_and_education_slot() {
    let mapped = map_payload(payload(json!({
        "first_name": "Asha",
        "applicant_details_status": "Approved",
        "documents": [
            { "document_proof_type": "Education Certificate", "document_number": "ED-99" }
        ]
    })));

    assert_eq!(mapped.form.get(FormField::FirstName), "Asha");
    assert_eq!(
        mapped.statuses[&SectionId::ApplicantDetails],
        SectionStatus::Approved
    );
    assert_eq!(mapped.form.get(FormField::KycEducationDoc), "ED-99");
}

#[test]
fn field_ids_are_unique_and_parse_back() {
    let mut ids: Vec<&str> = FormField::ALL.iter().map(|field| field.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), FormField::ALL.len());

    assert_eq!("digitalOTP".parse::<FormField>(), Ok(FormField::DigitalOtp));
    assert_eq!("finaldecision".parse::<FormField>(), Ok(FormField::FinalDecision));
    assert!("nickname".parse::<FormField>().is_err());
}

#[test]
fn every_group_has_fields_and_reviewable_groups_map_to_sections() {
    for group in FormGroup::ALL {
        assert!(FormField::in_group(group).next().is_some(), "{group:?} empty");
    }
    let reviewable: Vec<SectionId> = FormGroup::ALL
        .into_iter()
        .filter_map(FormGroup::section)
        .collect();
    assert_eq!(reviewable, SectionId::ALL.to_vec());
    assert_eq!(FormGroup::KycDocuments.title(), "4. Applicant KYC Documents");
}

#[test]
fn only_decision_fields_are_editable() {
    let editable: Vec<FormField> = FormField::ALL
        .into_iter()
        .filter(|field| field.is_editable())
        .collect();

    assert_eq!(
        editable,
        vec![
            FormField::AnyReason,
            FormField::FinalDecision,
            FormField::AuthSignature,
            FormField::DigitalOtp,
        ]
    );
    assert!(FormField::in_group(FormGroup::AuthorizedPerson).all(|field| !field.is_editable()));
    assert_eq!(FormState::default().get(FormField::AnyReason), "");
}
