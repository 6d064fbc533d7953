//! Channel partner application review: payload mapping, KYC slot
//! classification, per-section status reconciliation, and decision submission.

pub mod decision;
pub mod documents;
pub mod domain;
pub mod form;
pub mod gateway;
pub mod mapping;
pub mod notice;
pub mod status;

#[cfg(test)]
mod tests;

pub use documents::{ClassifiedDocuments, DocumentSlot, DocumentTag};
pub use domain::{
    DecisionUpdate, DocumentEntry, PartnerId, PartnerPayload, SectionId, SectionStatus,
    SectionStatusUpdate, UnknownSection,
};
pub use form::{ReviewError, ReviewForm, LOAD_FAILED};
pub use gateway::{GatewayError, GatewayOperation, HttpPartnerGateway, PartnerGateway};
pub use mapping::{map_payload, FormField, FormGroup, FormState, MappedApplication, UnknownField};
pub use notice::{NoticeLevel, Notifier, ReviewNotice};
pub use status::SectionStatusBoard;
