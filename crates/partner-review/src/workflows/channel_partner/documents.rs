//! One-pass classification of the loose KYC document list into named slots.
//!
//! Every entry is tagged once at ingestion with each slot its label matches.
//! A slot binds to the first entry that matches it. Slot lookups afterwards are
//! plain index reads, so the number and both scan URLs shown for a slot always
//! come from the same entry.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use super::domain::DocumentEntry;

/// Named KYC positions on the review form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSlot {
    Pan,
    Aadhar,
    AddressProof,
    FirmDocuments,
    Education,
    CreditReport,
}

#[derive(Debug, Clone, Copy)]
enum LabelPattern {
    Exact(&'static str),
    IgnoreCase(&'static str),
}

impl LabelPattern {
    fn matches(self, label: &str) -> bool {
        match self {
            LabelPattern::Exact(needle) => label.contains(needle),
            LabelPattern::IgnoreCase(needle) => label.to_lowercase().contains(needle),
        }
    }
}

impl DocumentSlot {
    pub const ALL: [DocumentSlot; 6] = [
        DocumentSlot::Pan,
        DocumentSlot::Aadhar,
        DocumentSlot::AddressProof,
        DocumentSlot::FirmDocuments,
        DocumentSlot::Education,
        DocumentSlot::CreditReport,
    ];

    const fn pattern(self) -> LabelPattern {
        match self {
            DocumentSlot::Pan => LabelPattern::Exact("PAN"),
            DocumentSlot::Aadhar => LabelPattern::Exact("Aadhar"),
            DocumentSlot::AddressProof => LabelPattern::Exact("Address Proof"),
            DocumentSlot::FirmDocuments => LabelPattern::Exact("firm documents"),
            DocumentSlot::Education => LabelPattern::IgnoreCase("education"),
            DocumentSlot::CreditReport => LabelPattern::IgnoreCase("credit report"),
        }
    }

    /// Every slot whose pattern matches the label, in declaration order.
    pub fn matching(label: &str) -> impl Iterator<Item = DocumentSlot> + '_ {
        DocumentSlot::ALL
            .into_iter()
            .filter(move |slot| slot.pattern().matches(label))
    }

    pub const fn title(self) -> &'static str {
        match self {
            DocumentSlot::Pan => "Applicant PAN Card",
            DocumentSlot::Aadhar => "Applicant Aadhar Card",
            DocumentSlot::AddressProof => "Applicant Address Proof",
            DocumentSlot::FirmDocuments => "Applicant firm documents",
            DocumentSlot::Education => "Education Document",
            DocumentSlot::CreditReport => "Credit Report",
        }
    }

    pub const fn document_type(self) -> &'static str {
        match self {
            DocumentSlot::Pan => "ID Proof",
            DocumentSlot::Aadhar => "Address Card",
            DocumentSlot::AddressProof => "Electricity Bill",
            DocumentSlot::FirmDocuments => "Shop Act",
            DocumentSlot::Education => "Degree/Certificate",
            DocumentSlot::CreditReport => "Credit Report",
        }
    }
}

/// One slot match of an ingested entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "slot")]
pub enum DocumentTag {
    Slot(DocumentSlot),
    /// Matched a slot that an earlier entry already holds.
    Duplicate(DocumentSlot),
}

/// The unmodified document list plus the per-entry tags and slot bindings.
///
/// An entry with no tags matched no slot pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedDocuments {
    entries: Vec<DocumentEntry>,
    tags: Vec<Vec<DocumentTag>>,
    slots: BTreeMap<DocumentSlot, usize>,
}

impl ClassifiedDocuments {
    pub fn classify(entries: Vec<DocumentEntry>) -> Self {
        let mut tags = Vec::with_capacity(entries.len());
        let mut slots = BTreeMap::new();

        for (index, entry) in entries.iter().enumerate() {
            let label = entry.proof_type_label.as_deref().unwrap_or_default();
            let entry_tags = DocumentSlot::matching(label)
                .map(|slot| {
                    if slots.contains_key(&slot) {
                        warn!(
                            ?slot,
                            label,
                            "document matches an already bound slot; keeping the first entry"
                        );
                        DocumentTag::Duplicate(slot)
                    } else {
                        slots.insert(slot, index);
                        DocumentTag::Slot(slot)
                    }
                })
                .collect();
            tags.push(entry_tags);
        }

        Self {
            entries,
            tags,
            slots,
        }
    }

    pub fn entries(&self) -> &[DocumentEntry] {
        &self.entries
    }

    pub fn tagged(&self) -> impl Iterator<Item = (&DocumentEntry, &[DocumentTag])> {
        self.entries.iter().zip(self.tags.iter().map(Vec::as_slice))
    }

    pub fn slot(&self, slot: DocumentSlot) -> Option<&DocumentEntry> {
        self.slots.get(&slot).map(|&index| &self.entries[index])
    }

    pub fn document_number(&self, slot: DocumentSlot) -> Option<&str> {
        self.slot(slot)
            .and_then(|entry| entry.document_number.as_deref())
    }

    pub fn front_side_url(&self, slot: DocumentSlot) -> Option<&str> {
        self.slot(slot)
            .and_then(|entry| entry.front_side_url.as_deref())
    }

    pub fn back_side_url(&self, slot: DocumentSlot) -> Option<&str> {
        self.slot(slot)
            .and_then(|entry| entry.back_side_url.as_deref())
    }

    pub fn duplicates(&self) -> usize {
        self.tags
            .iter()
            .flatten()
            .filter(|tag| matches!(tag, DocumentTag::Duplicate(_)))
            .count()
    }
}
