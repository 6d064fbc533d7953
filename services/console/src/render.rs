use std::collections::BTreeMap;

use partner_review::workflows::channel_partner::{
    ClassifiedDocuments, DocumentSlot, DocumentTag, FormField, FormGroup, FormState, Notifier,
    PartnerGateway, PartnerId, ReviewForm, SectionId, SectionStatus,
};
use serde_json::{json, Map, Value};

/// Point-in-time copy of a loaded application for rendering.
pub(crate) struct ApplicationView<'a> {
    pub(crate) partner: &'a PartnerId,
    pub(crate) form: FormState,
    pub(crate) statuses: BTreeMap<SectionId, SectionStatus>,
    pub(crate) documents: &'a ClassifiedDocuments,
}

impl<'a> ApplicationView<'a> {
    pub(crate) fn of<G, N>(review: &'a ReviewForm<G, N>) -> Self
    where
        G: PartnerGateway + ?Sized,
        N: Notifier + ?Sized,
    {
        Self {
            partner: review.partner(),
            form: review.form(),
            statuses: review.statuses(),
            documents: review.documents(),
        }
    }

    fn status(&self, section: SectionId) -> SectionStatus {
        self.statuses.get(&section).copied().unwrap_or_default()
    }
}

pub(crate) fn render_application(view: &ApplicationView<'_>, list_documents: bool) -> String {
    let mut lines = Vec::new();

    for group in FormGroup::ALL {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        match group.section() {
            Some(section) => lines.push(format!("{} [{}]", group.title(), view.status(section))),
            None if group == FormGroup::Header => {
                lines.push(format!("{} (partner {})", group.title(), view.partner))
            }
            None => lines.push(group.title().to_string()),
        }

        if group == FormGroup::KycDocuments {
            render_slots(view, &mut lines);
            continue;
        }
        for field in FormField::in_group(group) {
            lines.push(format!("  {}: {}", field.label(), view.form.get(field)));
        }
    }

    if list_documents {
        lines.push(String::new());
        lines.push(format!(
            "Submitted documents ({}, {} duplicate)",
            view.documents.entries().len(),
            view.documents.duplicates()
        ));
        for (entry, tags) in view.documents.tagged() {
            let label = entry.proof_type_label.as_deref().unwrap_or("(unlabelled)");
            let number = entry.document_number.as_deref().unwrap_or_default();
            lines.push(format!("  [{}] {label}: {number}", tags_label(tags)));
        }
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

fn render_slots(view: &ApplicationView<'_>, lines: &mut Vec<String>) {
    for slot in DocumentSlot::ALL {
        lines.push(format!(
            "  {} ({}): {}",
            slot.title(),
            slot.document_type(),
            view.documents.document_number(slot).unwrap_or_default()
        ));
        if let Some(url) = view.documents.front_side_url(slot) {
            lines.push(format!("    front: {url}"));
        }
        if let Some(url) = view.documents.back_side_url(slot) {
            lines.push(format!("    back: {url}"));
        }
    }
}

fn tags_label(tags: &[DocumentTag]) -> String {
    if tags.is_empty() {
        return "unclassified".to_string();
    }
    tags.iter()
        .map(|tag| match tag {
            DocumentTag::Slot(slot) => slot.title().to_string(),
            DocumentTag::Duplicate(slot) => format!("duplicate of {}", slot.title()),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn application_json(view: &ApplicationView<'_>) -> Value {
    let fields: Map<String, Value> = view
        .form
        .iter()
        .map(|(field, value)| (field.id().to_string(), Value::from(value)))
        .collect();
    let statuses: Map<String, Value> = view
        .statuses
        .iter()
        .map(|(section, status)| (section.key().to_string(), Value::from(status.label())))
        .collect();
    let documents: Vec<Value> = view
        .documents
        .tagged()
        .map(|(entry, tags)| json!({ "tags": tags, "entry": entry }))
        .collect();

    json!({
        "partner": view.partner,
        "fields": fields,
        "statuses": statuses,
        "documents": documents,
    })
}
