use serde::Serialize;

pub const STATUS_UPDATE_FAILED: &str =
    "Failed to update status. Please check your connection and try again.";
pub const DECISION_UPDATED: &str = "Final decision has been updated successfully!";
pub const DECISION_UPDATE_FAILED: &str = "Failed to update final decision. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// A message the reviewer must see; failures are never log-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewNotice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ReviewNotice {
    pub fn success(message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.to_string(),
            detail: None,
        }
    }

    pub fn failure(message: &str, detail: impl ToString) -> Self {
        Self {
            level: NoticeLevel::Failure,
            message: message.to_string(),
            detail: Some(detail.to_string()),
        }
    }
}

/// Outbound channel for reviewer-facing notices (terminal, dialog, test recorder).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: ReviewNotice);
}
