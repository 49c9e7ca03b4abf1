//! Activities and notes attached to leads

use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDraft {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type is required"))]
    pub kind: String,

    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    pub completed: bool,
}

impl_resource!(
    /// A call, email or meeting scheduled against a lead
    Activity,
    "activity",
    search: ["subject", "kind"],
    draft: ActivityDraft,
    {
        #[serde(rename = "type", default)]
        kind: String,
        subject: String,
        lead_id: Option<String>,
        #[serde(default, with = "bizlist::core::field::lenient_datetime")]
        due_date: Option<DateTime<Utc>>,
        #[serde(default)]
        completed: bool,
    }
);

impl Activity {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    #[validate(length(min = 1, max = 5000, message = "Note must be 1 to 5000 characters"))]
    pub content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
}

impl_resource!(
    Note,
    "note",
    search: ["content", "author"],
    draft: NoteDraft,
    {
        content: String,
        lead_id: Option<String>,
        author: Option<String>,
    }
);
