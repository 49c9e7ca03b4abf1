//! Client onboarding records and their checklists
//!
//! Checklist items reach the client in two shapes: older records store bare
//! labels (`["Sign contract", "Send invoice"]`) while newer ones store objects
//! with a completion flag. Both are normalized into [`ChecklistItem`] when the
//! response is decoded, so nothing downstream branches on the shape.

use crate::core::entity::{Entity, Resource};
use crate::core::field::{FieldValue, IntoFieldValue, lenient_datetime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One checklist entry, normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawChecklistItem")]
pub struct ChecklistItem {
    pub title: String,
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }
}

/// Wire shapes accepted for a checklist entry
#[derive(Deserialize)]
#[serde(untagged)]
enum RawChecklistItem {
    Label(String),
    Detailed {
        #[serde(alias = "task", alias = "name", alias = "label")]
        title: String,
        #[serde(default, alias = "done", alias = "isCompleted")]
        completed: bool,
    },
}

impl From<RawChecklistItem> for ChecklistItem {
    fn from(raw: RawChecklistItem) -> Self {
        match raw {
            RawChecklistItem::Label(title) => Self {
                title,
                completed: false,
            },
            RawChecklistItem::Detailed { title, completed } => Self { title, completed },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingDraft {
    #[validate(length(min = 1, message = "Client name is required"))]
    pub client_name: String,

    #[validate(email(message = "Enter a valid email address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    pub checklist: Vec<ChecklistItem>,
}

/// Onboarding progress for a newly signed client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Onboarding {
    #[serde(alias = "_id")]
    pub id: String,

    #[serde(alias = "name", alias = "client")]
    pub client_name: String,

    pub email: Option<String>,

    #[serde(default = "default_status")]
    pub status: String,

    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,

    #[serde(default, with = "lenient_datetime", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, with = "lenient_datetime", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_status() -> String {
    "pending".to_string()
}

impl Onboarding {
    /// Completed checklist items as a whole percentage (0 when empty)
    pub fn progress(&self) -> u32 {
        let total = self.checklist.len();
        if total == 0 {
            return 0;
        }
        let done = self.checklist.iter().filter(|item| item.completed).count();
        ((done * 100) / total) as u32
    }

    pub fn is_complete(&self) -> bool {
        !self.checklist.is_empty() && self.checklist.iter().all(|item| item.completed)
    }
}

impl Entity for Onboarding {
    fn resource_name() -> &'static str {
        "onboardings"
    }

    fn resource_name_singular() -> &'static str {
        "onboarding"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields() -> &'static [&'static str] {
        &["client_name", "email"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::String(self.id.clone())),
            "client_name" => Some(self.client_name.to_field_value()),
            "email" => Some(self.email.to_field_value()),
            "status" => Some(self.status.to_field_value()),
            "progress" => Some(self.progress().to_field_value()),
            "created_at" => Some(self.created_at.to_field_value()),
            "updated_at" => Some(self.updated_at.to_field_value()),
            _ => None,
        }
    }
}

impl Resource for Onboarding {
    type Draft = OnboardingDraft;
}
