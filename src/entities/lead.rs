//! Sales leads

use serde::Serialize;
use validator::Validate;

/// Request body for creating or updating a [`Lead`]
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadDraft {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Enter a valid email address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[validate(range(min = 0.0, message = "Value cannot be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl LeadDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

impl_resource!(
    /// A prospective client tracked through the sales pipeline
    Lead,
    "lead",
    search: ["name", "email", "company"],
    draft: LeadDraft,
    {
        name: String,
        email: Option<String>,
        phone: Option<String>,
        company: Option<String>,
        /// Pipeline stage (e.g., "new", "contacted", "qualified", "lost")
        #[serde(default = "default_status")]
        status: String,
        source: Option<String>,
        /// Estimated deal value
        value: Option<f64>,
    }
);

fn default_status() -> String {
    "new".to_string()
}

impl From<&Lead> for LeadDraft {
    fn from(lead: &Lead) -> Self {
        Self {
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            company: lead.company.clone(),
            status: Some(lead.status.clone()),
            source: lead.source.clone(),
            value: lead.value,
        }
    }
}
