//! Budgets, categories and transactions

use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::{Validate, ValidationError};

fn validate_kind(kind: &str) -> Result<(), ValidationError> {
    match kind {
        "income" | "expense" => Ok(()),
        _ => {
            let mut err = ValidationError::new("kind");
            err.message = Some("Type must be income or expense".into());
            Err(err)
        }
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDraft {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[validate(length(min = 1, message = "Period is required"))]
    pub period: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl_resource!(
    /// A spending limit for a category over a period
    Budget,
    "budget",
    search: ["name", "category"],
    draft: BudgetDraft,
    {
        name: String,
        amount: f64,
        /// Amount already spent, when the backend reports it
        spent: Option<f64>,
        category: Option<String>,
        #[serde(default)]
        period: String,
        #[serde(default, with = "bizlist::core::field::lenient_datetime")]
        start_date: Option<DateTime<Utc>>,
        #[serde(default, with = "bizlist::core::field::lenient_datetime")]
        end_date: Option<DateTime<Utc>>,
    }
);

impl Budget {
    /// Amount left to spend; negative when overspent
    pub fn remaining(&self) -> f64 {
        self.amount - self.spent.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CategoryDraft {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(rename = "type")]
    #[validate(custom(function = "validate_kind"))]
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl_resource!(
    Category,
    "category",
    search: ["name", "description"],
    draft: CategoryDraft,
    {
        name: String,
        /// "income" or "expense"
        #[serde(rename = "type", default)]
        kind: String,
        color: Option<String>,
        description: Option<String>,
    }
);

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than zero"))]
    pub amount: f64,

    #[serde(rename = "type")]
    #[validate(custom(function = "validate_kind"))]
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl_resource!(
    Transaction,
    "transaction",
    search: ["description", "category"],
    draft: TransactionDraft,
    {
        description: String,
        amount: f64,
        #[serde(rename = "type", default)]
        kind: String,
        category: Option<String>,
        #[serde(default, with = "bizlist::core::field::lenient_datetime")]
        date: Option<DateTime<Utc>>,
        status: Option<String>,
    }
);

impl Transaction {
    /// Amount with expenses negated
    pub fn signed_amount(&self) -> f64 {
        if self.kind == "expense" {
            -self.amount
        } else {
            self.amount
        }
    }
}
