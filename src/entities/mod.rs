//! Typed resources served by the CRM and finance backend

#[macro_use]
pub mod macros;

pub mod activity;
pub mod finance;
pub mod lead;
pub mod onboarding;

pub use activity::{Activity, ActivityDraft, Note, NoteDraft};
pub use finance::{Budget, BudgetDraft, Category, CategoryDraft, Transaction, TransactionDraft};
pub use lead::{Lead, LeadDraft};
pub use onboarding::{ChecklistItem, Onboarding, OnboardingDraft};
