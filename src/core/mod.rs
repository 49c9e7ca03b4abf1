//! Core module containing fundamental traits and types for the crate

pub mod entity;
pub mod error;
pub mod events;
pub mod field;
pub mod metrics;
pub mod pluralize;
pub mod query;
pub mod service;
pub mod session;

pub use entity::{Entity, Resource};
pub use error::{ClientError, ClientResult, ErrorKind, FieldError};
pub use events::{Action, Notification, NotificationBus, NotificationLevel};
pub use field::{FieldValue, IntoFieldValue};
pub use metrics::{ClientMetrics, MetricsSnapshot};
pub use pluralize::Pluralizer;
pub use query::{FilterValue, QueryParams, QueryState, SortDirection, SortSpec};
pub use service::ResourceService;
pub use session::{InMemorySessionStore, SessionSignals, SessionStore};
