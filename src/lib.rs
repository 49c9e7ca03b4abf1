//! # bizlist
//!
//! Typed REST resources and client-side list screens for back-office
//! applications (CRM leads, budgets, transactions, onboarding).
//!
//! ## Features
//!
//! - **Typed Resources**: Records and request drafts decoded and validated at the boundary
//! - **Envelope Handling**: Bare arrays, `{"leads": [...]}` and `{"data": [...]}` all unwrap to `Vec<T>`
//! - **List Controller**: Free-text search, equality filters and stable sorting over fetched collections
//! - **Pagination**: Fixed-size pages with clamping and elided page links
//! - **Mutations**: Create, update and confirmed delete with notify-then-refresh semantics
//! - **Cancellation**: Fetches tied to a screen scope; stale responses are dropped
//! - **Metrics**: Injectable request counters with `init`/`reset`
//! - **Configuration-Based**: Base URL and per-resource settings from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bizlist::prelude::*;
//! use std::sync::Arc;
//!
//! let config = ClientConfig::from_yaml_file("bizlist.yaml")?.with_env_overrides();
//! let session = Arc::new(InMemorySessionStore::with_token("secret"));
//! let client = Arc::new(RestClient::new(&config.api, session, ClientMetrics::init())?);
//!
//! let leads = Arc::new(RestResource::<Lead>::from_config(client, config.resource("lead")));
//! let list = Arc::new(RwLock::new(ListController::new(10)));
//! let loader = Arc::new(ListLoader::new(leads, list.clone(), NotificationBus::default()));
//!
//! loader.refresh().await?;
//! list.write().await.set_search_term("acme");
//! let view = list.read().await.view();
//!
//! let dispatcher = MutationDispatcher::new(loader);
//! dispatcher.create(&LeadDraft::new("Acme Inc")).await?;
//! ```

extern crate self as bizlist;

pub mod client;
pub mod config;
pub mod core;
pub mod entities;
pub mod list;
pub mod logging;
#[cfg(feature = "in-memory")]
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        Entity, Resource, ResourceService,
        error::{ClientError, ClientResult, ErrorKind, FieldError},
        events::{Action, Notification, NotificationBus, NotificationLevel},
        field::FieldValue,
        metrics::{ClientMetrics, MetricsSnapshot},
        pluralize::Pluralizer,
        query::{FilterValue, QueryParams, QueryState, SortDirection, SortSpec},
        session::{InMemorySessionStore, SessionSignals, SessionStore},
    };

    // === Macros ===
    pub use crate::impl_resource;

    // === Client ===
    pub use crate::client::{RestClient, RestResource};
    pub use crate::config::{ApiConfig, ClientConfig, ResourceConfig, UpdateMethod};

    // === Resources ===
    pub use crate::entities::*;

    // === List Screens ===
    pub use crate::list::{
        Confirm, FetchOutcome, ListController, ListLoader, ListView, MutationDispatcher,
        OperationStatus, PaginationMeta, Paginator, RemoveOutcome, SharedList,
    };

    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryBackend;

    // === Re-exports ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use tokio::sync::RwLock;
    pub use tokio_util::sync::CancellationToken;
    pub use validator::Validate;
}
