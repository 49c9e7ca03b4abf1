//! Client-side list handling: derivation, pagination, loading and mutations

pub mod controller;
pub mod dispatcher;
pub mod loader;
pub mod paginator;

pub use controller::{ListController, ListView, derive};
pub use dispatcher::{Confirm, MutationDispatcher, RemoveOutcome};
pub use loader::{FetchOutcome, ListLoader, OperationStatus, SharedList};
pub use paginator::{PaginationMeta, Paginator, page_count, page_links, paginate};
