//! Fetch glue between a resource service and a list controller

use crate::core::error::{ClientError, ClientResult};
use crate::core::events::{Action, Notification, NotificationBus};
use crate::core::{QueryParams, Resource, ResourceService};
use crate::list::controller::ListController;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// A list controller shared between a screen, its loader and its dispatcher
pub type SharedList<T> = Arc<RwLock<ListController<T>>>;

/// Lifecycle of one fetch or mutation: idle → loading → succeeded | failed → idle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum OperationStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed(String),
}

impl OperationStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, OperationStatus::Loading)
    }
}

/// Interior-mutable status holder; never held across an await
#[derive(Debug, Default)]
pub(crate) struct StatusCell(Mutex<OperationStatus>);

impl StatusCell {
    pub(crate) fn get(&self) -> OperationStatus {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn set(&self, status: OperationStatus) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }
}

/// What happened to a fetched collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The collection was replaced with this many items
    Applied(usize),
    /// A newer refresh started meanwhile; this response was dropped
    Discarded,
}

/// Fetches a resource collection into a [`SharedList`].
///
/// Each refresh replaces the controller's raw collection wholesale. A failed
/// refresh leaves the previous collection in place and publishes an error
/// notification. The loader's scope token is tied to the owning screen:
/// once cancelled, in-flight requests are abandoned and their responses
/// are never applied.
pub struct ListLoader<T: Resource> {
    service: Arc<dyn ResourceService<T>>,
    list: SharedList<T>,
    params: Mutex<QueryParams>,
    notifications: NotificationBus,
    scope: CancellationToken,
    generation: AtomicU64,
    status: StatusCell,
}

impl<T: Resource> ListLoader<T> {
    pub fn new(
        service: Arc<dyn ResourceService<T>>,
        list: SharedList<T>,
        notifications: NotificationBus,
    ) -> Self {
        Self {
            service,
            list,
            params: Mutex::new(QueryParams::new()),
            notifications,
            scope: CancellationToken::new(),
            generation: AtomicU64::new(0),
            status: StatusCell::default(),
        }
    }

    /// Tie the loader to an existing screen scope; cancelling `scope`
    /// cancels the loader, dropping the loader leaves `scope` alone
    pub fn with_scope(mut self, scope: &CancellationToken) -> Self {
        self.scope = scope.child_token();
        self
    }

    /// Server-side parameters sent with every refresh
    pub fn with_params(self, params: QueryParams) -> Self {
        self.set_params(params);
        self
    }

    pub fn service(&self) -> &Arc<dyn ResourceService<T>> {
        &self.service
    }

    pub fn list(&self) -> &SharedList<T> {
        &self.list
    }

    pub fn notifications(&self) -> &NotificationBus {
        &self.notifications
    }

    pub fn scope(&self) -> &CancellationToken {
        &self.scope
    }

    pub fn params(&self) -> QueryParams {
        self.params
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the server-side parameters; takes effect on the next refresh
    pub fn set_params(&self, params: QueryParams) {
        *self.params.lock().unwrap_or_else(PoisonError::into_inner) = params;
    }

    pub fn status(&self) -> OperationStatus {
        self.status.get()
    }

    /// Return a finished status to idle (e.g. after the error toast was shown)
    pub fn acknowledge(&self) {
        if !self.status.get().is_loading() {
            self.status.set(OperationStatus::Idle);
        }
    }

    /// Abandon in-flight and future fetches (the screen went away)
    pub fn cancel(&self) {
        self.scope.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.scope.is_cancelled()
    }

    /// Fetch the collection and replace the controller's items.
    ///
    /// Errors are returned after being published as a notification;
    /// cancellation is returned silently.
    pub async fn refresh(&self) -> ClientResult<FetchOutcome> {
        if self.scope.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let resource = T::resource_name_singular();
        let params = self.params();
        self.status.set(OperationStatus::Loading);

        let result = tokio::select! {
            biased;
            _ = self.scope.cancelled() => Err(ClientError::Cancelled),
            result = self.service.list(&params) => result,
        };

        match result {
            Ok(items) => {
                let mut list = self.list.write().await;
                if self.scope.is_cancelled() {
                    tracing::debug!(resource, "screen closed, dropping fetched collection");
                    return Err(ClientError::Cancelled);
                }
                if generation != self.generation.load(Ordering::SeqCst) {
                    tracing::debug!(resource, generation, "stale fetch discarded");
                    return Ok(FetchOutcome::Discarded);
                }

                let count = items.len();
                list.replace_items(items);
                drop(list);

                self.status.set(OperationStatus::Succeeded);
                tracing::debug!(resource, items = count, "collection replaced");
                Ok(FetchOutcome::Applied(count))
            }
            Err(ClientError::Cancelled) => {
                self.status.set(OperationStatus::Idle);
                tracing::debug!(resource, "fetch cancelled");
                Err(ClientError::Cancelled)
            }
            Err(err) => {
                if generation != self.generation.load(Ordering::SeqCst) {
                    tracing::debug!(resource, error = %err, "stale fetch failed, ignoring");
                    return Ok(FetchOutcome::Discarded);
                }

                let message = err.user_message();
                self.status.set(OperationStatus::Failed(message.clone()));
                self.notifications
                    .publish(Notification::error(resource, Action::Fetch, message));
                Err(err)
            }
        }
    }
}

impl<T: Resource> Drop for ListLoader<T> {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}
