//! Create, update and remove with notify-then-refresh semantics

use crate::core::error::{ClientError, ClientResult};
use crate::core::events::{Action, Notification};
use crate::core::Resource;
use crate::list::loader::{ListLoader, OperationStatus, StatusCell};
use std::future::Future;
use std::sync::Arc;
use validator::Validate;

/// Asks the user to confirm a destructive action
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a remove request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The user declined; nothing was sent
    Declined,
}

/// Runs mutations for one resource and keeps its list in sync.
///
/// After every successful mutation the dispatcher publishes a success
/// notification and then re-fetches the whole collection once through the
/// loader. A failed mutation leaves the collection untouched, publishes an
/// error notification and returns the error.
pub struct MutationDispatcher<T: Resource> {
    loader: Arc<ListLoader<T>>,
    status: StatusCell,
}

impl<T: Resource> MutationDispatcher<T> {
    pub fn new(loader: Arc<ListLoader<T>>) -> Self {
        Self {
            loader,
            status: StatusCell::default(),
        }
    }

    pub fn loader(&self) -> &Arc<ListLoader<T>> {
        &self.loader
    }

    pub fn status(&self) -> OperationStatus {
        self.status.get()
    }

    pub fn acknowledge(&self) {
        if !self.status.get().is_loading() {
            self.status.set(OperationStatus::Idle);
        }
    }

    /// Create a record; `None` when the backend accepted it without echoing it back
    pub async fn create(&self, draft: &T::Draft) -> ClientResult<Option<T>> {
        let service = self.loader.service().clone();
        self.run(Action::Create, Some(draft), async move { service.create(draft).await })
            .await
    }

    pub async fn update(&self, id: &str, draft: &T::Draft) -> ClientResult<Option<T>> {
        let service = self.loader.service().clone();
        self.run(Action::Update, Some(draft), async move {
            service.update(id, draft).await
        })
        .await
    }

    /// Delete `id` after the user confirms
    pub async fn remove(&self, id: &str, confirm: &dyn Confirm) -> ClientResult<RemoveOutcome> {
        let prompt = format!(
            "Are you sure you want to delete this {}?",
            humanize(T::resource_name_singular()).to_lowercase()
        );
        if !confirm.confirm(&prompt) {
            tracing::debug!(resource = T::resource_name_singular(), id, "delete declined");
            return Ok(RemoveOutcome::Declined);
        }

        let service = self.loader.service().clone();
        self.run(Action::Delete, None, async move { service.delete(id).await })
            .await?;
        Ok(RemoveOutcome::Removed)
    }

    async fn run<R, F>(&self, action: Action, draft: Option<&T::Draft>, request: F) -> ClientResult<R>
    where
        F: Future<Output = ClientResult<R>>,
    {
        let resource = T::resource_name_singular();
        self.status.set(OperationStatus::Loading);

        let result = match draft.map(Validate::validate).transpose() {
            Ok(_) => request.await,
            Err(errors) => Err(ClientError::from(errors)),
        };

        match result {
            Ok(value) => {
                let message = format!("{} {} successfully", humanize(resource), action.past_tense());
                self.loader
                    .notifications()
                    .publish(Notification::success(resource, action, message));
                self.status.set(OperationStatus::Succeeded);

                // A failed refresh is reported by the loader itself.
                if let Err(err) = self.loader.refresh().await {
                    tracing::debug!(resource, error = %err, "refresh after mutation failed");
                }
                Ok(value)
            }
            Err(err) => {
                if matches!(err, ClientError::Cancelled) {
                    tracing::debug!(resource, ?action, "mutation cancelled");
                    self.status.set(OperationStatus::Idle);
                    return Err(err);
                }

                let message = err.user_message();
                tracing::warn!(resource, ?action, error = %err, "mutation failed");
                self.status.set(OperationStatus::Failed(message.clone()));
                self.loader
                    .notifications()
                    .publish(Notification::error(resource, action, message));
                Err(err)
            }
        }
    }
}

/// "budget_category" → "Budget category"
fn humanize(name: &str) -> String {
    let spaced = name.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
