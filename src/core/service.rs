//! Service trait for resource operations

use crate::core::error::ClientResult;
use crate::core::{QueryParams, Resource};
use async_trait::async_trait;

/// CRUD access to one backend resource
///
/// `RestResource` implements this over HTTP; tests substitute their own
/// implementations. Implementations never touch list state: they return data
/// and let the loader or dispatcher decide what to do with it.
#[async_trait]
pub trait ResourceService<T: Resource>: Send + Sync {
    /// Fetch the whole collection, forwarding `params` to the backend
    async fn list(&self, params: &QueryParams) -> ClientResult<Vec<T>>;

    /// Create a record from a draft.
    ///
    /// `None` means the backend accepted the write but sent no record back
    /// (`204 No Content` or an empty body).
    async fn create(&self, draft: &T::Draft) -> ClientResult<Option<T>>;

    /// Update a record by ID; `None` as for [`ResourceService::create`]
    async fn update(&self, id: &str, draft: &T::Draft) -> ClientResult<Option<T>>;

    /// Delete a record by ID
    async fn delete(&self, id: &str) -> ClientResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Entity;
    use crate::core::field::FieldValue;
    use serde::{Deserialize, Serialize};
    use validator::Validate;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct Tag {
        id: String,
        label: String,
    }

    #[derive(Serialize, Validate)]
    struct TagDraft {
        #[validate(length(min = 1))]
        label: String,
    }

    impl Entity for Tag {
        fn resource_name() -> &'static str {
            "tags"
        }

        fn resource_name_singular() -> &'static str {
            "tag"
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn search_fields() -> &'static [&'static str] {
            &["label"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            (field == "label").then(|| FieldValue::String(self.label.clone()))
        }
    }

    impl Resource for Tag {
        type Draft = TagDraft;
    }

    struct Fixed(Vec<Tag>);

    #[async_trait]
    impl ResourceService<Tag> for Fixed {
        async fn list(&self, _params: &QueryParams) -> ClientResult<Vec<Tag>> {
            Ok(self.0.clone())
        }

        async fn create(&self, draft: &TagDraft) -> ClientResult<Option<Tag>> {
            Ok(Some(Tag {
                id: "new".to_string(),
                label: draft.label.clone(),
            }))
        }

        async fn update(&self, id: &str, draft: &TagDraft) -> ClientResult<Option<Tag>> {
            Ok(Some(Tag {
                id: id.to_string(),
                label: draft.label.clone(),
            }))
        }

        async fn delete(&self, _id: &str) -> ClientResult<()> {
            Ok(())
        }
    }

    // The trait is usable behind a trait object
    #[tokio::test]
    async fn test_service_as_trait_object() {
        let service: Box<dyn ResourceService<Tag>> = Box::new(Fixed(vec![Tag {
            id: "1".to_string(),
            label: "vip".to_string(),
        }]));

        let tags = service.list(&QueryParams::new()).await.unwrap();
        assert_eq!(tags.len(), 1);

        let draft = TagDraft {
            label: "cold".to_string(),
        };
        let updated = service.update("1", &draft).await.unwrap().unwrap();
        assert_eq!(updated.id(), "1");
        assert_eq!(updated.label, "cold");
    }
}
