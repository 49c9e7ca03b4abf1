//! Entity traits defining the collection items handled by list controllers

use crate::core::field::FieldValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Base trait for every record a list screen can show.
///
/// The controller is generic over this trait and never inspects a record
/// beyond what the active predicates ask for:
/// - id: Stable identity used by update/delete
/// - resource names: Used to derive REST paths and envelope keys
/// - search_fields: Default fields the free-text search looks at
/// - field_value: Dynamic field access for filter and sort
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name (e.g., "leads", "categories")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "lead", "category")
    fn resource_name_singular() -> &'static str;

    /// Get the stable identifier of this record
    fn id(&self) -> &str;

    /// Fields searched by default when a search term is set
    fn search_fields() -> &'static [&'static str];

    /// Get the value of a specific field by name
    ///
    /// Returns `None` for unknown fields; the controller treats that as a
    /// non-match for filters and as the lowest value for sorting.
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}

/// An entity that can be fetched and mutated through a REST endpoint.
///
/// `Draft` is the request body used for create and update. It is validated
/// before any network call so malformed input never leaves the client.
pub trait Resource: Entity + Serialize + DeserializeOwned {
    /// Request DTO for create/update
    type Draft: Serialize + Validate + Send + Sync;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct TestEntity {
        id: String,
        name: String,
    }

    impl Entity for TestEntity {
        fn resource_name() -> &'static str {
            "test_entities"
        }

        fn resource_name_singular() -> &'static str {
            "test_entity"
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn search_fields() -> &'static [&'static str] {
            &["name"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" => Some(FieldValue::String(self.name.clone())),
                _ => None,
            }
        }
    }

    #[test]
    fn test_entity_metadata() {
        assert_eq!(TestEntity::resource_name(), "test_entities");
        assert_eq!(TestEntity::resource_name_singular(), "test_entity");
        assert_eq!(TestEntity::search_fields(), &["name"]);
    }

    #[test]
    fn test_field_value_unknown_field() {
        let entity = TestEntity {
            id: "1".to_string(),
            name: "Acme".to_string(),
        };

        assert_eq!(entity.id(), "1");
        assert_eq!(entity.field_value("name").unwrap().as_string(), Some("Acme"));
        assert!(entity.field_value("missing").is_none());
    }
}
