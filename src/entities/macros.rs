//! Macros for reducing boilerplate when defining resources
//!
//! These macros generate the record struct and the repetitive trait
//! implementations every REST-backed resource needs.

/// Declare a resource record with automatic trait implementations
///
/// Generates a struct with the common `id`, `created_at` and `updated_at`
/// fields plus the ones listed, using camelCase on the wire. `id` also
/// accepts `_id`; timestamps accept RFC 3339 or bare dates. Every listed
/// field type must implement [`IntoFieldValue`](crate::core::field::IntoFieldValue)
/// so filters and sorts can reach it by its Rust name.
///
/// # Example
///
/// ```rust,ignore
/// impl_resource!(
///     Lead,
///     "lead",
///     search: ["name", "email"],
///     draft: LeadDraft,
///     {
///         name: String,
///         email: Option<String>,
///         #[serde(default)]
///         status: String,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_resource {
    (
        $(#[$struct_meta:meta])*
        $type:ident,
        $type_name:expr,
        search: [ $( $search_field:expr ),* $(,)? ],
        draft: $draft:ty,
        {
            $( $(#[$field_meta:meta])* $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        $(#[$struct_meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $type {
            /// Server-assigned identifier
            #[serde(alias = "_id")]
            pub id: String,

            $( $(#[$field_meta])* pub $field : $field_type, )*

            /// When the record was created
            #[serde(
                default,
                with = "bizlist::core::field::lenient_datetime",
                skip_serializing_if = "Option::is_none"
            )]
            pub created_at: Option<::chrono::DateTime<::chrono::Utc>>,

            /// When the record was last updated
            #[serde(
                default,
                with = "bizlist::core::field::lenient_datetime",
                skip_serializing_if = "Option::is_none"
            )]
            pub updated_at: Option<::chrono::DateTime<::chrono::Utc>>,
        }

        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                use std::sync::OnceLock;
                static PLURAL: OnceLock<String> = OnceLock::new();
                PLURAL.get_or_init(|| {
                    $crate::core::pluralize::Pluralizer::pluralize($type_name)
                }).as_str()
            }

            fn resource_name_singular() -> &'static str {
                $type_name
            }

            fn id(&self) -> &str {
                &self.id
            }

            fn search_fields() -> &'static [&'static str] {
                &[ $( $search_field ),* ]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                use $crate::core::field::{FieldValue, IntoFieldValue};

                $(
                    if field == stringify!($field) {
                        return Some(self.$field.to_field_value());
                    }
                )*

                match field {
                    "id" => Some(FieldValue::String(self.id.clone())),
                    "created_at" => Some(self.created_at.to_field_value()),
                    "updated_at" => Some(self.updated_at.to_field_value()),
                    _ => None,
                }
            }
        }

        impl $crate::core::entity::Resource for $type {
            type Draft = $draft;
        }
    };
}
