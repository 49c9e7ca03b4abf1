//! Dynamic field values used by search, filter and sort predicates

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A polymorphic field value read from a collection item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a timestamp if possible
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(d) => Some(*d),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Case-insensitive substring test used by free-text search.
    ///
    /// `needle` must already be lowercased. Only text values take part in
    /// search; every other variant is a non-match.
    pub fn contains_text(&self, needle: &str) -> bool {
        match self {
            FieldValue::String(s) => s.to_lowercase().contains(needle),
            _ => false,
        }
    }

    /// Equality test against a categorical filter value.
    ///
    /// Filter values come from select boxes, so they are compared against the
    /// textual rendering of the field. Null never matches.
    pub fn matches_filter(&self, expected: &str) -> bool {
        match self {
            FieldValue::String(s) => s == expected,
            FieldValue::Integer(i) => expected.parse::<i64>().is_ok_and(|e| e == *i),
            FieldValue::Float(f) => expected.parse::<f64>().is_ok_and(|e| e == *f),
            FieldValue::Boolean(b) => expected.parse::<bool>().is_ok_and(|e| e == *b),
            FieldValue::DateTime(d) => {
                d.to_rfc3339() == expected || d.format("%Y-%m-%d").to_string() == expected
            }
            FieldValue::Null => false,
        }
    }

    /// Ascending comparator for sorting.
    ///
    /// Strings compare case-insensitively, timestamps by instant, numbers
    /// numerically. A missing or null value behaves like the empty string /
    /// the earliest instant, so it sorts before every present value.
    pub fn sort_cmp(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
        let a = a.unwrap_or(&FieldValue::Null);
        let b = b.unwrap_or(&FieldValue::Null);

        match (a.is_blank(), b.is_blank()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        match (a, b) {
            (FieldValue::String(x), FieldValue::String(y)) => cmp_ignore_case(x, y),
            (FieldValue::DateTime(x), FieldValue::DateTime(y)) => x.cmp(y),
            (FieldValue::Boolean(x), FieldValue::Boolean(y)) => x.cmp(y),
            (FieldValue::Integer(x), FieldValue::Integer(y)) => x.cmp(y),
            (x, y) => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => x.rank().cmp(&y.rank()),
            },
        }
    }

    // Null and "" are one blank value below every other value, on any column.
    fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    // Mixed-type columns still need a total order.
    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) | FieldValue::Float(_) => 2,
            FieldValue::DateTime(_) => 3,
            FieldValue::String(_) => 4,
        }
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Conversion from a typed struct field into a [`FieldValue`]
///
/// Implemented for the primitive types resources are built from; used by
/// `impl_resource!` to generate `Entity::field_value`.
pub trait IntoFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

impl IntoFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl IntoFieldValue for i64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl IntoFieldValue for i32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(i64::from(*self))
    }
}

impl IntoFieldValue for u32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(i64::from(*self))
    }
}

impl IntoFieldValue for f64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl IntoFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

impl IntoFieldValue for DateTime<Utc> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::DateTime(*self)
    }
}

impl<T: IntoFieldValue> IntoFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        self.as_ref()
            .map_or(FieldValue::Null, IntoFieldValue::to_field_value)
    }
}

/// Serde adapter for optional timestamps that backends send in several shapes.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00.000Z`), naive date-times and bare
/// dates (`2024-03-01`, read as midnight UTC). Empty strings and `null` decode
/// to `None`.
///
/// ```rust,ignore
/// #[serde(default, with = "bizlist::core::field::lenient_datetime")]
/// pub due_date: Option<DateTime<Utc>>,
/// ```
pub mod lenient_datetime {
    use super::*;
    use serde::{Deserializer, Serializer, de::Error};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse(s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("unrecognized date '{s}'"))),
        }
    }

    /// Parse one of the accepted date shapes
    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}
