//! Traits shared by every catalog entity.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Debug;

use serde::Serialize;
use thiserror::Error;
use validator::Validate;

/// Raised when text does not name a member of a closed enumeration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A server-owned record with a stable integer identifier.
pub trait Record: Clone + Debug + Send + Sync + 'static {
    fn id(&self) -> i64;
}

/// A record that participates in free-text search.
pub trait Searchable {
    /// The fixed set of fields the search box matches against.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;
}

/// A record that can be ordered by one of a closed set of columns.
pub trait Sortable {
    type SortKey: Copy + Eq + Debug + Send + Sync + 'static;

    fn default_sort_key() -> Self::SortKey;

    /// Ascending comparison on `key`.
    fn compare_by(&self, other: &Self, key: Self::SortKey) -> Ordering;

    /// Secondary ordering for records equal on `key`. Applied ascending in
    /// both sort directions. `Equal` keeps the loaded order.
    fn tie_break(&self, _other: &Self, _key: Self::SortKey) -> Ordering {
        Ordering::Equal
    }
}

/// A record with a two-valued status that can be flipped in place.
pub trait HasStatus {
    type Status: Copy + Eq + Debug + Send + Sync + Serialize + 'static;

    fn status(&self) -> Self::Status;

    /// The opposite status value.
    fn toggled_status(&self) -> Self::Status;
}

/// The editable body of an entity, validated before it reaches the network.
pub trait Draft: Validate + Clone + Debug + Default + Serialize + Send + Sync + 'static {
    type Entity: Record;

    /// Seeds a draft from an existing record (edit mode).
    fn from_entity(entity: &Self::Entity) -> Self;
}

/// Compares two strings ignoring case.
///
/// Values differing only in case compare equal, so a stable sort keeps their
/// original relative order.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_display() {
        let err = UnknownVariant::new("partner status", "Paused");
        assert_eq!(err.to_string(), "Unknown partner status: 'Paused'");
    }

    #[test]
    fn test_compare_text_ignores_case() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("Cherry", "banana"), Ordering::Greater);
    }

    #[test]
    fn test_compare_text_case_only_difference_is_a_tie() {
        assert_eq!(compare_text("Plan", "plan"), Ordering::Equal);
    }
}
