//! Event domain model.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::record::{compare_text, Draft, Record, Searchable, Sortable, UnknownVariant};

/// Represents an event that can be attached to products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Event data embedded by the server inside related records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventRef {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Event> for EventRef {
    fn from(e: &Event) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            description: Some(e.description.clone()),
        }
    }
}

/// Request payload for creating or replacing an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct EventDraft {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: String,
}

impl EventDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Columns an event list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSortKey {
    Id,
    Name,
    Description,
}

impl EventSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSortKey::Id => "id",
            EventSortKey::Name => "name",
            EventSortKey::Description => "description",
        }
    }
}

impl FromStr for EventSortKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(EventSortKey::Id),
            "name" => Ok(EventSortKey::Name),
            "description" => Ok(EventSortKey::Description),
            other => Err(UnknownVariant::new("event sort key", other)),
        }
    }
}

impl Record for Event {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Event {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.description.as_str()),
        ]
    }
}

impl Sortable for Event {
    type SortKey = EventSortKey;

    fn default_sort_key() -> Self::SortKey {
        EventSortKey::Name
    }

    fn compare_by(&self, other: &Self, key: Self::SortKey) -> Ordering {
        match key {
            EventSortKey::Id => self.id.cmp(&other.id),
            EventSortKey::Name => compare_text(&self.name, &other.name),
            EventSortKey::Description => compare_text(&self.description, &other.description),
        }
    }
}

impl Draft for EventDraft {
    type Entity = Event;

    fn from_entity(entity: &Event) -> Self {
        Self {
            name: entity.name.clone(),
            description: entity.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(id: i64, name: &str) -> Event {
        Event {
            id,
            name: name.to_string(),
            description: "Launch webinar".to_string(),
        }
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"id": 7, "name": "Product Launch", "description": "Launch webinar"}"#;
        let e: Event = serde_json::from_str(json).unwrap();
        assert_eq!(e, sample_event(7, "Product Launch"));
    }

    #[test]
    fn test_event_ref_without_description() {
        let json = r#"{"id": 3, "name": "User Training"}"#;
        let r: EventRef = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, 3);
        assert!(r.description.is_none());
    }

    #[test]
    fn test_draft_valid() {
        let draft = EventDraft::new("Product Launch", "Launch webinar");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_name_bounds() {
        assert!(EventDraft::new("", "d").validate().is_err());
        assert!(EventDraft::new("a", "d").validate().is_ok());
        assert!(EventDraft::new("a".repeat(100), "d").validate().is_ok());
        assert!(EventDraft::new("a".repeat(101), "d").validate().is_err());
    }

    #[test]
    fn test_draft_description_bounds() {
        assert!(EventDraft::new("n", "").validate().is_err());
        assert!(EventDraft::new("n", "d".repeat(500)).validate().is_ok());
        assert!(EventDraft::new("n", "d".repeat(501)).validate().is_err());
    }

    #[test]
    fn test_draft_from_entity() {
        let draft = EventDraft::from_entity(&sample_event(7, "Product Launch"));
        assert_eq!(draft, EventDraft::new("Product Launch", "Launch webinar"));
    }

    #[test]
    fn test_search_fields() {
        let e = sample_event(1, "User Training");
        let fields = e.search_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], "User Training");
    }

    #[test]
    fn test_sort_key_round_trip_names() {
        for key in [EventSortKey::Id, EventSortKey::Name, EventSortKey::Description] {
            assert_eq!(key.as_str().parse::<EventSortKey>().unwrap(), key);
        }
        assert!("date".parse::<EventSortKey>().is_err());
    }
}
