//! Product-event mapping domain model.
//!
//! A ProductEvent attaches an Event to a Product at a display position. The
//! `order` value is scoped per product and defines the ranking of that
//! product's events.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::event::EventRef;
use super::product::ProductRef;
use super::record::{compare_text, Draft, Record, Searchable, Sortable, UnknownVariant};
use crate::services::resolution;

/// Represents the attachment of an event to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductEvent {
    pub id: i64,
    pub product_id: i64,
    pub event_id: i64,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventRef>,
}

/// ProductEvent data embedded by the server inside subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductEventRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventRef>,
}

impl From<&ProductEvent> for ProductEventRef {
    fn from(pe: &ProductEvent) -> Self {
        Self {
            id: pe.id,
            product_id: Some(pe.product_id),
            event_id: Some(pe.event_id),
            product: pe.product.clone(),
            event: pe.event.clone(),
        }
    }
}

fn default_order() -> i64 {
    1
}

/// Request payload for creating or replacing a product-event mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ProductEventDraft {
    #[validate(custom(function = "shared::validation::validate_reference"))]
    pub product_id: i64,

    #[validate(custom(function = "shared::validation::validate_reference"))]
    pub event_id: i64,

    #[serde(default = "default_order")]
    #[validate(custom(function = "shared::validation::validate_order"))]
    pub order: i64,
}

impl Default for ProductEventDraft {
    fn default() -> Self {
        Self {
            product_id: 0,
            event_id: 0,
            order: default_order(),
        }
    }
}

/// Body of `PATCH /product-events/{id}/order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEventOrderPatch {
    pub order: i64,
}

/// Direction of a one-step reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Towards the top of the product's list (smaller order).
    Up,
    /// Towards the bottom of the product's list (larger order).
    Down,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Up => "up",
            OrderDirection::Down => "down",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderDirection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(OrderDirection::Up),
            "down" => Ok(OrderDirection::Down),
            other => Err(UnknownVariant::new("order direction", other)),
        }
    }
}

impl ProductEvent {
    /// The order this mapping would take after one step in `direction`.
    ///
    /// Returns `None` when the step would take the order below 1. Siblings are
    /// not consulted; two mappings may end up sharing an order value.
    pub fn next_order(&self, direction: OrderDirection) -> Option<i64> {
        let next = match direction {
            OrderDirection::Up => self.order.checked_sub(1)?,
            OrderDirection::Down => self.order.checked_add(1)?,
        };
        shared::validation::validate_order(next).ok().map(|_| next)
    }
}

/// Columns a product-event list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductEventSortKey {
    Id,
    Product,
    Event,
    Order,
}

impl ProductEventSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductEventSortKey::Id => "id",
            ProductEventSortKey::Product => "product",
            ProductEventSortKey::Event => "event",
            ProductEventSortKey::Order => "order",
        }
    }
}

impl FromStr for ProductEventSortKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(ProductEventSortKey::Id),
            "product" => Ok(ProductEventSortKey::Product),
            "event" => Ok(ProductEventSortKey::Event),
            "order" => Ok(ProductEventSortKey::Order),
            other => Err(UnknownVariant::new("product event sort key", other)),
        }
    }
}

impl Record for ProductEvent {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for ProductEvent {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            resolution::product_event_product_name(self),
            resolution::product_event_event_name(self),
        ]
    }
}

impl Sortable for ProductEvent {
    type SortKey = ProductEventSortKey;

    fn default_sort_key() -> Self::SortKey {
        ProductEventSortKey::Order
    }

    fn compare_by(&self, other: &Self, key: Self::SortKey) -> Ordering {
        match key {
            ProductEventSortKey::Id => self.id.cmp(&other.id),
            ProductEventSortKey::Product => compare_text(
                &resolution::product_event_product_name(self),
                &resolution::product_event_product_name(other),
            ),
            ProductEventSortKey::Event => compare_text(
                &resolution::product_event_event_name(self),
                &resolution::product_event_event_name(other),
            ),
            ProductEventSortKey::Order => self.order.cmp(&other.order),
        }
    }

    /// Duplicate order values display by id ascending, whatever the direction.
    fn tie_break(&self, other: &Self, key: Self::SortKey) -> Ordering {
        match key {
            ProductEventSortKey::Order => self.id.cmp(&other.id),
            _ => Ordering::Equal,
        }
    }
}

impl Draft for ProductEventDraft {
    type Entity = ProductEvent;

    fn from_entity(entity: &ProductEvent) -> Self {
        Self {
            product_id: entity.product_id,
            event_id: entity.event_id,
            order: entity.order,
        }
    }
}
