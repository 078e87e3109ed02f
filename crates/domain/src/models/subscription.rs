//! Subscription domain model.
//!
//! A Subscription binds one Partner to one ProductEvent.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::partner::PartnerRef;
use super::product_event::ProductEventRef;
use super::record::{
    compare_text, Draft, HasStatus, Record, Searchable, Sortable, UnknownVariant,
};
use crate::services::resolution;

/// Represents a partner's subscription to a product event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Subscription {
    pub id: i64,
    pub partner_id: i64,
    pub product_event_id: i64,
    pub status: SubscriptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<PartnerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_event: Option<ProductEventRef>,
}

/// Subscription status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Inactive,
}

const SUBSCRIPTION_STATUS_LITERALS: [&str; 2] = ["ACTIVE", "INACTIVE"];

impl SubscriptionStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::Inactive => "INACTIVE",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SubscriptionStatus::Active => SubscriptionStatus::Inactive,
            SubscriptionStatus::Inactive => SubscriptionStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match shared::validation::parse_literal(s, &SUBSCRIPTION_STATUS_LITERALS) {
            Ok(0) => Ok(SubscriptionStatus::Active),
            Ok(_) => Ok(SubscriptionStatus::Inactive),
            Err(_) => Err(UnknownVariant::new("subscription status", s)),
        }
    }
}

/// Request payload for creating or replacing a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubscriptionDraft {
    #[validate(custom(function = "shared::validation::validate_reference"))]
    pub product_event_id: i64,

    #[validate(custom(function = "shared::validation::validate_reference"))]
    pub partner_id: i64,

    #[serde(default)]
    pub status: SubscriptionStatus,
}

/// Body of `PATCH /subscriptions/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionStatusPatch {
    pub status: SubscriptionStatus,
}

/// Columns a subscription list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionSortKey {
    Id,
    Partner,
    Product,
    Event,
    Status,
}

impl SubscriptionSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionSortKey::Id => "id",
            SubscriptionSortKey::Partner => "partner",
            SubscriptionSortKey::Product => "product",
            SubscriptionSortKey::Event => "event",
            SubscriptionSortKey::Status => "status",
        }
    }
}

impl FromStr for SubscriptionSortKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SubscriptionSortKey::Id),
            "partner" => Ok(SubscriptionSortKey::Partner),
            "product" => Ok(SubscriptionSortKey::Product),
            "event" => Ok(SubscriptionSortKey::Event),
            "status" => Ok(SubscriptionSortKey::Status),
            other => Err(UnknownVariant::new("subscription sort key", other)),
        }
    }
}

impl Record for Subscription {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Subscription {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            resolution::subscription_partner_name(self),
            resolution::subscription_product_name(self),
            resolution::subscription_event_name(self),
        ]
    }
}

impl Sortable for Subscription {
    type SortKey = SubscriptionSortKey;

    fn default_sort_key() -> Self::SortKey {
        SubscriptionSortKey::Id
    }

    fn compare_by(&self, other: &Self, key: Self::SortKey) -> Ordering {
        match key {
            SubscriptionSortKey::Id => self.id.cmp(&other.id),
            SubscriptionSortKey::Partner => compare_text(
                &resolution::subscription_partner_name(self),
                &resolution::subscription_partner_name(other),
            ),
            SubscriptionSortKey::Product => compare_text(
                &resolution::subscription_product_name(self),
                &resolution::subscription_product_name(other),
            ),
            SubscriptionSortKey::Event => compare_text(
                &resolution::subscription_event_name(self),
                &resolution::subscription_event_name(other),
            ),
            SubscriptionSortKey::Status => self.status.as_str().cmp(other.status.as_str()),
        }
    }
}

impl HasStatus for Subscription {
    type Status = SubscriptionStatus;

    fn status(&self) -> SubscriptionStatus {
        self.status
    }

    fn toggled_status(&self) -> SubscriptionStatus {
        self.status.toggled()
    }
}

impl Draft for SubscriptionDraft {
    type Entity = Subscription;

    fn from_entity(entity: &Subscription) -> Self {
        Self {
            product_event_id: entity.product_event_id,
            partner_id: entity.partner_id,
            status: entity.status,
        }
    }
}
