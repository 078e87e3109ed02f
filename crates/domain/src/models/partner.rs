//! Partner domain model.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::record::{
    compare_text, Draft, HasStatus, Record, Searchable, Sortable, UnknownVariant,
};

/// Represents a partner (merchant) that can hold subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Partner {
    pub id: i64,
    pub merchant_number: String,
    pub name: String,
    pub partner_id: String,
    pub client_id: String,
    pub status: PartnerStatus,
}

/// Partner lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartnerStatus {
    #[default]
    Active,
    Inactive,
}

const PARTNER_STATUS_LITERALS: [&str; 2] = ["Active", "Inactive"];

impl PartnerStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PartnerStatus::Active => "Active",
            PartnerStatus::Inactive => "Inactive",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PartnerStatus::Active => PartnerStatus::Inactive,
            PartnerStatus::Inactive => PartnerStatus::Active,
        }
    }
}

impl fmt::Display for PartnerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartnerStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match shared::validation::parse_literal(s, &PARTNER_STATUS_LITERALS) {
            Ok(0) => Ok(PartnerStatus::Active),
            Ok(_) => Ok(PartnerStatus::Inactive),
            Err(_) => Err(UnknownVariant::new("partner status", s)),
        }
    }
}

/// Partner data embedded by the server inside subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartnerRef {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_number: Option<String>,
}

impl From<&Partner> for PartnerRef {
    fn from(p: &Partner) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            merchant_number: Some(p.merchant_number.clone()),
        }
    }
}

/// Request payload for creating or replacing a partner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct PartnerDraft {
    #[validate(length(min = 1, message = "Merchant number is required"))]
    pub merchant_number: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Partner ID is required"))]
    pub partner_id: String,

    #[validate(length(min = 1, message = "Client ID is required"))]
    pub client_id: String,

    #[serde(default)]
    pub status: PartnerStatus,
}

/// Body of `PATCH /partners/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerStatusPatch {
    pub status: PartnerStatus,
}

/// Columns a partner list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerSortKey {
    Id,
    Name,
    MerchantNumber,
    PartnerId,
    Status,
}

impl PartnerSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartnerSortKey::Id => "id",
            PartnerSortKey::Name => "name",
            PartnerSortKey::MerchantNumber => "merchant_number",
            PartnerSortKey::PartnerId => "partner_id",
            PartnerSortKey::Status => "status",
        }
    }
}

impl FromStr for PartnerSortKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(PartnerSortKey::Id),
            "name" => Ok(PartnerSortKey::Name),
            "merchant_number" => Ok(PartnerSortKey::MerchantNumber),
            "partner_id" => Ok(PartnerSortKey::PartnerId),
            "status" => Ok(PartnerSortKey::Status),
            other => Err(UnknownVariant::new("partner sort key", other)),
        }
    }
}

impl Record for Partner {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Partner {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.merchant_number.as_str()),
            Cow::Borrowed(self.partner_id.as_str()),
        ]
    }
}

impl Sortable for Partner {
    type SortKey = PartnerSortKey;

    fn default_sort_key() -> Self::SortKey {
        PartnerSortKey::Name
    }

    fn compare_by(&self, other: &Self, key: Self::SortKey) -> Ordering {
        match key {
            PartnerSortKey::Id => self.id.cmp(&other.id),
            PartnerSortKey::Name => compare_text(&self.name, &other.name),
            PartnerSortKey::MerchantNumber => {
                compare_text(&self.merchant_number, &other.merchant_number)
            }
            PartnerSortKey::PartnerId => compare_text(&self.partner_id, &other.partner_id),
            PartnerSortKey::Status => self.status.as_str().cmp(other.status.as_str()),
        }
    }
}

impl HasStatus for Partner {
    type Status = PartnerStatus;

    fn status(&self) -> PartnerStatus {
        self.status
    }

    fn toggled_status(&self) -> PartnerStatus {
        self.status.toggled()
    }
}

impl Draft for PartnerDraft {
    type Entity = Partner;

    fn from_entity(entity: &Partner) -> Self {
        Self {
            merchant_number: entity.merchant_number.clone(),
            name: entity.name.clone(),
            partner_id: entity.partner_id.clone(),
            client_id: entity.client_id.clone(),
            status: entity.status,
        }
    }
}
