//! Product domain model.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::record::{compare_text, Draft, Record, Searchable, Sortable, UnknownVariant};

/// Represents a product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Product data embedded by the server inside related records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductRef {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Product> for ProductRef {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            description: Some(p.description.clone()),
        }
    }
}

/// Request payload for creating or replacing a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ProductDraft {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: String,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Columns a product list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSortKey {
    Id,
    Name,
    Description,
}

impl ProductSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductSortKey::Id => "id",
            ProductSortKey::Name => "name",
            ProductSortKey::Description => "description",
        }
    }
}

impl FromStr for ProductSortKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(ProductSortKey::Id),
            "name" => Ok(ProductSortKey::Name),
            "description" => Ok(ProductSortKey::Description),
            other => Err(UnknownVariant::new("product sort key", other)),
        }
    }
}

impl Record for Product {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.description.as_str()),
        ]
    }
}

impl Sortable for Product {
    type SortKey = ProductSortKey;

    fn default_sort_key() -> Self::SortKey {
        ProductSortKey::Name
    }

    fn compare_by(&self, other: &Self, key: Self::SortKey) -> Ordering {
        match key {
            ProductSortKey::Id => self.id.cmp(&other.id),
            ProductSortKey::Name => compare_text(&self.name, &other.name),
            ProductSortKey::Description => compare_text(&self.description, &other.description),
        }
    }
}

impl Draft for ProductDraft {
    type Entity = Product;

    fn from_entity(entity: &Product) -> Self {
        Self {
            name: entity.name.clone(),
            description: entity.description.clone(),
        }
    }
}
