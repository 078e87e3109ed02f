//! Client-side list derivation: filter, then sort, then paginate.

use std::fmt;
use std::str::FromStr;

use shared::pagination::{paginate, Page, PageRequest, DEFAULT_PAGE_SIZE};
use shared::search::matches_query;

use crate::models::{Searchable, Sortable, UnknownVariant};

/// Sort direction for list columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(UnknownVariant::new("sort direction", other)),
        }
    }
}

/// Search, sort and page state of one list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<K> {
    query: String,
    sort_key: K,
    direction: SortDirection,
    page: usize,
    page_size: usize,
}

impl<K: Copy + Eq> ListQuery<K> {
    pub fn new(sort_key: K) -> Self {
        Self {
            query: String::new(),
            sort_key,
            direction: SortDirection::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the page size. Zero is treated as 1.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort_key(&self) -> K {
        self.sort_key
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replaces the search text and returns to page 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Sorts by `key` in `direction`. Changing the key returns to page 1.
    pub fn set_sort(&mut self, key: K, direction: SortDirection) {
        if key != self.sort_key {
            self.page = 1;
        }
        self.sort_key = key;
        self.direction = direction;
    }

    /// Column-header behaviour: re-selecting the active key flips direction,
    /// selecting another key sorts it ascending from page 1.
    pub fn toggle_sort(&mut self, key: K) {
        if key == self.sort_key {
            self.direction = self.direction.reversed();
        } else {
            self.set_sort(key, SortDirection::Asc);
        }
    }

    /// Moves to `page` (at least 1). Pages past the end are clamped when the
    /// view is derived.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }
}

/// The rows shown for the current list state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<T> {
    /// Number of records that matched the search before paging.
    pub matched: usize,
    pub page: Page<T>,
}

/// Derives the visible page from `items` and the list state.
///
/// Sorting is stable: records equal on the key and on its tie-break keep their
/// relative order from `items`.
pub fn derive_view<T>(items: &[T], query: &ListQuery<T::SortKey>) -> ListView<T>
where
    T: Searchable + Sortable + Clone,
{
    let mut matched: Vec<T> = items
        .iter()
        .filter(|item| matches_query(&item.search_fields(), query.query()))
        .cloned()
        .collect();

    let key = query.sort_key();
    match query.direction() {
        SortDirection::Asc => {
            matched.sort_by(|a, b| a.compare_by(b, key).then_with(|| a.tie_break(b, key)))
        }
        SortDirection::Desc => {
            matched.sort_by(|a, b| b.compare_by(a, key).then_with(|| a.tie_break(b, key)))
        }
    }

    let request = PageRequest::new(query.page(), query.page_size())
        .unwrap_or_else(|_| PageRequest::first());

    ListView {
        matched: matched.len(),
        page: paginate(&matched, request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Partner, PartnerSortKey, PartnerStatus, Product, ProductEvent, ProductEventSortKey,
        ProductSortKey, Record,
    };
    use fake::faker::company::en::CompanyName;
    use fake::Fake;

    fn product(id: i64, name: &str, description: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    fn partner(id: i64, name: &str, merchant_number: &str, partner_id: &str) -> Partner {
        Partner {
            id,
            merchant_number: merchant_number.to_string(),
            name: name.to_string(),
            partner_id: partner_id.to_string(),
            client_id: format!("C-{id}"),
            status: PartnerStatus::Active,
        }
    }

    fn ids<T: Record>(page: &Page<T>) -> Vec<i64> {
        page.items.iter().map(|item| item.id()).collect()
    }

    #[test]
    fn test_search_matches_any_partner_field_ignoring_case() {
        let partners = vec![
            partner(1, "TechCorp", "M-1", "P-1"),
            partner(2, "Globex", "M-TECH-2", "P-2"),
            partner(3, "Initech", "M-3", "P-3"),
            partner(4, "Umbrella", "M-4", "p-tech-4"),
            partner(5, "Acme", "M-5", "P-5"),
        ];
        let mut query = ListQuery::new(PartnerSortKey::Id);
        query.set_query("tech");

        let view = derive_view(&partners, &query);
        assert_eq!(view.matched, 4);
        assert_eq!(ids(&view.page), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_search_does_not_match_client_id() {
        let partners = vec![partner(1, "Acme", "M-1", "P-1")];
        let mut query = ListQuery::new(PartnerSortKey::Id);
        query.set_query("C-1");

        assert_eq!(derive_view(&partners, &query).matched, 0);
    }

    #[test]
    fn test_sort_is_stable() {
        let products = vec![
            product(1, "Same", "first"),
            product(2, "Another", "x"),
            product(3, "same", "second"),
            product(4, "Same", "third"),
        ];
        let query = ListQuery::new(ProductSortKey::Name);

        let view = derive_view(&products, &query);
        assert_eq!(ids(&view.page), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_sort_descending_is_stable() {
        let products = vec![
            product(1, "B", "first"),
            product(2, "A", "x"),
            product(3, "B", "second"),
        ];
        let mut query = ListQuery::new(ProductSortKey::Name);
        query.set_sort(ProductSortKey::Name, SortDirection::Desc);

        let view = derive_view(&products, &query);
        assert_eq!(ids(&view.page), vec![1, 3, 2]);
    }

    fn mapping(id: i64, order: i64) -> ProductEvent {
        ProductEvent {
            id,
            product_id: 1,
            event_id: id,
            order,
            product: None,
            event: None,
        }
    }

    #[test]
    fn test_duplicate_orders_display_by_id_in_both_directions() {
        let mappings = vec![mapping(6, 2), mapping(5, 2), mapping(7, 1)];
        let mut query = ListQuery::new(ProductEventSortKey::Order);

        assert_eq!(ids(&derive_view(&mappings, &query).page), vec![7, 5, 6]);

        query.set_sort(ProductEventSortKey::Order, SortDirection::Desc);
        assert_eq!(ids(&derive_view(&mappings, &query).page), vec![5, 6, 7]);

        let loaded_first = vec![mapping(5, 2), mapping(6, 2), mapping(7, 1)];
        assert_eq!(ids(&derive_view(&loaded_first, &query).page), vec![5, 6, 7]);
    }

    #[test]
    fn test_pagination_of_25_items() {
        let products: Vec<Product> = (1..=25)
            .map(|id| product(id, &CompanyName().fake::<String>(), "d"))
            .collect();
        let mut query = ListQuery::new(ProductSortKey::Id);

        let view = derive_view(&products, &query);
        assert_eq!(ids(&view.page), (1..=10).collect::<Vec<_>>());
        assert_eq!(view.page.total_pages, 3);

        query.set_page(3);
        let view = derive_view(&products, &query);
        assert_eq!(ids(&view.page), (21..=25).collect::<Vec<_>>());

        query.set_page(4);
        let view = derive_view(&products, &query);
        assert_eq!(view.page.page, 3);
        assert_eq!(view.page.items.len(), 5);
    }

    #[test]
    fn test_changing_query_resets_page() {
        let mut query = ListQuery::new(ProductSortKey::Id);
        query.set_page(3);
        query.set_query("plan");
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_changing_sort_key_resets_page() {
        let mut query = ListQuery::new(ProductSortKey::Id);
        query.set_page(2);
        query.set_sort(ProductSortKey::Id, SortDirection::Desc);
        assert_eq!(query.page(), 2);

        query.set_sort(ProductSortKey::Name, SortDirection::Desc);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_toggle_sort() {
        let mut query = ListQuery::new(ProductSortKey::Name);
        query.toggle_sort(ProductSortKey::Name);
        assert_eq!(query.direction(), SortDirection::Desc);

        query.toggle_sort(ProductSortKey::Description);
        assert_eq!(query.sort_key(), ProductSortKey::Description);
        assert_eq!(query.direction(), SortDirection::Asc);
    }

    #[test]
    fn test_page_floor_and_page_size() {
        let mut query = ListQuery::new(ProductSortKey::Id).with_page_size(0);
        assert_eq!(query.page_size(), 1);
        query.set_page(0);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_sort_direction_from_str() {
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("up".parse::<SortDirection>().is_err());
    }
}
