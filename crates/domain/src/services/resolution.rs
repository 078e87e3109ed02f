//! Relationship resolution.
//!
//! Follows foreign keys to human-readable names. Related data is optional on
//! every record (not yet loaded, or deleted upstream), so every resolver has a
//! fallback label and never fails.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::models::{
    Event, EventRef, Partner, PartnerRef, Product, ProductEvent, ProductEventRef, ProductRef,
    Subscription,
};

pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const UNKNOWN_EVENT: &str = "Unknown Event";

fn product_placeholder(id: i64) -> Cow<'static, str> {
    Cow::Owned(format!("Product {id}"))
}

fn event_placeholder(id: i64) -> Cow<'static, str> {
    Cow::Owned(format!("Event {id}"))
}

fn partner_placeholder(id: i64) -> Cow<'static, str> {
    Cow::Owned(format!("Partner {id}"))
}

/// Product name of a mapping, or `"Product {product_id}"`.
pub fn product_event_product_name(pe: &ProductEvent) -> Cow<'_, str> {
    match &pe.product {
        Some(product) => Cow::Borrowed(product.name.as_str()),
        None => product_placeholder(pe.product_id),
    }
}

/// Event name of a mapping, or `"Event {event_id}"`.
pub fn product_event_event_name(pe: &ProductEvent) -> Cow<'_, str> {
    match &pe.event {
        Some(event) => Cow::Borrowed(event.name.as_str()),
        None => event_placeholder(pe.event_id),
    }
}

/// `"Product — Event"` label used when picking a mapping for a subscription.
pub fn product_event_label(pe: &ProductEvent) -> String {
    format!(
        "{} — {}",
        product_event_product_name(pe),
        product_event_event_name(pe)
    )
}

/// Product name reached through the subscription's product event.
pub fn subscription_product_name(sub: &Subscription) -> Cow<'_, str> {
    match &sub.product_event {
        Some(ProductEventRef {
            product: Some(product),
            ..
        }) => Cow::Borrowed(product.name.as_str()),
        Some(ProductEventRef {
            product_id: Some(id),
            ..
        }) => product_placeholder(*id),
        _ => Cow::Borrowed(UNKNOWN_PRODUCT),
    }
}

/// Event name reached through the subscription's product event.
pub fn subscription_event_name(sub: &Subscription) -> Cow<'_, str> {
    match &sub.product_event {
        Some(ProductEventRef {
            event: Some(event), ..
        }) => Cow::Borrowed(event.name.as_str()),
        Some(ProductEventRef {
            event_id: Some(id), ..
        }) => event_placeholder(*id),
        _ => Cow::Borrowed(UNKNOWN_EVENT),
    }
}

/// Partner name of a subscription, or `"Partner {partner_id}"`.
pub fn subscription_partner_name(sub: &Subscription) -> Cow<'_, str> {
    match &sub.partner {
        Some(partner) => Cow::Borrowed(partner.name.as_str()),
        None => partner_placeholder(sub.partner_id),
    }
}

/// Lookup tables built from loaded lists, used to fill in nested data the
/// server did not embed.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    products: HashMap<i64, ProductRef>,
    events: HashMap<i64, EventRef>,
    partners: HashMap<i64, PartnerRef>,
    product_events: HashMap<i64, ProductEvent>,
}

impl CatalogIndex {
    pub fn new(
        products: &[Product],
        events: &[Event],
        partners: &[Partner],
        product_events: &[ProductEvent],
    ) -> Self {
        Self {
            products: products.iter().map(|p| (p.id, ProductRef::from(p))).collect(),
            events: events.iter().map(|e| (e.id, EventRef::from(e))).collect(),
            partners: partners.iter().map(|p| (p.id, PartnerRef::from(p))).collect(),
            product_events: product_events.iter().map(|pe| (pe.id, pe.clone())).collect(),
        }
    }

    /// Fills missing `product`/`event` data on a mapping.
    pub fn hydrate_product_event(&self, pe: &mut ProductEvent) {
        if pe.product.is_none() {
            pe.product = self.products.get(&pe.product_id).cloned();
        }
        if pe.event.is_none() {
            pe.event = self.events.get(&pe.event_id).cloned();
        }
    }

    /// Fills missing `partner`/`product_event` data on a subscription.
    pub fn hydrate_subscription(&self, sub: &mut Subscription) {
        if sub.partner.is_none() {
            sub.partner = self.partners.get(&sub.partner_id).cloned();
        }
        if sub.product_event.is_none() {
            sub.product_event = self.product_events.get(&sub.product_event_id).map(|pe| {
                let mut pe = pe.clone();
                self.hydrate_product_event(&mut pe);
                ProductEventRef::from(&pe)
            });
        }
    }
}

/// Rank of a mapping among the mappings of the same product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPosition {
    /// 0-based rank in display order.
    pub index: usize,
    /// Number of mappings sharing the product.
    pub count: usize,
}

impl OrderPosition {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }
}

fn sort_by_rank(mappings: &mut [ProductEvent]) {
    mappings.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
}

/// Where `target_id` sits within its product's ranking.
pub fn order_position(items: &[ProductEvent], target_id: i64) -> Option<OrderPosition> {
    let target = items.iter().find(|pe| pe.id == target_id)?;
    let mut siblings: Vec<ProductEvent> = items
        .iter()
        .filter(|pe| pe.product_id == target.product_id)
        .cloned()
        .collect();
    sort_by_rank(&mut siblings);

    let index = siblings.iter().position(|pe| pe.id == target_id)?;
    Some(OrderPosition {
        index,
        count: siblings.len(),
    })
}

/// Mappings of one product in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductGroup {
    pub product_id: i64,
    pub product_name: String,
    pub mappings: Vec<ProductEvent>,
}

/// Groups mappings by product, keeping products in first-seen order.
pub fn group_by_product(items: &[ProductEvent]) -> Vec<ProductGroup> {
    let mut groups: Vec<ProductGroup> = Vec::new();

    for pe in items {
        match groups.iter_mut().find(|g| g.product_id == pe.product_id) {
            Some(group) => group.mappings.push(pe.clone()),
            None => groups.push(ProductGroup {
                product_id: pe.product_id,
                product_name: product_event_product_name(pe).into_owned(),
                mappings: vec![pe.clone()],
            }),
        }
    }

    for group in &mut groups {
        sort_by_rank(&mut group.mappings);
    }
    groups
}
