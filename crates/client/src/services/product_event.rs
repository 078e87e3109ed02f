//! Product-event mapping service.

use std::borrow::Cow;

use async_trait::async_trait;
use domain::models::{ProductEvent, ProductEventDraft, ProductEventOrderPatch};
use domain::services::resolution::{
    product_event_event_name, product_event_label, product_event_product_name,
};

use super::{OrderMutator, ResourceService, Resource, RestEntity};
use crate::error::ServiceError;

pub type ProductEventService = ResourceService<ProductEvent>;

impl RestEntity for ProductEvent {
    const RESOURCE: Resource = Resource {
        path: "/product-events",
        key: "product_events",
        singular: "product event",
        plural: "product events",
        subject: "product event mapping",
    };

    type Draft = ProductEventDraft;

    fn display_name(&self) -> Cow<'_, str> {
        Cow::Owned(product_event_label(self))
    }

    fn delete_prompt(&self) -> String {
        format!(
            "Are you sure you want to remove the mapping between \"{}\" and \"{}\"?",
            product_event_product_name(self),
            product_event_event_name(self)
        )
    }
}

#[async_trait]
impl OrderMutator for ProductEventService {
    async fn update_order(&self, id: i64, order: i64) -> Result<ProductEvent, ServiceError> {
        self.patch(
            "update_order",
            format!("{}/order", ProductEvent::RESOURCE.item_path(id)),
            &ProductEventOrderPatch { order },
            "Product event order updated successfully".to_string(),
            "Failed to update product event order".to_string(),
        )
        .await
    }
}

impl ProductEventService {
    /// Mappings attached to one product.
    pub async fn list_by_product(&self, product_id: i64) -> Result<Vec<ProductEvent>, ServiceError> {
        self.list_at(
            "list_by_product",
            format!("/products/{}/events", product_id),
            ProductEvent::RESOURCE.fetch_all_failed(),
        )
        .await
    }
}
