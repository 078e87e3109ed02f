//! Subscription service.

use std::borrow::Cow;

use async_trait::async_trait;
use domain::models::{Subscription, SubscriptionDraft, SubscriptionStatus, SubscriptionStatusPatch};
use domain::services::resolution::{
    subscription_event_name, subscription_partner_name, subscription_product_name,
};

use super::{ResourceService, Resource, RestEntity, StatusMutator};
use crate::error::ServiceError;

pub type SubscriptionService = ResourceService<Subscription>;

impl RestEntity for Subscription {
    const RESOURCE: Resource = Resource {
        path: "/subscriptions",
        key: "subscriptions",
        singular: "subscription",
        plural: "subscriptions",
        subject: "subscription",
    };

    type Draft = SubscriptionDraft;

    fn display_name(&self) -> Cow<'_, str> {
        Cow::Owned(format!(
            "{}: {} — {}",
            subscription_partner_name(self),
            subscription_product_name(self),
            subscription_event_name(self)
        ))
    }

    fn delete_prompt(&self) -> String {
        "Are you sure you want to delete this subscription? This action cannot be undone."
            .to_string()
    }
}

#[async_trait]
impl StatusMutator for SubscriptionService {
    type Status = SubscriptionStatus;

    async fn update_status(
        &self,
        id: i64,
        status: SubscriptionStatus,
    ) -> Result<Subscription, ServiceError> {
        self.patch(
            "update_status",
            format!("{}/status", Subscription::RESOURCE.item_path(id)),
            &SubscriptionStatusPatch { status },
            format!("Subscription {} successfully", status.as_str().to_lowercase()),
            "Failed to update subscription status".to_string(),
        )
        .await
    }
}

impl SubscriptionService {
    /// Subscriptions held by one partner.
    pub async fn list_by_partner(&self, partner_id: i64) -> Result<Vec<Subscription>, ServiceError> {
        self.list_at(
            "list_by_partner",
            format!("/partners/{}/subscriptions", partner_id),
            "Failed to fetch partner subscriptions".to_string(),
        )
        .await
    }
}
