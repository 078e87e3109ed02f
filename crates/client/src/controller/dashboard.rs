//! Dashboard loading.

use domain::models::dashboard::count_active;
use domain::models::DashboardStats;
use tracing::warn;

use crate::services::{CatalogClient, EntityService};

/// Loads the four dashboard lists concurrently.
///
/// Each count is reconciled on its own: a failed list leaves only its count
/// empty.
pub async fn load_dashboard(client: &CatalogClient) -> DashboardStats {
    let (products, events, partners, subscriptions) = tokio::join!(
        client.products.list(),
        client.events.list(),
        client.partners.list(),
        client.subscriptions.list()
    );

    let stats = DashboardStats {
        products: products.as_ref().ok().map(Vec::len),
        events: events.as_ref().ok().map(Vec::len),
        partners: partners.as_ref().ok().map(Vec::len),
        active_subscriptions: subscriptions.as_deref().ok().map(count_active),
    };

    if !stats.is_complete() {
        warn!(?stats, "Dashboard loaded with missing counts");
    }
    stats
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::transport::{MockReply, MockTransport};
    use domain::services::RecordingNotifier;
    use reqwest::Method;
    use serde_json::json;

    fn client(transport: MockTransport) -> (CatalogClient, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let client = CatalogClient::new(Arc::new(transport), Arc::new(notifier.clone()));
        (client, notifier)
    }

    #[tokio::test]
    async fn test_counts_all_lists() {
        let transport = MockTransport::new()
            .ok(
                Method::GET,
                "/products",
                json!([{"id": 1, "name": "A", "description": "a"}]),
            )
            .ok(Method::GET, "/events", json!([]))
            .ok(
                Method::GET,
                "/partners",
                json!([{"id": 1, "merchant_number": "M", "name": "Acme",
                        "partner_id": "P", "client_id": "C", "status": "Active"}]),
            )
            .ok(
                Method::GET,
                "/subscriptions",
                json!([
                    {"id": 1, "partner_id": 1, "product_event_id": 1, "status": "ACTIVE"},
                    {"id": 2, "partner_id": 1, "product_event_id": 2, "status": "INACTIVE"},
                    {"id": 3, "partner_id": 1, "product_event_id": 3, "status": "ACTIVE"}
                ]),
            );
        let (client, notifier) = client(transport);

        let stats = load_dashboard(&client).await;
        assert_eq!(
            stats,
            DashboardStats {
                products: Some(1),
                events: Some(0),
                partners: Some(1),
                active_subscriptions: Some(2),
            }
        );
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_failed_list_only_blanks_its_count() {
        let transport = MockTransport::new()
            .ok(Method::GET, "/products", json!([]))
            .on(Method::GET, "/events", MockReply::Status(500, json!(null)))
            .ok(Method::GET, "/partners", json!([]))
            .ok(Method::GET, "/subscriptions", json!([]));
        let (client, notifier) = client(transport);

        let stats = load_dashboard(&client).await;
        assert_eq!(stats.products, Some(0));
        assert_eq!(stats.events, None);
        assert_eq!(stats.active_subscriptions, Some(0));
        assert_eq!(stats.cards()[1].value, "0");

        assert_eq!(notifier.len(), 1);
        assert_eq!(
            notifier.last().unwrap().description,
            "Failed to fetch events"
        );
    }
}
