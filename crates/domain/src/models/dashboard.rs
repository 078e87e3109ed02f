//! Dashboard summary models.

use serde::Serialize;

use super::subscription::{Subscription, SubscriptionStatus};

/// Headline counts shown on the dashboard.
///
/// Each count is loaded independently; `None` means that list failed to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardStats {
    pub products: Option<usize>,
    pub events: Option<usize>,
    pub partners: Option<usize>,
    pub active_subscriptions: Option<usize>,
}

/// One summary card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardCard {
    pub title: &'static str,
    pub value: String,
    pub description: &'static str,
    pub href: &'static str,
}

/// Counts subscriptions whose status is ACTIVE.
pub fn count_active(subscriptions: &[Subscription]) -> usize {
    subscriptions
        .iter()
        .filter(|s| s.status == SubscriptionStatus::Active)
        .count()
}

impl DashboardStats {
    /// Whether every count loaded.
    pub fn is_complete(&self) -> bool {
        self.products.is_some()
            && self.events.is_some()
            && self.partners.is_some()
            && self.active_subscriptions.is_some()
    }

    /// Renders the four summary cards. Counts that failed to load show as 0.
    pub fn cards(&self) -> Vec<DashboardCard> {
        let value = |count: Option<usize>| count.unwrap_or(0).to_string();

        vec![
            DashboardCard {
                title: "Total Products",
                value: value(self.products),
                description: "Active products in system",
                href: "/products",
            },
            DashboardCard {
                title: "Total Events",
                value: value(self.events),
                description: "Available events",
                href: "/events",
            },
            DashboardCard {
                title: "Partners",
                value: value(self.partners),
                description: "Registered partners",
                href: "/partners",
            },
            DashboardCard {
                title: "Active Subscriptions",
                value: value(self.active_subscriptions),
                description: "Partner subscriptions",
                href: "/subscriptions",
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(id: i64, status: SubscriptionStatus) -> Subscription {
        Subscription {
            id,
            partner_id: 1,
            product_event_id: 1,
            status,
            partner: None,
            product_event: None,
        }
    }

    #[test]
    fn test_count_active() {
        let subs = vec![
            subscription(1, SubscriptionStatus::Active),
            subscription(2, SubscriptionStatus::Inactive),
            subscription(3, SubscriptionStatus::Active),
        ];
        assert_eq!(count_active(&subs), 2);
    }

    #[test]
    fn test_cards_render_counts() {
        let stats = DashboardStats {
            products: Some(3),
            events: Some(5),
            partners: Some(2),
            active_subscriptions: Some(1),
        };
        assert!(stats.is_complete());

        let cards = stats.cards();
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].title, "Total Products");
        assert_eq!(cards[0].value, "3");
        assert_eq!(cards[3].href, "/subscriptions");
        assert_eq!(cards[3].value, "1");
    }

    #[test]
    fn test_failed_counts_render_as_zero() {
        let stats = DashboardStats {
            products: Some(3),
            ..Default::default()
        };
        assert!(!stats.is_complete());

        let cards = stats.cards();
        assert_eq!(cards[0].value, "3");
        assert_eq!(cards[1].value, "0");
        assert_eq!(cards[2].value, "0");
    }
}
