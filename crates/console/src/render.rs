//! Plain-text rendering of records, pages and the dashboard.

use domain::models::{DashboardStats, Event, Partner, Product, ProductEvent, Subscription};
use domain::services::resolution::{
    product_event_event_name, product_event_product_name, subscription_event_name,
    subscription_partner_name, subscription_product_name,
};
use domain::services::{ListView, ProductGroup};

/// A record shown as one table row.
pub trait Row {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl Row for Product {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Description"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.description.clone()]
    }
}

impl Row for Event {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Description"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.description.clone()]
    }
}

impl Row for Partner {
    const HEADERS: &'static [&'static str] =
        &["ID", "Merchant #", "Name", "Partner ID", "Client ID", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.merchant_number.clone(),
            self.name.clone(),
            self.partner_id.clone(),
            self.client_id.clone(),
            self.status.to_string(),
        ]
    }
}

impl Row for ProductEvent {
    const HEADERS: &'static [&'static str] = &["ID", "Product", "Event", "Order"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            product_event_product_name(self).into_owned(),
            product_event_event_name(self).into_owned(),
            self.order.to_string(),
        ]
    }
}

impl Row for Subscription {
    const HEADERS: &'static [&'static str] = &["ID", "Partner", "Product", "Event", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            subscription_partner_name(self).into_owned(),
            subscription_product_name(self).into_owned(),
            subscription_event_name(self).into_owned(),
            self.status.to_string(),
        ]
    }
}

/// Left-aligned columns separated by two spaces.
pub fn table<R: Row>(rows: &[R]) -> String {
    let body: Vec<Vec<String>> = rows.iter().map(Row::cells).collect();

    let mut widths: Vec<usize> = R::HEADERS.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let headers: Vec<String> = R::HEADERS.iter().map(|h| h.to_string()).collect();
    let mut lines = vec![line(&headers)];
    lines.extend(body.iter().map(|cells| line(cells)));
    lines.join("\n")
}

/// Table of the visible page plus a page summary.
pub fn view<R: Row>(view: &ListView<R>) -> String {
    if view.matched == 0 {
        return "No records found".to_string();
    }
    format!(
        "{}\n\nPage {} of {} ({} matching)",
        table(&view.page.items),
        view.page.page,
        view.page.total_pages,
        view.matched
    )
}

pub fn dashboard(stats: &DashboardStats) -> String {
    stats
        .cards()
        .iter()
        .map(|card| format!("{:<22}{:>6}  {}", card.title, card.value, card.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mappings listed under their product, in display order.
pub fn groups(groups: &[ProductGroup]) -> String {
    if groups.is_empty() {
        return "No records found".to_string();
    }
    groups
        .iter()
        .map(|group| {
            let mut lines = vec![format!("{} (#{})", group.product_name, group.product_id)];
            lines.extend(group.mappings.iter().map(|pe| {
                format!(
                    "  {}. {} [mapping {}]",
                    pe.order,
                    product_event_event_name(pe),
                    pe.id
                )
            }));
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::SubscriptionStatus;
    use domain::services::group_by_product;
    use shared::pagination::{paginate, PageRequest};

    fn product(id: i64, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: "Entry tier".to_string(),
        }
    }

    #[test]
    fn test_table_aligns_columns() {
        let rendered = table(&[product(7, "Basic Plan"), product(12, "Pro")]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ID  Name        Description");
        assert_eq!(lines[1], "7   Basic Plan  Entry tier");
        assert_eq!(lines[2], "12  Pro         Entry tier");
    }

    #[test]
    fn test_view_footer() {
        let items: Vec<Product> = (1..=12).map(|id| product(id, "P")).collect();
        let request = PageRequest::new(2, 10).unwrap();
        let rendered = view(&ListView {
            matched: 12,
            page: paginate(&items, request),
        });
        assert!(rendered.ends_with("Page 2 of 2 (12 matching)"));
    }

    #[test]
    fn test_empty_view() {
        let rendered = view::<Product>(&ListView {
            matched: 0,
            page: paginate(&[], PageRequest::first()),
        });
        assert_eq!(rendered, "No records found");
    }

    #[test]
    fn test_subscription_row_uses_fallbacks() {
        let sub = Subscription {
            id: 8,
            partner_id: 4,
            product_event_id: 5,
            status: SubscriptionStatus::Active,
            partner: None,
            product_event: None,
        };
        assert_eq!(
            sub.cells(),
            vec!["8", "Partner 4", "Unknown Product", "Unknown Event", "ACTIVE"]
        );
    }

    #[test]
    fn test_dashboard_lists_four_cards() {
        let rendered = dashboard(&DashboardStats {
            products: Some(3),
            ..Default::default()
        });
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Total Products"));
        assert!(lines[0].contains(" 3  Active products in system"));
        assert!(lines[1].contains(" 0  Available events"));
    }

    #[test]
    fn test_groups() {
        let mapping = |id, product_id, order| ProductEvent {
            id,
            product_id,
            event_id: id,
            order,
            product: None,
            event: None,
        };
        let rendered = groups(&group_by_product(&[mapping(2, 1, 2), mapping(1, 1, 1)]));
        assert_eq!(
            rendered,
            "Product 1 (#1)\n  1. Event 1 [mapping 1]\n  2. Event 2 [mapping 2]"
        );
    }
}
