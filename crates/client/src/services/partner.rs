//! Partner service.

use std::borrow::Cow;

use async_trait::async_trait;
use domain::models::{Partner, PartnerDraft, PartnerStatus, PartnerStatusPatch};

use super::{ResourceService, Resource, RestEntity, StatusMutator};
use crate::error::ServiceError;

pub type PartnerService = ResourceService<Partner>;

impl RestEntity for Partner {
    const RESOURCE: Resource = Resource {
        path: "/partners",
        key: "partners",
        singular: "partner",
        plural: "partners",
        subject: "partner",
    };

    type Draft = PartnerDraft;

    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

#[async_trait]
impl StatusMutator for PartnerService {
    type Status = PartnerStatus;

    async fn update_status(&self, id: i64, status: PartnerStatus) -> Result<Partner, ServiceError> {
        self.patch(
            "update_status",
            format!("{}/status", Partner::RESOURCE.item_path(id)),
            &PartnerStatusPatch { status },
            format!("Partner {} successfully", status.as_str().to_lowercase()),
            "Failed to update partner status".to_string(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::service;
    use crate::transport::{MockReply, MockTransport};
    use reqwest::Method;
    use serde_json::json;

    fn partner_json(status: &str) -> serde_json::Value {
        json!({
            "id": 4,
            "merchant_number": "M-1",
            "name": "Acme",
            "partner_id": "P-1",
            "client_id": "C-1",
            "status": status
        })
    }

    #[tokio::test]
    async fn test_status_patch_sends_only_status() {
        let transport =
            MockTransport::new().ok(Method::PATCH, "/partners/4/status", partner_json("Inactive"));
        let (service, transport, notifier) = service::<Partner>(transport);

        let partner = service
            .update_status(4, PartnerStatus::Inactive)
            .await
            .unwrap();
        assert_eq!(partner.status, PartnerStatus::Inactive);

        let sent = &transport.requests()[0];
        assert_eq!(sent.body, Some(json!({"status": "Inactive"})));
        assert_eq!(
            notifier.last().unwrap().description,
            "Partner inactive successfully"
        );
    }

    #[tokio::test]
    async fn test_status_patch_failure() {
        let transport = MockTransport::new().on(
            Method::PATCH,
            "/partners/4/status",
            MockReply::Status(400, json!({"message": "bad status"})),
        );
        let (service, _, notifier) = service::<Partner>(transport);

        assert!(service.update_status(4, PartnerStatus::Active).await.is_err());
        assert_eq!(
            notifier.last().unwrap().description,
            "Failed to update partner status"
        );
    }
}
