//! Entity services.
//!
//! One service per entity, all sharing [`ResourceService`]. Every call reports
//! its outcome through the [`Notifier`] and returns the error unchanged.

pub mod event;
pub mod partner;
pub mod product;
pub mod product_event;
pub mod subscription;

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use domain::models::{Draft, Record, Searchable, Sortable};
use domain::services::{Notification, Notifier};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::error::ServiceError;
use crate::metrics::RequestTimer;
use crate::transport::{ApiRequest, Transport};

pub use event::EventService;
pub use partner::PartnerService;
pub use product::ProductService;
pub use product_event::ProductEventService;
pub use subscription::SubscriptionService;

/// Where an entity lives on the API and how it is named in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Collection path, e.g. `/product-events`.
    pub path: &'static str,
    /// Metric and log label.
    pub key: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
    /// Noun used in create/update/delete messages.
    pub subject: &'static str,
}

impl Resource {
    pub fn item_path(&self, id: i64) -> String {
        format!("{}/{}", self.path, id)
    }

    pub fn fetch_all_failed(&self) -> String {
        format!("Failed to fetch {}", self.plural)
    }

    pub fn fetch_one_failed(&self) -> String {
        format!("Failed to fetch {}", self.singular)
    }

    /// `"Product created successfully"`
    pub fn mutated(&self, verb: &str) -> String {
        format!("{} {} successfully", capitalize(self.subject), verb)
    }

    /// `"Failed to create product"`
    pub fn mutation_failed(&self, verb: &str) -> String {
        format!("Failed to {} {}", verb, self.subject)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// An entity served by a REST collection.
pub trait RestEntity: Record + Searchable + Sortable + DeserializeOwned {
    const RESOURCE: Resource;

    type Draft: Draft<Entity = Self>;

    /// Name shown to the user when referring to this record.
    fn display_name(&self) -> Cow<'_, str>;

    /// Confirmation text shown before deleting this record.
    fn delete_prompt(&self) -> String {
        format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            self.display_name()
        )
    }
}

pub type DraftOf<E> = <E as RestEntity>::Draft;

/// CRUD contract shared by every entity service.
#[async_trait]
pub trait EntityService: Send + Sync {
    type Entity: RestEntity;

    async fn list(&self) -> Result<Vec<Self::Entity>, ServiceError>;

    async fn get(&self, id: i64) -> Result<Self::Entity, ServiceError>;

    async fn create(&self, draft: &DraftOf<Self::Entity>) -> Result<Self::Entity, ServiceError>;

    /// Full-record replace.
    async fn update(
        &self,
        id: i64,
        draft: &DraftOf<Self::Entity>,
    ) -> Result<Self::Entity, ServiceError>;

    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

/// Narrow status patch.
#[async_trait]
pub trait StatusMutator: EntityService {
    type Status: Copy + fmt::Display + Send + Sync + 'static;

    async fn update_status(
        &self,
        id: i64,
        status: Self::Status,
    ) -> Result<Self::Entity, ServiceError>;
}

/// Narrow order patch.
#[async_trait]
pub trait OrderMutator: EntityService {
    async fn update_order(&self, id: i64, order: i64) -> Result<Self::Entity, ServiceError>;
}

/// Generic REST service for one entity type.
pub struct ResourceService<E> {
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for ResourceService<E> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            notifier: Arc::clone(&self.notifier),
            _entity: PhantomData,
        }
    }
}

impl<E: RestEntity> ResourceService<E> {
    pub fn new(transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
            _entity: PhantomData,
        }
    }

    /// Sends a request and returns the body of a 2xx response.
    async fn call(&self, operation: &'static str, request: ApiRequest) -> Result<Value, ServiceError> {
        let timer = RequestTimer::new(E::RESOURCE.key, operation);
        let result = match self.transport.send(request).await {
            Ok(response) if response.is_success() => Ok(response.body),
            Ok(response) => Err(ServiceError::from_status(response.status, &response.body)),
            Err(e) => Err(e),
        };
        timer.finish(result.is_ok());
        result
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: ApiRequest,
    ) -> Result<T, ServiceError> {
        let body = self.call(operation, request).await?;
        serde_json::from_value(body).map_err(ServiceError::decode)
    }

    /// Emits the one notification for a finished call and passes the result on.
    fn report<T>(
        &self,
        operation: &'static str,
        result: Result<T, ServiceError>,
        success: Option<String>,
        failure: String,
    ) -> Result<T, ServiceError> {
        match &result {
            Ok(_) => {
                if let Some(description) = success {
                    self.notifier
                        .notify(Notification::success("Success", description));
                }
            }
            Err(e) => {
                error!(
                    resource = E::RESOURCE.key,
                    operation = operation,
                    error = %e,
                    "{}",
                    failure
                );
                self.notifier
                    .notify(Notification::destructive("Error", failure));
            }
        }
        result
    }

    /// GET returning a list, notifying only on failure.
    pub(crate) async fn list_at(
        &self,
        operation: &'static str,
        path: String,
        failure: String,
    ) -> Result<Vec<E>, ServiceError> {
        let result = self.fetch(operation, ApiRequest::get(path)).await;
        self.report(operation, result, None, failure)
    }

    /// PATCH with a narrow body.
    pub(crate) async fn patch<B: Serialize>(
        &self,
        operation: &'static str,
        path: String,
        body: &B,
        success: String,
        failure: String,
    ) -> Result<E, ServiceError> {
        let result = match to_body(body) {
            Ok(body) => self.fetch(operation, ApiRequest::patch(path, body)).await,
            Err(e) => Err(e),
        };
        self.report(operation, result, Some(success), failure)
    }
}

fn to_body<B: Serialize>(body: &B) -> Result<Value, ServiceError> {
    serde_json::to_value(body)
        .map_err(|e| ServiceError::Transport(format!("Invalid request body: {}", e)))
}

#[async_trait]
impl<E: RestEntity> EntityService for ResourceService<E> {
    type Entity = E;

    async fn list(&self) -> Result<Vec<E>, ServiceError> {
        self.list_at(
            "list",
            E::RESOURCE.path.to_string(),
            E::RESOURCE.fetch_all_failed(),
        )
        .await
    }

    async fn get(&self, id: i64) -> Result<E, ServiceError> {
        let result = self
            .fetch("get", ApiRequest::get(E::RESOURCE.item_path(id)))
            .await;
        self.report("get", result, None, E::RESOURCE.fetch_one_failed())
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, ServiceError> {
        let result = match to_body(draft) {
            Ok(body) => {
                self.fetch("create", ApiRequest::post(E::RESOURCE.path, body))
                    .await
            }
            Err(e) => Err(e),
        };
        self.report(
            "create",
            result,
            Some(E::RESOURCE.mutated("created")),
            E::RESOURCE.mutation_failed("create"),
        )
    }

    async fn update(&self, id: i64, draft: &E::Draft) -> Result<E, ServiceError> {
        let result = match to_body(draft) {
            Ok(body) => {
                self.fetch("update", ApiRequest::put(E::RESOURCE.item_path(id), body))
                    .await
            }
            Err(e) => Err(e),
        };
        self.report(
            "update",
            result,
            Some(E::RESOURCE.mutated("updated")),
            E::RESOURCE.mutation_failed("update"),
        )
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let result = self
            .call("delete", ApiRequest::delete(E::RESOURCE.item_path(id)))
            .await
            .map(|_| ());
        self.report(
            "delete",
            result,
            Some(E::RESOURCE.mutated("deleted")),
            E::RESOURCE.mutation_failed("delete"),
        )
    }
}

/// All five entity services over one transport and notifier.
#[derive(Clone)]
pub struct CatalogClient {
    pub products: ProductService,
    pub events: EventService,
    pub partners: PartnerService,
    pub product_events: ProductEventService,
    pub subscriptions: SubscriptionService,
}

impl CatalogClient {
    pub fn new(transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            products: ResourceService::new(Arc::clone(&transport), Arc::clone(&notifier)),
            events: ResourceService::new(Arc::clone(&transport), Arc::clone(&notifier)),
            partners: ResourceService::new(Arc::clone(&transport), Arc::clone(&notifier)),
            product_events: ResourceService::new(Arc::clone(&transport), Arc::clone(&notifier)),
            subscriptions: ResourceService::new(transport, notifier),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: Resource = Resource {
        path: "/product-events",
        key: "product_events",
        singular: "product event",
        plural: "product events",
        subject: "product event mapping",
    };

    #[test]
    fn test_resource_messages() {
        assert_eq!(SAMPLE.item_path(4), "/product-events/4");
        assert_eq!(SAMPLE.fetch_all_failed(), "Failed to fetch product events");
        assert_eq!(SAMPLE.fetch_one_failed(), "Failed to fetch product event");
        assert_eq!(
            SAMPLE.mutated("created"),
            "Product event mapping created successfully"
        );
        assert_eq!(
            SAMPLE.mutation_failed("delete"),
            "Failed to delete product event mapping"
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("partner"), "Partner");
        assert_eq!(capitalize(""), "");
    }
}
