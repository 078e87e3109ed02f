//! Domain models for the catalog console.

pub mod dashboard;
pub mod event;
pub mod partner;
pub mod product;
pub mod product_event;
pub mod record;
pub mod subscription;

pub use dashboard::{DashboardCard, DashboardStats};
pub use event::{Event, EventDraft, EventRef, EventSortKey};
pub use partner::{
    Partner, PartnerDraft, PartnerRef, PartnerSortKey, PartnerStatus, PartnerStatusPatch,
};
pub use product::{Product, ProductDraft, ProductRef, ProductSortKey};
pub use product_event::{
    OrderDirection, ProductEvent, ProductEventDraft, ProductEventOrderPatch, ProductEventRef,
    ProductEventSortKey,
};
pub use record::{Draft, HasStatus, Record, Searchable, Sortable, UnknownVariant};
pub use subscription::{
    Subscription, SubscriptionDraft, SubscriptionSortKey, SubscriptionStatus,
    SubscriptionStatusPatch,
};
