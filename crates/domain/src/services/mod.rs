//! Domain services for the catalog console.
//!
//! Services contain the client-side logic that operates on domain models.

pub mod form;
pub mod listing;
pub mod notification;
pub mod resolution;

pub use form::{EntityForm, FieldErrors, FormMode, StatusField};

pub use listing::{derive_view, ListQuery, ListView, SortDirection};

pub use notification::{
    ChannelNotifier, Notification, NotificationVariant, Notifier, RecordingNotifier,
    TracingNotifier,
};

pub use resolution::{
    group_by_product, order_position, CatalogIndex, OrderPosition, ProductGroup,
};
