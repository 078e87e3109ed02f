//! Product service.

use std::borrow::Cow;

use domain::models::{Product, ProductDraft};

use super::{ResourceService, Resource, RestEntity};

pub type ProductService = ResourceService<Product>;

impl RestEntity for Product {
    const RESOURCE: Resource = Resource {
        path: "/products",
        key: "products",
        singular: "product",
        plural: "products",
        subject: "product",
    };

    type Draft = ProductDraft;

    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}
