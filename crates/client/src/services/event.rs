//! Event service.

use std::borrow::Cow;

use domain::models::{Event, EventDraft};

use super::{ResourceService, Resource, RestEntity};

pub type EventService = ResourceService<Event>;

impl RestEntity for Event {
    const RESOURCE: Resource = Resource {
        path: "/events",
        key: "events",
        singular: "event",
        plural: "events",
        subject: "event",
    };

    type Draft = EventDraft;

    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}
