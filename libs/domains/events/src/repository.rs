//! Event repository trait

use crate::error::Result;
use crate::filter::EventCriteria;
use crate::models::{Event, EventInput, Location, UpdateSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Storage contract shared by every event store.
///
/// Unless stated otherwise, multi-event results come back in no particular
/// order. Storage failures are returned unchanged.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a new event, assigning its id and creation stamp
    async fn add(&self, input: EventInput) -> Result<Event>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Event>>;

    /// First event at exactly these coordinates on exactly this instant
    async fn find_by_location_and_date(
        &self,
        location: &Location,
        date: DateTime<Utc>,
    ) -> Result<Option<Event>>;

    async fn find_by_city(&self, city: &str) -> Result<Vec<Event>>;

    async fn find_by_category(&self, category: &str) -> Result<Vec<Event>>;

    /// Events whose title contains `name`, ignoring case
    async fn find_by_name(&self, name: &str) -> Result<Vec<Event>>;

    /// Events matching every criterion present
    async fn filter_by(&self, criteria: &EventCriteria) -> Result<Vec<Event>>;

    /// Up to four events dated within one month of `date`, earliest first
    async fn find_main(&self, date: DateTime<Utc>) -> Result<Vec<Event>>;

    /// Replace every caller-supplied field of the event with `id`
    async fn update(&self, id: &Uuid, input: EventInput) -> Result<UpdateSummary>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub EventRepository {}

        #[async_trait]
        impl EventRepository for EventRepository {
            async fn add(&self, input: EventInput) -> Result<Event>;
            async fn find_by_id(&self, id: &Uuid) -> Result<Option<Event>>;
            async fn find_by_location_and_date(
                &self,
                location: &Location,
                date: DateTime<Utc>,
            ) -> Result<Option<Event>>;
            async fn find_by_city(&self, city: &str) -> Result<Vec<Event>>;
            async fn find_by_category(&self, category: &str) -> Result<Vec<Event>>;
            async fn find_by_name(&self, name: &str) -> Result<Vec<Event>>;
            async fn filter_by(&self, criteria: &EventCriteria) -> Result<Vec<Event>>;
            async fn find_main(&self, date: DateTime<Utc>) -> Result<Vec<Event>>;
            async fn update(&self, id: &Uuid, input: EventInput) -> Result<UpdateSummary>;
        }
    }
}
