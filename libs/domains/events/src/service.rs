use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{EventError, Result};
use crate::filter::EventCriteria;
use crate::models::{Event, EventInput, UpdateSummary};
use crate::repository::EventRepository;

/// Service layer for event catalog business logic
#[derive(Clone)]
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate and store a new event.
    ///
    /// A dated event is refused when another event already sits at the same
    /// coordinates on the same instant.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: EventInput) -> Result<Event> {
        input.validate()?;

        if let Some(date) = input.date {
            let existing = self
                .repository
                .find_by_location_and_date(&input.location, date)
                .await?;
            if let Some(existing) = existing {
                tracing::warn!(existing_id = %existing.id, "Duplicate event rejected");
                return Err(EventError::AlreadyExists {
                    latitude: input.location.latitude,
                    longitude: input.location.longitude,
                    date,
                });
            }
        }

        let event = self.repository.add(input).await?;
        tracing::info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    pub async fn get(&self, id: Uuid) -> Result<Event> {
        self.repository
            .find_by_id(&id)
            .await?
            .ok_or(EventError::NotFound(id))
    }

    pub async fn by_city(&self, city: &str) -> Result<Vec<Event>> {
        self.repository.find_by_city(city).await
    }

    pub async fn by_category(&self, category: &str) -> Result<Vec<Event>> {
        self.repository.find_by_category(category).await
    }

    /// Events whose title contains `name`, ignoring case
    pub async fn search(&self, name: &str) -> Result<Vec<Event>> {
        self.repository.find_by_name(name).await
    }

    pub async fn filter(&self, criteria: &EventCriteria) -> Result<Vec<Event>> {
        self.repository.filter_by(criteria).await
    }

    /// Main listing starting at `date`, or at the start of today (UTC)
    pub async fn main(&self, date: Option<DateTime<Utc>>) -> Result<Vec<Event>> {
        let date = date.unwrap_or_else(start_of_today);
        self.repository.find_main(date).await
    }

    /// Replace an event's fields; `NotFound` when no event has `id`
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: EventInput) -> Result<UpdateSummary> {
        input.validate()?;

        let summary = self.repository.update(&id, input).await?;
        if summary.matched_count == 0 {
            return Err(EventError::NotFound(id));
        }

        tracing::info!(
            event_id = %id,
            modified = summary.modified_count,
            "Event updated"
        );
        Ok(summary)
    }
}

fn start_of_today() -> DateTime<Utc> {
    let now = Utc::now();
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}
