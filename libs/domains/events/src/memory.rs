//! In-memory implementation of EventRepository

use crate::error::Result;
use crate::filter::{Clause, EventCriteria, EventPredicate, MAIN_EVENTS_LIMIT, main_window};
use crate::models::{Event, EventInput, Location, UpdateSummary};
use crate::repository::EventRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local event store, used by tests and database-less runs.
///
/// Results are returned oldest first, ties broken by id.
#[derive(Clone, Default)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored event
    pub async fn all(&self) -> Vec<Event> {
        self.select(&EventPredicate::all()).await
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    async fn select(&self, predicate: &EventPredicate) -> Vec<Event> {
        let events = self.events.read().await;
        let mut selected: Vec<Event> = events
            .values()
            .filter(|event| predicate.matches(event))
            .cloned()
            .collect();
        selected.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        selected
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn add(&self, input: EventInput) -> Result<Event> {
        let mut event = Event::from_input(input);
        let mut events = self.events.write().await;
        while events.contains_key(&event.id) {
            event.id = Uuid::now_v7();
        }
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Event>> {
        Ok(self.events.read().await.get(id).cloned())
    }

    async fn find_by_location_and_date(
        &self,
        location: &Location,
        date: DateTime<Utc>,
    ) -> Result<Option<Event>> {
        let predicate = EventPredicate::all()
            .and(Clause::AtLocation(*location))
            .and(Clause::DateIs(date));
        Ok(self.select(&predicate).await.into_iter().next())
    }

    async fn find_by_city(&self, city: &str) -> Result<Vec<Event>> {
        let predicate = EventPredicate::all().and(Clause::CityIs(city.to_string()));
        Ok(self.select(&predicate).await)
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Event>> {
        let predicate = EventPredicate::all().and(Clause::HasCategory(category.to_string()));
        Ok(self.select(&predicate).await)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Event>> {
        let predicate = EventPredicate::all().and(Clause::TitleContains(name.to_string()));
        Ok(self.select(&predicate).await)
    }

    async fn filter_by(&self, criteria: &EventCriteria) -> Result<Vec<Event>> {
        Ok(self.select(&EventPredicate::compose(criteria)).await)
    }

    async fn find_main(&self, date: DateTime<Utc>) -> Result<Vec<Event>> {
        let (from, to) = main_window(date);
        let predicate = EventPredicate::all().and(Clause::DateWithin { from, to });

        let mut events = self.select(&predicate).await;
        events.sort_by_key(|event| event.date);
        events.truncate(MAIN_EVENTS_LIMIT);
        Ok(events)
    }

    async fn update(&self, id: &Uuid, input: EventInput) -> Result<UpdateSummary> {
        let mut events = self.events.write().await;
        let Some(event) = events.get_mut(id) else {
            return Ok(UpdateSummary::default());
        };

        let changed = event.replace_with(input);
        Ok(UpdateSummary {
            matched_count: 1,
            modified_count: u64::from(changed),
        })
    }
}
