//! MongoDB implementation of EventRepository

use crate::error::{EventError, Result};
use crate::filter::{Clause, EventCriteria, EventPredicate, MAIN_EVENTS_LIMIT, main_window};
use crate::models::{Event, EventInput, Location, PriceTier, UpdateSummary};
use crate::repository::EventRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

/// Stored shape of an event.
///
/// Ids are kept as strings and dates as BSON datetimes so that equality
/// and range queries compare values, not encodings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct EventDocument {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    location: Location,
    date: Option<bson::DateTime>,
    description: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    banner: Option<String>,
    #[serde(default)]
    flyers: Vec<String>,
    #[serde(default)]
    coupons: Vec<String>,
    #[serde(default)]
    price: Vec<PriceTier>,
    city: Option<String>,
    formatted_address: Option<String>,
    #[serde(default)]
    participants: Vec<String>,
    created_at: bson::DateTime,
}

impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            title: event.title.clone(),
            location: event.location,
            date: event.date.map(to_bson_datetime),
            description: event.description.clone(),
            categories: event.categories.clone(),
            banner: event.banner.clone(),
            flyers: event.flyers.clone(),
            coupons: event.coupons.clone(),
            price: event.price.clone(),
            city: event.city.clone(),
            formatted_address: event.formatted_address.clone(),
            participants: event.participants.iter().map(Uuid::to_string).collect(),
            created_at: to_bson_datetime(event.created_at),
        }
    }
}

impl TryFrom<EventDocument> for Event {
    type Error = EventError;

    fn try_from(document: EventDocument) -> Result<Self> {
        let participants = document
            .participants
            .iter()
            .map(|p| parse_uuid(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(Event {
            id: parse_uuid(&document.id)?,
            title: document.title,
            location: document.location,
            date: document.date.map(from_bson_datetime),
            description: document.description,
            categories: document.categories,
            banner: document.banner,
            flyers: document.flyers,
            coupons: document.coupons,
            price: document.price,
            city: document.city,
            formatted_address: document.formatted_address,
            participants,
            created_at: from_bson_datetime(document.created_at),
        })
    }
}

fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| EventError::Serialization(format!("Invalid stored UUID {value:?}: {e}")))
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Query document for a single clause
fn clause_document(clause: &Clause) -> Document {
    match clause {
        Clause::TitleContains(text) => {
            doc! { "title": { "$regex": format!("(?i){}", regex::escape(text)) } }
        }
        Clause::CityIs(city) => doc! { "city": city.as_str() },
        Clause::HasCategory(category) => doc! { "categories": category.as_str() },
        Clause::DateFrom(from) => doc! { "date": { "$gte": to_bson_datetime(*from) } },
        Clause::DateWithin { from, to } => doc! {
            "date": { "$gte": to_bson_datetime(*from), "$lte": to_bson_datetime(*to) }
        },
        Clause::DateIs(instant) => doc! { "date": to_bson_datetime(*instant) },
        Clause::AtLocation(location) => doc! {
            "location.latitude": location.latitude,
            "location.longitude": location.longitude
        },
        Clause::MinPrice(floor) => {
            let mut document =
                doc! { "price": { "$not": { "$elemMatch": { "amount": { "$lt": *floor } } } } };
            if *floor > 0.0 {
                document.insert("price.0", doc! { "$exists": true });
            }
            document
        }
        Clause::WithinBounds(bounds) => doc! {
            "location.latitude": { "$gte": bounds.min_latitude, "$lte": bounds.max_latitude },
            "location.longitude": { "$gte": bounds.min_longitude, "$lte": bounds.max_longitude }
        },
    }
}

/// Query document for a whole predicate; clauses are joined with `$and`
fn predicate_document(predicate: &EventPredicate) -> Document {
    let clauses: Vec<Bson> = predicate
        .clauses()
        .iter()
        .map(|clause| Bson::Document(clause_document(clause)))
        .collect();

    if clauses.is_empty() {
        Document::new()
    } else {
        doc! { "$and": clauses }
    }
}

/// `$set` body replacing every caller-supplied field, leaving `_id` and
/// `created_at` untouched
fn set_document(input: EventInput) -> Result<Document> {
    let mut fields = bson::to_document(&EventDocument::from(&Event::from_input(input)))?;
    fields.remove("_id");
    fields.remove("created_at");
    Ok(fields)
}

/// MongoDB-based event repository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    /// Bind the repository to `collection` in `database`
    pub fn new(database: &Database, collection: &str) -> Self {
        Self {
            collection: database.collection(collection),
        }
    }

    /// Create indexes for the fields queries filter on
    pub async fn create_indexes(&self) -> Result<()> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "date": 1 }).build(),
            IndexModel::builder().keys(doc! { "city": 1 }).build(),
            IndexModel::builder().keys(doc! { "categories": 1 }).build(),
            IndexModel::builder()
                .keys(doc! { "location.latitude": 1, "location.longitude": 1, "date": 1 })
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    async fn find_one(&self, predicate: &EventPredicate) -> Result<Option<Event>> {
        self.collection
            .find_one(predicate_document(predicate))
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn find_many(&self, predicate: &EventPredicate) -> Result<Vec<Event>> {
        let cursor = self.collection.find(predicate_document(predicate)).await?;
        let documents: Vec<EventDocument> = cursor.try_collect().await?;
        documents.into_iter().map(Event::try_from).collect()
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, input), fields(title = %input.title))]
    async fn add(&self, input: EventInput) -> Result<Event> {
        let event = Event::from_input(input);
        self.collection
            .insert_one(EventDocument::from(&event))
            .await?;
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Event>> {
        let filter = doc! { "_id": id.to_string() };
        self.collection
            .find_one(filter)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_location_and_date(
        &self,
        location: &Location,
        date: DateTime<Utc>,
    ) -> Result<Option<Event>> {
        let predicate = EventPredicate::all()
            .and(Clause::AtLocation(*location))
            .and(Clause::DateIs(date));
        self.find_one(&predicate).await
    }

    #[instrument(skip(self))]
    async fn find_by_city(&self, city: &str) -> Result<Vec<Event>> {
        self.find_many(&EventPredicate::all().and(Clause::CityIs(city.to_string())))
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_category(&self, category: &str) -> Result<Vec<Event>> {
        self.find_many(&EventPredicate::all().and(Clause::HasCategory(category.to_string())))
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Vec<Event>> {
        self.find_many(&EventPredicate::all().and(Clause::TitleContains(name.to_string())))
            .await
    }

    #[instrument(skip(self))]
    async fn filter_by(&self, criteria: &EventCriteria) -> Result<Vec<Event>> {
        self.find_many(&EventPredicate::compose(criteria)).await
    }

    #[instrument(skip(self))]
    async fn find_main(&self, date: DateTime<Utc>) -> Result<Vec<Event>> {
        let (from, to) = main_window(date);
        let filter = predicate_document(&EventPredicate::all().and(Clause::DateWithin { from, to }));

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "date": 1 })
            .limit(MAIN_EVENTS_LIMIT as i64)
            .await?;
        let documents: Vec<EventDocument> = cursor.try_collect().await?;
        documents.into_iter().map(Event::try_from).collect()
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: &Uuid, input: EventInput) -> Result<UpdateSummary> {
        let filter = doc! { "_id": id.to_string() };
        let update = doc! { "$set": set_document(input)? };

        let result = self.collection.update_one(filter, update).await?;
        Ok(UpdateSummary {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }
}
