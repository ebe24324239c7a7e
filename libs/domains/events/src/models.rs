//! Event catalog models

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be within [-90, 90]"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be within [-180, 180]"))]
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One entry of an event's price list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct PriceTier {
    /// Display name such as "early bird" or "VIP"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[validate(range(min = 0.0, message = "Price amount cannot be negative"))]
    pub amount: f64,
}

impl PriceTier {
    pub fn new(amount: f64) -> Self {
        Self {
            label: None,
            amount,
        }
    }

    pub fn labeled(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: Some(label.into()),
            amount,
        }
    }
}

/// A catalogued public event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Store-assigned identifier, never reused
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,

    pub title: String,

    pub location: Location,

    /// When the event takes place. Undated events never match date queries.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub banner: Option<String>,

    #[serde(default)]
    pub flyers: Vec<String>,

    #[serde(default)]
    pub coupons: Vec<String>,

    #[serde(default)]
    pub price: Vec<PriceTier>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub formatted_address: Option<String>,

    /// Users attending, owned by another service
    #[serde(default)]
    pub participants: Vec<Uuid>,

    /// Set once when the store accepts the event
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Materialize `input` with a fresh v7 id and a creation stamp.
    ///
    /// Both timestamps are truncated to milliseconds, the precision stores keep.
    pub fn from_input(input: EventInput) -> Self {
        Self::from_input_at(input, Utc::now())
    }

    pub(crate) fn from_input_at(input: EventInput, created_at: DateTime<Utc>) -> Self {
        let EventInput {
            title,
            location,
            date,
            description,
            categories,
            banner,
            flyers,
            coupons,
            price,
            city,
            formatted_address,
            participants,
        } = input;

        Self {
            id: Uuid::now_v7(),
            title,
            location,
            date: date.map(|date| date.trunc_subsecs(3)),
            description,
            categories,
            banner,
            flyers,
            coupons,
            price,
            city,
            formatted_address,
            participants,
            created_at: created_at.trunc_subsecs(3),
        }
    }

    /// Overwrite every caller-supplied field, keeping `id` and `created_at`.
    ///
    /// Returns whether anything changed.
    pub fn replace_with(&mut self, input: EventInput) -> bool {
        let replaced = Event {
            id: self.id,
            created_at: self.created_at,
            ..Event::from_input_at(input, self.created_at)
        };
        let changed = *self != replaced;
        *self = replaced;
        changed
    }

    /// Amount of the cheapest tier; an event without tiers costs 0
    pub fn cheapest_price(&self) -> f64 {
        self.price
            .iter()
            .map(|tier| tier.amount)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }
}

/// Caller-supplied event fields, used to create and to replace an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct EventInput {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(nested)]
    pub location: Location,

    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    #[serde(default)]
    #[validate(length(max = 10000, message = "Description must be at most 10000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub banner: Option<String>,

    #[serde(default)]
    pub flyers: Vec<String>,

    #[serde(default)]
    pub coupons: Vec<String>,

    #[serde(default)]
    #[validate(nested)]
    pub price: Vec<PriceTier>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub formatted_address: Option<String>,

    #[serde(default)]
    pub participants: Vec<Uuid>,
}

impl EventInput {
    /// Minimal input: a title at a location, everything else empty
    pub fn new(title: impl Into<String>, location: Location) -> Self {
        Self {
            title: title.into(),
            location,
            date: None,
            description: None,
            categories: Vec::new(),
            banner: None,
            flyers: Vec::new(),
            coupons: Vec::new(),
            price: Vec::new(),
            city: None,
            formatted_address: None,
            participants: Vec::new(),
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price(mut self, price: Vec<PriceTier>) -> Self {
        self.price = price;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<Event> for EventInput {
    fn from(event: Event) -> Self {
        Self {
            title: event.title,
            location: event.location,
            date: event.date,
            description: event.description,
            categories: event.categories,
            banner: event.banner,
            flyers: event.flyers,
            coupons: event.coupons,
            price: event.price,
            city: event.city,
            formatted_address: event.formatted_address,
            participants: event.participants,
        }
    }
}

/// Outcome of a replace-by-id write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateSummary {
    /// Events whose id matched (0 or 1)
    pub matched_count: u64,
    /// Events whose stored value actually changed
    pub modified_count: u64,
}
