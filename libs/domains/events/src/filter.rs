//! Filter composition
//!
//! Optional search criteria are turned into an [`EventPredicate`], an
//! AND of [`Clause`]s. The in-memory store evaluates clauses directly
//! through [`EventPredicate::matches`]; the MongoDB store translates the
//! same clauses into a query document, so both stores share one notion
//! of "matches".

use crate::models::{Event, Location};
use chrono::{DateTime, Months, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Number of events returned by the main listing
pub const MAIN_EVENTS_LIMIT: usize = 4;

/// Optional search criteria; every present field narrows the result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EventCriteria {
    /// Case-insensitive substring of the title
    pub name: Option<String>,
    /// Earliest event date (inclusive)
    pub date: Option<DateTime<Utc>>,
    /// Category the event must carry
    pub category: Option<String>,
    /// Minimum price; every tier must cost at least this much
    pub price: Option<f64>,
    /// Center latitude of the area search
    pub latitude: Option<f64>,
    /// Center longitude of the area search
    pub longitude: Option<f64>,
    /// Half-width of the search box, in degrees
    pub radius: Option<f64>,
}

impl EventCriteria {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_area(mut self, center: Location, radius: f64) -> Self {
        self.latitude = Some(center.latitude);
        self.longitude = Some(center.longitude);
        self.radius = Some(radius);
        self
    }
}

/// Axis-aligned box in degrees, inclusive on every edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    /// Box spanning `radius` degrees on each side of `center`
    pub fn around(center: Location, radius: f64) -> Self {
        Self {
            min_latitude: center.latitude - radius,
            max_latitude: center.latitude + radius,
            min_longitude: center.longitude - radius,
            max_longitude: center.longitude + radius,
        }
    }

    pub fn contains(&self, location: &Location) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&location.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&location.longitude)
    }
}

/// One condition over an event
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Title contains the text, ignoring case.
    ///
    /// Case folding is Unicode lowercasing here and PCRE `(?i)` in MongoDB;
    /// the two agree except for multi-char foldings such as `ß` or `İ`.
    TitleContains(String),
    /// City equals the text exactly
    CityIs(String),
    /// Categories include the text exactly
    HasCategory(String),
    /// Date is present and not before the instant
    DateFrom(DateTime<Utc>),
    /// Date is present and inside `[from, to]`
    DateWithin {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    /// Date equals the instant, compared at millisecond precision
    DateIs(DateTime<Utc>),
    /// Coordinates equal the location exactly
    AtLocation(Location),
    /// No tier is cheaper than the floor; a positive floor also needs a tier
    MinPrice(f64),
    /// Coordinates fall inside the box
    WithinBounds(BoundingBox),
}

impl Clause {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Clause::TitleContains(text) => event
                .title
                .to_lowercase()
                .contains(&text.to_lowercase()),
            Clause::CityIs(city) => event.city.as_deref() == Some(city.as_str()),
            Clause::HasCategory(category) => event.categories.iter().any(|c| c == category),
            Clause::DateFrom(from) => event.date.is_some_and(|date| date >= millis(*from)),
            Clause::DateWithin { from, to } => event
                .date
                .is_some_and(|date| millis(*from) <= date && date <= millis(*to)),
            Clause::DateIs(instant) => event.date == Some(millis(*instant)),
            Clause::AtLocation(location) => event.location == *location,
            Clause::MinPrice(floor) => {
                if *floor > 0.0 && event.price.is_empty() {
                    return false;
                }
                event.price.iter().all(|tier| tier.amount >= *floor)
            }
            Clause::WithinBounds(bounds) => bounds.contains(&event.location),
        }
    }
}

/// Stored dates carry milliseconds; bounds are cut the same way.
fn millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(3)
}

/// AND of clauses; no clauses matches every event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPredicate {
    clauses: Vec<Clause>,
}

impl EventPredicate {
    /// Predicate matching every event
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.clauses.iter().all(|clause| clause.matches(event))
    }

    /// Compose criteria into clauses.
    ///
    /// Empty text criteria are ignored. The price floor defaults to 0, and
    /// the area clause is added only when center and radius are all given.
    pub fn compose(criteria: &EventCriteria) -> Self {
        let mut predicate = Self::all();

        if let Some(name) = non_empty(&criteria.name) {
            predicate = predicate.and(Clause::TitleContains(name.to_string()));
        }
        if let Some(date) = criteria.date {
            predicate = predicate.and(Clause::DateFrom(date));
        }
        if let Some(category) = non_empty(&criteria.category) {
            predicate = predicate.and(Clause::HasCategory(category.to_string()));
        }

        predicate = predicate.and(Clause::MinPrice(criteria.price.unwrap_or(0.0)));

        if let (Some(latitude), Some(longitude), Some(radius)) =
            (criteria.latitude, criteria.longitude, criteria.radius)
        {
            let center = Location::new(latitude, longitude);
            predicate = predicate.and(Clause::WithinBounds(BoundingBox::around(center, radius)));
        }

        predicate
    }
}

impl From<&EventCriteria> for EventPredicate {
    fn from(criteria: &EventCriteria) -> Self {
        Self::compose(criteria)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Main listing window: `[date, date + 1 calendar month]`.
///
/// Month arithmetic clamps to the last valid day, so Jan 31 ends on the
/// last day of February.
pub fn main_window(date: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = date
        .checked_add_months(Months::new(1))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    (date, end)
}
