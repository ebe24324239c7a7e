//! Events Domain
//!
//! A catalog of public events searchable by city, category, title,
//! date window, price floor and geographic area.
//!
//! - [`EventPredicate`] composes optional [`EventCriteria`] into ANDed clauses
//! - [`EventRepository`] is the storage contract, implemented by
//!   [`InMemoryEventRepository`] and [`MongoEventRepository`]
//! - [`EventService`] adds validation and duplicate detection on top
//! - [`handlers::router`] exposes the service over HTTP
//!
//! ```ignore
//! let repository = MongoEventRepository::new(&db, "events");
//! repository.create_indexes().await?;
//! let routes = Router::new().nest("/events", handlers::router(EventService::new(repository)));
//! ```

pub mod error;
pub mod filter;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{EventError, Result};
pub use filter::{BoundingBox, Clause, EventCriteria, EventPredicate, MAIN_EVENTS_LIMIT};
pub use handlers::ApiDoc;
pub use memory::InMemoryEventRepository;
pub use models::{Event, EventInput, Location, PriceTier, UpdateSummary};
pub use crate::mongodb::MongoEventRepository;
pub use repository::EventRepository;
pub use service::EventService;
