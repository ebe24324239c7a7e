use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::error::Result;
use crate::filter::EventCriteria;
use crate::models::{Event, EventInput, Location, PriceTier, UpdateSummary};
use crate::repository::EventRepository;
use crate::service::EventService;

/// OpenAPI documentation for the Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        filter_events,
        create_event,
        main_events,
        events_by_city,
        events_by_category,
        search_events,
        get_event,
        update_event,
    ),
    components(
        schemas(Event, EventInput, Location, PriceTier, UpdateSummary, EventCriteria),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Events", description = "Event catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Query for the main listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MainQuery {
    /// Window start; defaults to the start of the current UTC day
    pub date: Option<DateTime<Utc>>,
}

/// Create the events router with all HTTP endpoints
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(filter_events).post(create_event))
        .route("/main", get(main_events))
        .route("/city/{city}", get(events_by_city))
        .route("/category/{category}", get(events_by_category))
        .route("/search/{name}", get(search_events))
        .route("/{id}", get(get_event).put(update_event))
        .with_state(shared_service)
}

/// List events matching every criterion present
#[utoipa::path(
    get,
    path = "",
    tag = "Events",
    params(EventCriteria),
    responses(
        (status = 200, description = "Matching events", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Query(criteria): Query<EventCriteria>,
) -> Result<Json<Vec<Event>>> {
    let events = service.filter(&criteria).await?;
    Ok(Json(events))
}

/// Create a new event
#[utoipa::path(
    post,
    path = "",
    tag = "Events",
    request_body = EventInput,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedJson(input): ValidatedJson<EventInput>,
) -> Result<impl IntoResponse> {
    let event = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Up to four events within a month of the given date, soonest first
#[utoipa::path(
    get,
    path = "/main",
    tag = "Events",
    params(MainQuery),
    responses(
        (status = 200, description = "Upcoming events", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn main_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Query(query): Query<MainQuery>,
) -> Result<Json<Vec<Event>>> {
    let events = service.main(query.date).await?;
    Ok(Json(events))
}

/// Events in a city (exact match)
#[utoipa::path(
    get,
    path = "/city/{city}",
    tag = "Events",
    params(
        ("city" = String, Path, description = "City name")
    ),
    responses(
        (status = 200, description = "Events in the city", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn events_by_city<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(city): Path<String>,
) -> Result<Json<Vec<Event>>> {
    let events = service.by_city(&city).await?;
    Ok(Json(events))
}

/// Events carrying a category
#[utoipa::path(
    get,
    path = "/category/{category}",
    tag = "Events",
    params(
        ("category" = String, Path, description = "Category tag")
    ),
    responses(
        (status = 200, description = "Events in the category", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn events_by_category<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Event>>> {
    let events = service.by_category(&category).await?;
    Ok(Json(events))
}

/// Events whose title contains the given text, ignoring case
#[utoipa::path(
    get,
    path = "/search/{name}",
    tag = "Events",
    params(
        ("name" = String, Path, description = "Text to look for in titles")
    ),
    responses(
        (status = 200, description = "Matching events", body = Vec<Event>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Event>>> {
    let events = service.search(&name).await?;
    Ok(Json(events))
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
) -> Result<Json<Event>> {
    let event = service.get(id).await?;
    Ok(Json(event))
}

/// Replace an event's fields
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = EventInput,
    responses(
        (status = 200, description = "Event updated", body = UpdateSummary),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<EventInput>,
) -> Result<Json<UpdateSummary>> {
    let summary = service.update(id, input).await?;
    Ok(Json(summary))
}
