//! Handler tests for the Events domain
//!
//! These drive the events router over the in-memory store and check
//! request parsing, status codes and response bodies.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use domain_events::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app(repo: &InMemoryEventRepository) -> Router {
    handlers::router(EventService::new(repo.clone()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn concert_json() -> Value {
    json!({
        "title": "Rooftop Concert",
        "location": { "latitude": -22.90, "longitude": -43.17 },
        "date": "2024-09-14T21:00:00Z",
        "city": "Rio de Janeiro",
        "categories": ["music"],
        "price": [{ "label": "general", "amount": 50.0 }]
    })
}

#[tokio::test]
async fn test_create_event_returns_201() {
    let repo = InMemoryEventRepository::new();

    let response = app(&repo)
        .oneshot(with_json("POST", "/", concert_json()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let event: Event = json_body(response.into_body()).await;
    assert_eq!(event.title, "Rooftop Concert");
    assert_eq!(event.city.as_deref(), Some("Rio de Janeiro"));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_create_event_defaults_empty_lists() {
    let repo = InMemoryEventRepository::new();
    let body = json!({
        "title": "Quiet Reading",
        "location": { "latitude": 0.5, "longitude": 0.5 }
    });

    let response = app(&repo)
        .oneshot(with_json("POST", "/", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let event: Event = json_body(response.into_body()).await;
    assert!(event.categories.is_empty());
    assert!(event.price.is_empty());
    assert!(event.participants.is_empty());
}

#[tokio::test]
async fn test_create_event_validates_input() {
    let repo = InMemoryEventRepository::new();
    let mut body = concert_json();
    body["title"] = json!("");
    body["location"]["latitude"] = json!(120.0);

    let response = app(&repo)
        .oneshot(with_json("POST", "/", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["error"], "BadRequest");
    assert!(error["details"].is_object());
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_create_event_rejects_negative_price() {
    let repo = InMemoryEventRepository::new();
    let mut body = concert_json();
    body["price"] = json!([{ "amount": -10.0 }]);

    let response = app(&repo)
        .oneshot(with_json("POST", "/", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_event_rejects_malformed_json() {
    let repo = InMemoryEventRepository::new();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();

    let response = app(&repo).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_duplicate_returns_409() {
    let repo = InMemoryEventRepository::new();
    app(&repo)
        .oneshot(with_json("POST", "/", concert_json()))
        .await
        .unwrap();

    let mut second = concert_json();
    second["title"] = json!("Another Concert");
    let response = app(&repo)
        .oneshot(with_json("POST", "/", second))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["error"], "Conflict");
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_get_event_by_id() {
    let repo = InMemoryEventRepository::new();
    let created = repo
        .add(EventInput::new("Book Fair", Location::new(1.0, 1.0)))
        .await
        .unwrap();

    let response = app(&repo)
        .oneshot(get(&format!("/{}", created.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let event: Event = json_body(response.into_body()).await;
    assert_eq!(event, created);
}

#[tokio::test]
async fn test_get_unknown_event_returns_404() {
    let repo = InMemoryEventRepository::new();

    let response = app(&repo)
        .oneshot(get(&format!("/{}", uuid::Uuid::now_v7())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["error"], "NotFound");
}

#[tokio::test]
async fn test_get_event_with_invalid_uuid_returns_400() {
    let repo = InMemoryEventRepository::new();

    let response = app(&repo).oneshot(get("/not-a-uuid")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_filter_by_query_parameters() {
    let repo = InMemoryEventRepository::new();
    repo.add(
        EventInput::new("Art Walk", Location::new(10.0, 10.0))
            .with_categories(["art"])
            .with_price(vec![PriceTier::new(15.0)]),
    )
    .await
    .unwrap();
    repo.add(
        EventInput::new("Music and Art", Location::new(10.2, 9.9))
            .with_categories(["music", "art"])
            .with_price(vec![PriceTier::new(30.0)]),
    )
    .await
    .unwrap();
    repo.add(
        EventInput::new("Far Away Art", Location::new(40.0, 40.0))
            .with_categories(["art"])
            .with_price(vec![PriceTier::new(30.0)]),
    )
    .await
    .unwrap();

    let response = app(&repo)
        .oneshot(get(
            "/?category=art&price=20&latitude=10&longitude=10&radius=0.5",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let events: Vec<Event> = json_body(response.into_body()).await;
    let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Music and Art"]);
}

#[tokio::test]
async fn test_filter_with_no_parameters_lists_everything() {
    let repo = InMemoryEventRepository::new();
    for title in ["One", "Two", "Three"] {
        repo.add(EventInput::new(title, Location::new(0.0, 0.0)))
            .await
            .unwrap();
    }

    let response = app(&repo).oneshot(get("/")).await.unwrap();

    let events: Vec<Event> = json_body(response.into_body()).await;
    assert_eq!(events.len(), 3);
}

#[tokio::test]
async fn test_filter_rejects_malformed_number() {
    let repo = InMemoryEventRepository::new();

    let response = app(&repo).oneshot(get("/?price=cheap")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_main_events_with_explicit_date() {
    let repo = InMemoryEventRepository::new();
    for day in 1..=6 {
        let date = Utc.with_ymd_and_hms(2024, 10, day, 18, 0, 0).unwrap();
        repo.add(EventInput::new(format!("Show {day}"), Location::new(0.0, 0.0)).with_date(date))
            .await
            .unwrap();
    }

    let response = app(&repo)
        .oneshot(get("/main?date=2024-10-02T00:00:00Z"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let events: Vec<Event> = json_body(response.into_body()).await;
    let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Show 2", "Show 3", "Show 4", "Show 5"]);
}

#[tokio::test]
async fn test_main_events_defaults_to_today() {
    let repo = InMemoryEventRepository::new();
    let soon = Utc::now() + chrono::Duration::days(2);
    let past = Utc::now() - chrono::Duration::days(40);
    repo.add(EventInput::new("Soon", Location::new(0.0, 0.0)).with_date(soon))
        .await
        .unwrap();
    repo.add(EventInput::new("Past", Location::new(0.0, 0.0)).with_date(past))
        .await
        .unwrap();

    let response = app(&repo).oneshot(get("/main")).await.unwrap();

    let events: Vec<Event> = json_body(response.into_body()).await;
    let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Soon"]);
}

#[tokio::test]
async fn test_events_by_city_category_and_search() {
    let repo = InMemoryEventRepository::new();
    repo.add(
        EventInput::new("Samba School Rehearsal", Location::new(0.0, 0.0))
            .with_city("Salvador")
            .with_categories(["music", "carnival"]),
    )
    .await
    .unwrap();
    repo.add(
        EventInput::new("Capoeira Roda", Location::new(0.0, 0.0))
            .with_city("Salvador")
            .with_categories(["sport"]),
    )
    .await
    .unwrap();

    let by_city: Vec<Event> = json_body(
        app(&repo)
            .oneshot(get("/city/Salvador"))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    assert_eq!(by_city.len(), 2);

    let by_category: Vec<Event> = json_body(
        app(&repo)
            .oneshot(get("/category/carnival"))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].title, "Samba School Rehearsal");

    let searched: Vec<Event> = json_body(
        app(&repo)
            .oneshot(get("/search/RODA"))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].title, "Capoeira Roda");
}

#[tokio::test]
async fn test_update_event_returns_summary() {
    let repo = InMemoryEventRepository::new();
    let created = repo
        .add(EventInput::new("Draft", Location::new(2.0, 2.0)))
        .await
        .unwrap();

    let response = app(&repo)
        .oneshot(with_json(
            "PUT",
            &format!("/{}", created.id),
            concert_json(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let summary: UpdateSummary = json_body(response.into_body()).await;
    assert_eq!(summary.matched_count, 1);
    assert_eq!(summary.modified_count, 1);

    let stored = repo.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Rooftop Concert");
    assert_eq!(stored.created_at, created.created_at);
}

#[tokio::test]
async fn test_update_unknown_event_returns_404() {
    let repo = InMemoryEventRepository::new();

    let response = app(&repo)
        .oneshot(with_json(
            "PUT",
            &format!("/{}", uuid::Uuid::now_v7()),
            concert_json(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
