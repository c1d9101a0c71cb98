use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use safar_api::{build_app, ApiConfig, PLAN_SOURCE_HEADER};
use safar_core::TripPlan;
use serde_json::{json, Value};
use tower::ServiceExt;

fn offline_app() -> Router {
    build_app(ApiConfig::default()).expect("app should build")
}

fn generate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/trip/generate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = offline_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["message"], "Trip Planner API is running!");
    assert_eq!(parsed["capabilities"]["modelConfigured"], false);
    assert!(parsed["metrics"].get("requestsTotal").is_some());
}

#[tokio::test]
async fn offline_generate_returns_consistent_fallback_plan() {
    let app = offline_app();

    let response = app
        .oneshot(generate_request(json!({
            "from": "Mumbai",
            "to": "Goa",
            "startDate": "2025-12-20",
            "endDate": "2025-12-24",
            "mode": "balanced",
            "travelers": 4
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(PLAN_SOURCE_HEADER).unwrap(),
        "fallback"
    );
    assert!(response.headers().get("x-request-id").is_some());

    let plan: TripPlan = serde_json::from_value(read_json(response).await).unwrap();
    assert_eq!(plan.days.len(), 5);
    assert_eq!(plan.trip_summary.total_days, 5);
    assert_eq!(plan.trip_summary.travelers, 4);
    assert_eq!(plan.days[4].date.to_string(), "2025-12-24");

    for day in &plan.days {
        assert_eq!(day.daily_total, day.itemized_total());
    }
    let travel = plan.route.recommended().unwrap().estimated_cost
        + plan.return_route.recommended().unwrap().estimated_cost;
    assert_eq!(plan.trip_summary.estimated_travel_cost, travel);
    assert_eq!(
        plan.trip_summary.estimated_total_amount(),
        Some(plan.days_total() + travel)
    );
}

#[tokio::test]
async fn island_trips_only_offer_flight_and_ship() {
    let app = offline_app();

    let response = app
        .oneshot(generate_request(json!({
            "from": "Chennai",
            "to": "Port Blair, Andaman",
            "startDate": "2025-02-01",
            "endDate": "2025-02-03",
            "mode": "cheap"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    for route in ["route", "returnRoute"] {
        let kinds = parsed[route]["travelOptions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|option| option["type"].as_str().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec!["Flight", "Ship/Ferry"]);
        assert_eq!(parsed[route]["transportation"], "Ship/Ferry");
    }
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let app = offline_app();

    let response = app
        .oneshot(generate_request(json!({
            "from": "Delhi",
            "startDate": "2025-05-01",
            "endDate": "2025-05-03",
            "mode": "cheap"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = read_json(response).await;
    assert_eq!(parsed["error"], "invalid_request");
    assert_eq!(
        parsed["message"],
        "Missing required fields: from, to, startDate, endDate, mode"
    );
}

#[tokio::test]
async fn trips_longer_than_thirty_days_are_rejected() {
    let app = offline_app();

    let response = app
        .oneshot(generate_request(json!({
            "from": "Delhi",
            "to": "Leh",
            "startDate": "2025-06-01",
            "endDate": "2025-07-01",
            "mode": "premium"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = read_json(response).await;
    assert_eq!(parsed["message"], "Trip duration must be between 1 and 30 days");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = offline_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/trip/generate")
                .header("content-type", "application/json")
                .body(Body::from("{\"from\": \"Delhi\","))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "invalid_body");
}

#[tokio::test]
async fn generate_is_rate_limited_per_ip() {
    let app = build_app(ApiConfig {
        rate_limit_window: Duration::from_secs(60),
        rate_limit_max: 2,
        ..ApiConfig::default()
    })
    .expect("app should build");

    let body = json!({
        "from": "Kochi",
        "to": "Munnar",
        "startDate": "2025-08-01",
        "endDate": "2025-08-01",
        "mode": "cheap"
    });

    for _ in 0..2 {
        let response = app.clone().oneshot(generate_request(body.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(read_json(response).await["error"], "rate_limited");

    let health = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}
