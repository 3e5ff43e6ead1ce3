mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use assignment_cell::{create_booking_router, token};
use notification_cell::NotificationDispatcher;
use therapist_cell::Therapist;

use common::{make_service, test_roster, RecordingDispatcher, ORIGIN};

const SECRET: &str = "test-secret-key-must-be-long-enough";

fn build_app(roster: Vec<Therapist>, dispatcher: Arc<dyn NotificationDispatcher>) -> Router {
    let service = Arc::new(make_service(roster, dispatcher, 120));
    create_booking_router(service)
}

fn create_body(coordinates: Option<Value>) -> Value {
    json!({
        "customer_name": "Dana Wu",
        "customer_email": "dana@example.com",
        "customer_phone": "+61 400 000 000",
        "address": "12 Collins St, Melbourne",
        "coordinates": coordinates,
        "service_type": "Relaxation massage",
        "duration_minutes": 60,
        "scheduled_at": "2026-08-12T10:00:00",
        "parking": "free",
        "selected_therapist_id": null,
    })
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request");
    send(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should complete");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn create_booking(app: &Router) -> Uuid {
    let origin = json!({"lat": ORIGIN.lat, "lon": ORIGIN.lon});
    let (status, body) = post_json(app, "/", create_body(Some(origin))).await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", body);
    body["booking"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("booking id in response")
}

#[tokio::test]
async fn test_create_and_poll_booking() {
    let app = build_app(test_roster(), RecordingDispatcher::new());

    let booking_id = create_booking(&app).await;

    let (status, body) = get(&app, &format!("/{}", booking_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "Pending");
    assert_eq!(body["booking"]["candidate_count"], 2);
    assert_eq!(body["booking"]["price"], 159.0);
}

#[tokio::test]
async fn test_create_booking_without_coordinates_is_unprocessable() {
    let app = build_app(test_roster(), RecordingDispatcher::new());

    let (status, _body) = post_json(&app, "/", create_body(None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_booking_invalid_duration_is_bad_request() {
    let app = build_app(test_roster(), RecordingDispatcher::new());

    let mut body = create_body(Some(json!({"lat": ORIGIN.lat, "lon": ORIGIN.lon})));
    body["duration_minutes"] = json!(47);
    let (status, _body) = post_json(&app, "/", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_respond_link_confirms_booking() {
    let roster = test_roster();
    let anna = roster[0].clone();
    let app = build_app(roster, RecordingDispatcher::new());

    let booking_id = create_booking(&app).await;
    let link_token = token::generate(SECRET, booking_id, anna.id);

    let uri = format!(
        "/{}/respond?therapist_id={}&action=accept&token={}",
        booking_id, anna.id, link_token
    );
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "confirmed");

    let (_, body) = get(&app, &format!("/{}", booking_id)).await;
    assert_eq!(body["booking"]["status"], "Confirmed");
    assert_eq!(body["booking"]["winning_therapist"]["name"], "Anna");
}

#[tokio::test]
async fn test_respond_post_decline_advances() {
    let roster = test_roster();
    let anna = roster[0].clone();
    let app = build_app(roster, RecordingDispatcher::new());

    let booking_id = create_booking(&app).await;
    let link_token = token::generate(SECRET, booking_id, anna.id);

    let (status, body) = post_json(
        &app,
        &format!("/{}/respond", booking_id),
        json!({
            "therapist_id": anna.id,
            "action": "decline",
            "token": link_token,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "advanced");

    let (_, body) = get(&app, &format!("/{}", booking_id)).await;
    assert_eq!(body["booking"]["status"], "Pending");
    assert_eq!(body["booking"]["current_position"], 1);
}

#[tokio::test]
async fn test_respond_with_invalid_token_is_rejected() {
    let roster = test_roster();
    let anna = roster[0].clone();
    let app = build_app(roster, RecordingDispatcher::new());

    let booking_id = create_booking(&app).await;

    // Token minted for a different booking must not open this one
    let wrong_token = token::generate(SECRET, Uuid::new_v4(), anna.id);
    let uri = format!(
        "/{}/respond?therapist_id={}&action=accept&token={}",
        booking_id, anna.id, wrong_token
    );
    let (status, _body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Nothing moved
    let (_, body) = get(&app, &format!("/{}", booking_id)).await;
    assert_eq!(body["booking"]["status"], "Pending");
    assert_eq!(body["booking"]["current_position"], 0);
}

#[tokio::test]
async fn test_respond_unknown_booking_is_not_found() {
    let app = build_app(test_roster(), RecordingDispatcher::new());

    let booking_id = Uuid::new_v4();
    let therapist_id = Uuid::new_v4();
    let link_token = token::generate(SECRET, booking_id, therapist_id);

    let uri = format!(
        "/{}/respond?therapist_id={}&action=accept&token={}",
        booking_id, therapist_id, link_token
    );
    let (status, _body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_respond_with_unknown_action_is_bad_request() {
    let roster = test_roster();
    let anna = roster[0].clone();
    let app = build_app(roster, RecordingDispatcher::new());

    let booking_id = create_booking(&app).await;
    let link_token = token::generate(SECRET, booking_id, anna.id);

    let uri = format!(
        "/{}/respond?therapist_id={}&action=maybe&token={}",
        booking_id, anna.id, link_token
    );
    let (status, _body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_booking_endpoint() {
    let app = build_app(test_roster(), RecordingDispatcher::new());

    let booking_id = create_booking(&app).await;

    let (status, body) = post_json(&app, &format!("/{}/cancel", booking_id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "cancelled");

    let (_, body) = get(&app, &format!("/{}", booking_id)).await;
    assert_eq!(body["booking"]["status"], "Cancelled");
}

#[tokio::test]
async fn test_get_unknown_booking_is_not_found() {
    let app = build_app(test_roster(), RecordingDispatcher::new());

    let (status, _body) = get(&app, &format!("/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
