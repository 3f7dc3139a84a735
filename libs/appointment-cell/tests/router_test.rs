use axum::http::StatusCode;
use serde_json::{json, Value};

use appointment_cell::router::appointment_routes;
use shared_utils::test_utils::{empty_request, json_request, send, test_database, TestDoctor, TestPatient};

fn booking(patient_id: i64, doctor_id: i64, start: &str, duration: i64) -> Value {
    json!({
        "patient_id": patient_id,
        "doctor_id": doctor_id,
        "start_time_utc": start,
        "duration_minutes": duration
    })
}

#[tokio::test]
async fn test_booking_flow() {
    let db = test_database().await;
    let patient = TestPatient::new("flow@example.com").insert(&db).await;
    let doctor = TestDoctor::default().insert(&db).await;
    let app = appointment_routes(db);

    let (status, a) = send(app.clone(), json_request("POST", "/", &booking(patient, doctor, "2099-01-01T10:00:00Z", 30))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(a["start_time_utc"], "2099-01-01T10:00:00Z");
    assert_eq!(a["end_time_utc"], "2099-01-01T10:30:00Z");

    let (status, body) = send(app.clone(), json_request("POST", "/", &booking(patient, doctor, "2099-01-01T10:15:00Z", 30))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Doctor has a conflicting appointment.");

    let (status, c) = send(app.clone(), json_request("POST", "/", &booking(patient, doctor, "2099-01-01T10:30:00Z", 30))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, fetched) = send(app.clone(), empty_request("GET", &format!("/{}", a["id"]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, a);

    let (status, all) = send(app.clone(), empty_request("GET", "/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([a.clone(), c.clone()]));

    let (_, on_day) = send(app.clone(), empty_request("GET", &format!("/?date=2099-01-01&doctor_id={}", doctor))).await;
    assert_eq!(on_day, json!([a, c]));

    let (status, other_day) = send(app, empty_request("GET", "/?date=2099-01-02")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(other_day, json!([]));
}

#[tokio::test]
async fn test_legacy_field_names_are_accepted() {
    let db = test_database().await;
    let patient = TestPatient::new("legacy@example.com").insert(&db).await;
    let doctor = TestDoctor::default().insert(&db).await;

    let payload = json!({
        "patient_id": patient,
        "doctor_id": doctor,
        "start_time": "2099-03-01T15:30:00+05:30",
        "duration": 45
    });
    let (status, body) = send(appointment_routes(db), json_request("POST", "/", &payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["start_time_utc"], "2099-03-01T10:00:00Z");
    assert_eq!(body["duration_minutes"], 45);
}

#[tokio::test]
async fn test_rejections_map_to_statuses() {
    let db = test_database().await;
    let patient = TestPatient::new("reject@example.com").insert(&db).await;
    let doctor = TestDoctor::default().insert(&db).await;
    let inactive = TestDoctor::inactive().insert(&db).await;
    let app = appointment_routes(db);

    let (status, body) = send(app.clone(), json_request("POST", "/", &booking(9_999, doctor, "2099-01-01T10:00:00Z", 30))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Patient not found.");

    let (status, body) = send(app.clone(), json_request("POST", "/", &booking(patient, 9_999, "2099-01-01T10:00:00Z", 30))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Doctor not found.");

    let (status, body) = send(app.clone(), json_request("POST", "/", &booking(patient, inactive, "2099-01-01T10:00:00Z", 30))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Doctor is not active.");

    let (status, body) = send(app.clone(), json_request("POST", "/", &booking(patient, doctor, "2000-01-01T10:00:00Z", 30))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Appointment time must be in the future.");

    let (status, _) = send(app.clone(), empty_request("GET", "/424242")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, all) = send(app, empty_request("GET", "/")).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_malformed_input_returns_422() {
    let db = test_database().await;
    let patient = TestPatient::new("malformed@example.com").insert(&db).await;
    let doctor = TestDoctor::default().insert(&db).await;
    let app = appointment_routes(db);

    // no offset on the start time
    let (status, _) = send(app.clone(), json_request("POST", "/", &booking(patient, doctor, "2099-01-01T10:00:00", 30))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(app.clone(), json_request("POST", "/", &booking(patient, doctor, "2099-01-01T10:00:00Z", 0))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(app.clone(), json_request("POST", "/", &json!({ "patient_id": patient, "doctor_id": doctor }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(app, empty_request("GET", "/?date=01-01-2099")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_non_numeric_id_returns_422_json() {
    let db = test_database().await;

    let (status, body) = send(appointment_routes(db), empty_request("GET", "/abc")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}
