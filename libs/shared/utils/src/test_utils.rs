use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use chrono::NaiveDateTime;
use tower::ServiceExt;

use shared_database::Database;

/// Fresh in-memory database with the clinic schema applied.
pub async fn test_database() -> Database {
    Database::in_memory()
        .await
        .expect("in-memory database should open")
}

pub struct TestPatient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl TestPatient {
    pub fn new(email: &str) -> Self {
        Self {
            first_name: "Test".to_string(),
            last_name: "Patient".to_string(),
            email: email.to_string(),
        }
    }

    pub async fn insert(&self, db: &Database) -> i64 {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO patients (first_name, last_name, email, phone) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(&self.email)
        .bind("9999999999")
        .fetch_one(db.pool())
        .await
        .expect("patient fixture should insert");
        id
    }
}

pub struct TestDoctor {
    pub full_name: String,
    pub specialization: String,
    pub is_active: bool,
}

impl Default for TestDoctor {
    fn default() -> Self {
        Self {
            full_name: "Dr Test".to_string(),
            specialization: "Cardiology".to_string(),
            is_active: true,
        }
    }
}

impl TestDoctor {
    pub fn inactive() -> Self {
        Self {
            is_active: false,
            ..Self::default()
        }
    }

    pub async fn insert(&self, db: &Database) -> i64 {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO doctors (full_name, specialization, is_active) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&self.full_name)
        .bind(&self.specialization)
        .bind(self.is_active)
        .fetch_one(db.pool())
        .await
        .expect("doctor fixture should insert");
        id
    }
}

/// Insert an appointment row directly, bypassing admission checks.
pub async fn insert_raw_appointment(
    db: &Database,
    patient_id: i64,
    doctor_id: i64,
    start_time_utc: NaiveDateTime,
    duration_minutes: i64,
) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO appointments (patient_id, doctor_id, start_time_utc, duration_minutes) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(patient_id)
    .bind(doctor_id)
    .bind(start_time_utc)
    .bind(duration_minutes)
    .fetch_one(db.pool())
    .await
    .expect("appointment fixture should insert");
    id
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

/// Drive one request through the router and decode the JSON response.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");

    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };

    (status, json)
}
