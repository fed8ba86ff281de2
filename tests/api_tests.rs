use std::sync::Arc;

use axum_test::TestServer;
use serde_json::Value;
use uuid::Uuid;

use learnpath_api::{
    db::InMemoryStore,
    models::{Course, CourseLevel, Enrollment},
    routes::{create_router, AppState},
    services::{RecommendationSettings, Recommender},
};

fn create_test_server(store: &InMemoryStore) -> TestServer {
    let store = Arc::new(store.clone());
    let recommender = Recommender::new(
        store.clone(),
        store,
        RecommendationSettings::default(),
    );
    TestServer::new(create_router(AppState::new(recommender))).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(&InMemoryStore::new());
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_recommendations_for_new_learner() {
    let store = InMemoryStore::new();
    store
        .upsert_course(Course::new("Intro to Rust").with_rating(4.8))
        .await;

    let server = create_test_server(&store);
    let response = server
        .get(&format!("/api/v1/learners/{}/recommendations", Uuid::new_v4()))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["personalized"], serde_json::json!([]));
    assert_eq!(body["collaborative"], serde_json::json!([]));
    assert_eq!(body["nextSteps"], serde_json::json!([]));
    assert_eq!(body["trending"][0]["title"], "Intro to Rust");
    assert_eq!(body["isEnrolledInAllCourses"], false);
}

#[tokio::test]
async fn test_recommendations_response_shape() {
    let store = InMemoryStore::new();
    let learner = Uuid::new_v4();
    let done = Course::new("Pandas Basics")
        .with_category("Data Science")
        .with_level(CourseLevel::Beginner);
    let next = Course::new("Applied ML")
        .with_category("Data Science")
        .with_level(CourseLevel::Intermediate)
        .with_tags(["python"]);

    store.upsert_course(done.clone()).await;
    store.upsert_course(next.clone()).await;
    store
        .upsert_enrollment(Enrollment::new(learner, done.id).with_progress(100))
        .await;

    let server = create_test_server(&store);
    let response = server
        .get(&format!("/api/v1/learners/{}/recommendations", learner))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let next_step = &body["nextSteps"][0];
    assert_eq!(next_step["id"], next.id.to_string());
    assert_eq!(next_step["level"], "Intermediate");
    assert_eq!(next_step["status"], "published");
    assert_eq!(next_step["tags"], serde_json::json!(["python"]));
    assert!(next_step.get("createdAt").is_some());
}

#[tokio::test]
async fn test_malformed_learner_id_is_rejected() {
    let server = create_test_server(&InMemoryStore::new());
    let response = server
        .get("/api/v1/learners/not-a-uuid/recommendations")
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server(&InMemoryStore::new());
    let request_id = Uuid::new_v4().to_string();

    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_str(&request_id).unwrap(),
        )
        .await;

    assert_eq!(response.header("x-request-id"), request_id.as_str());
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let server = create_test_server(&InMemoryStore::new());
    let response = server.get("/health").await;

    let header = response.header("x-request-id");
    assert!(Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
