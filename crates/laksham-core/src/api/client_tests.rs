use mockito::Matcher;
use serde_json::json;

use crate::api::{AttemptApi, PortalClient};
use crate::attempt::{AnswerUpsert, AttemptCreate};
use crate::error::ApiError;

fn assessment_body() -> serde_json::Value {
    json!({
        "id": 42,
        "title": "Backend debugging screen",
        "description": "Find and fix the bugs.",
        "total_duration": 45,
        "max_score": 30,
        "questions": [
            {
                "id": 1,
                "question_id": 101,
                "order": 1,
                "points": 10,
                "question": {
                    "id": 101,
                    "title": "Off-by-one",
                    "description": "The loop skips the last element.",
                    "category": "debugging",
                    "difficulty_level": "Easy",
                    "estimated_duration": 10
                }
            },
            {
                "id": 2,
                "question_id": 102,
                "order": 2,
                "points": 20,
                "custom_duration": 20,
                "question": {
                    "id": 102,
                    "title": "Deadlock",
                    "description": "Two locks, wrong order.",
                    "category": "concurrency",
                    "difficulty_level": "Hard",
                    "estimated_duration": 15,
                    "programming_language": "rust"
                }
            }
        ]
    })
}

#[tokio::test]
async fn fetches_shared_assessment() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/assessments/share/abc123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(assessment_body().to_string())
        .create_async()
        .await;

    let client = PortalClient::new(&format!("{}/api", server.url())).unwrap();
    let assessment = client.fetch_shared_assessment("abc123").await.unwrap();

    mock.assert_async().await;
    assert_eq!(assessment.id, 42);
    assert_eq!(assessment.question_count(), 2);
    assert_eq!(assessment.total_duration_secs(), 45 * 60);
    assert!(assessment.questions[1].question.is_coding());
}

#[tokio::test]
async fn creates_attempt_with_intake_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/assessments/42/attempts")
        .match_body(Matcher::Json(json!({
            "candidate_email": "dev@example.com",
            "candidate_name": "Sam"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": 7,
                "assessment_id": 42,
                "candidate_email": "dev@example.com",
                "candidate_name": "Sam",
                "started_at": "2026-08-07T10:00:00Z",
                "status": "in_progress",
                "max_score": 30
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = PortalClient::new(&format!("{}/api", server.url())).unwrap();
    let req = AttemptCreate {
        candidate_email: "dev@example.com".into(),
        candidate_name: Some("Sam".into()),
    };
    let attempt = client.create_attempt(42, &req).await.unwrap();

    mock.assert_async().await;
    assert_eq!(attempt.id, 7);
    assert_eq!(attempt.max_score, 30);
}

#[tokio::test]
async fn upserts_one_answer() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/assessments/attempts/7/answers")
        .match_body(Matcher::Json(json!({
            "question_id": 101,
            "answer_text": "use <= in the bound"
        })))
        .with_status(200)
        .create_async()
        .await;

    let client = PortalClient::new(&format!("{}/api", server.url())).unwrap();
    let req = AnswerUpsert {
        question_id: 101,
        answer_text: "use <= in the bound".into(),
        explanation: None,
    };
    client.upsert_answer(7, &req).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn completes_attempt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/assessments/attempts/7/complete")
        .with_status(200)
        .create_async()
        .await;

    let client = PortalClient::new(&format!("{}/api", server.url())).unwrap();
    client.complete_attempt(7).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn fetches_attempt_result() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/assessments/attempts/7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": 7,
                "assessment_id": 42,
                "candidate_email": "dev@example.com",
                "started_at": "2026-08-07T10:00:00Z",
                "completed_at": "2026-08-07T10:45:00Z",
                "total_score": 22.5,
                "max_score": 30,
                "status": "completed"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = PortalClient::new(&format!("{}/api", server.url())).unwrap();
    let result = client.fetch_attempt(7).await.unwrap();

    assert_eq!(result.percentage(), Some(75));
    assert!(result.completed_at.is_some());
}

#[tokio::test]
async fn non_success_status_becomes_typed_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/assessments/share/expired")
        .with_status(404)
        .create_async()
        .await;

    let client = PortalClient::new(&format!("{}/api", server.url())).unwrap();
    let err = client.fetch_shared_assessment("expired").await.unwrap_err();

    match err {
        ApiError::Status { status, endpoint } => {
            assert_eq!(status, 404);
            assert_eq!(endpoint, "/api/assessments/share/expired");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[test]
fn base_url_without_trailing_slash_keeps_its_path() {
    let client = PortalClient::new("http://localhost:8000/api").unwrap();
    // Exercised indirectly by every mock above; this guards the parse path.
    drop(client);

    let err = PortalClient::new("not a url").unwrap_err();
    assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
}
