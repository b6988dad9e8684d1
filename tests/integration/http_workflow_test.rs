// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{outcome_blocks, pool};
use quizload::quiz_api::HttpQuizApi;
use quizload::workers::LoadTestManager;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_quiz_service(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session/create"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"session_id": "ssid-e2e", "message": "created"})),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/quiz/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "ssid-e2e",
            "questions": [
                {"ques_id": "q1", "question": "Which keyword declares a constant?", "options": ["const", "let"]},
                {"ques_id": "q2", "question": "Which macro prints a line?", "options": ["println!"]}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/quiz/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"score": 2})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sessions/ssid-e2e/report"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 report".to_vec()))
        .mount(server)
        .await;
}

/// 通过HTTP客户端完成一次完整的用户流程
#[tokio::test]
async fn full_workflow_over_http() {
    let server = MockServer::start().await;
    mount_quiz_service(&server).await;
    Mock::given(method("POST"))
        .and(path("/sessions/ssid-e2e/email-report"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let reports_dir = dir.path().join("reports");
    let results_path = dir.path().join("results.txt");
    let api = HttpQuizApi::new(
        &server.uri(),
        &server.uri(),
        Duration::from_secs(5),
        &reports_dir,
    )
    .unwrap();

    let report = LoadTestManager::new(Arc::new(api), &results_path)
        .run(1, &pool(&["test1@example.com"]), &pool(&["rust"]))
        .await
        .unwrap();

    assert_eq!(report.summary.total, 1);
    assert_eq!(report.summary.completed, 1);

    let contents = std::fs::read_to_string(&results_path).unwrap();
    let blocks = outcome_blocks(&contents);
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].contains("Session ID: ssid-e2e"));
    assert!(blocks[0].contains("Score: 2"));
    assert!(blocks[0].contains("Status: completed"));
    assert!(blocks[0].contains("q2: println!"));
    assert!(blocks[0].contains("ssid-e2e_report.pdf"));

    let saved = std::fs::read(reports_dir.join("ssid-e2e_report.pdf")).unwrap();
    assert_eq!(saved, b"%PDF-1.4 report");
}

/// 邮件接口拒绝时报告路径仍被保留
#[tokio::test]
async fn rejected_email_report_keeps_report_path() {
    let server = MockServer::start().await;
    mount_quiz_service(&server).await;
    Mock::given(method("POST"))
        .and(path("/sessions/ssid-e2e/email-report"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"statusCode": 400, "message": "no email on file"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let results_path = dir.path().join("results.txt");
    let api = HttpQuizApi::new(
        &server.uri(),
        &server.uri(),
        Duration::from_secs(5),
        dir.path().join("reports"),
    )
    .unwrap();

    let report = LoadTestManager::new(Arc::new(api), &results_path)
        .run(1, &pool(&["test1@example.com"]), &pool(&["rust"]))
        .await
        .unwrap();

    assert_eq!(report.summary.failed, 1);
    let contents = std::fs::read_to_string(&results_path).unwrap();
    assert!(contents.contains("ssid-e2e_report.pdf"));
    assert!(contents.contains("no email on file"));
    assert!(contents.contains("Status: failed"));
}

/// 服务不可用时每个用户都记录一条启动失败
#[tokio::test]
async fn unavailable_service_records_start_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session/create"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let results_path = dir.path().join("results.txt");
    let api = HttpQuizApi::new(
        &server.uri(),
        &server.uri(),
        Duration::from_secs(5),
        dir.path().join("reports"),
    )
    .unwrap();

    let report = LoadTestManager::new(Arc::new(api), &results_path)
        .run(
            3,
            &pool(&["test1@example.com", "test2@example.com"]),
            &pool(&["go"]),
        )
        .await
        .unwrap();

    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.failed, 3);
    let contents = std::fs::read_to_string(&results_path).unwrap();
    assert_eq!(contents.matches("Error while starting").count(), 3);
    assert!(contents.contains("status code: 500"));
}
