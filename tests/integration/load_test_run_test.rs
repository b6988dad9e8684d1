// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{outcome_blocks, pool, FailureMode, StubQuizApi};
use quizload::workers::LoadTestManager;
use std::sync::Arc;

/// 全部成功时每个用户恰好一条结果
#[tokio::test]
async fn every_user_gets_exactly_one_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.txt");
    let api = Arc::new(StubQuizApi::succeeding());

    let report = LoadTestManager::new(api.clone(), &path)
        .run(
            25,
            &pool(&["test1@example.com", "test2@example.com", "test3@example.com"]),
            &pool(&["go", "rust"]),
        )
        .await
        .unwrap();

    assert_eq!(report.summary.total, 25);
    assert_eq!(report.summary.completed, 25);
    assert_eq!(report.summary.failed, 0);
    assert_eq!(api.sessions_created(), 25);
    assert_eq!(api.submissions(), 25);

    let contents = std::fs::read_to_string(&path).unwrap();
    let blocks = outcome_blocks(&contents);
    assert_eq!(blocks.len(), 25);
    for n in 0..25 {
        let header = format!("Session ID: ssid-{}-", n);
        assert_eq!(contents.matches(&header).count(), 1, "missing {}", header);
    }
    assert!(contents.contains("Total Sessions: 25"));
    assert!(contents.contains(&format!("Check {} for all logs", path.display())));
}

/// 邮箱和主题按下标轮转分配
#[tokio::test]
async fn emails_and_topics_assigned_round_robin() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(StubQuizApi::succeeding());
    let emails = pool(&["a@example.com", "b@example.com"]);
    let topics = pool(&["go", "rust", "lua"]);

    LoadTestManager::new(api.clone(), dir.path().join("results.txt"))
        .run(6, &emails, &topics)
        .await
        .unwrap();

    let mut assignments = api.assignments();
    assignments.sort();
    let mut expected: Vec<(String, String)> = (0..6)
        .map(|i| (emails[i % 2].clone(), topics[i % 3].clone()))
        .collect();
    expected.sort();
    assert_eq!(assignments, expected);
}

/// 零用户仍然写出汇总
#[tokio::test]
async fn zero_users_writes_empty_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("results.txt");

    let report = LoadTestManager::new(Arc::new(StubQuizApi::succeeding()), &path)
        .run(0, &[], &[])
        .await
        .unwrap();

    assert_eq!(report.summary.total, 0);
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(outcome_blocks(&contents).is_empty());
    assert!(contents.contains("Total Sessions: 0"));
    assert!(contents.contains("Average Time Taken per session: 0.00 ms (0.00 seconds)"));
}

/// 创建会话失败的用户记录为没有会话ID的失败结果
#[tokio::test]
async fn create_session_failure_recorded_without_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.txt");
    let api = Arc::new(StubQuizApi::new(FailureMode::CreateSessionFor(
        "bad@example.com".to_string(),
    )));

    let report = LoadTestManager::new(api.clone(), &path)
        .run(4, &pool(&["good@example.com", "bad@example.com"]), &pool(&["go"]))
        .await
        .unwrap();

    assert_eq!(report.summary.total, 4);
    assert_eq!(report.summary.completed, 2);
    assert_eq!(report.summary.failed, 2);

    let contents = std::fs::read_to_string(&path).unwrap();
    let failed: Vec<_> = outcome_blocks(&contents)
        .into_iter()
        .filter(|block| block.contains("Error while starting"))
        .collect();
    assert_eq!(failed.len(), 2);
    for block in failed {
        assert!(block.contains("Email: bad@example.com"));
        assert!(block.contains("Status: failed"));
        assert!(block.contains("create_session unavailable"));
        assert!(block.contains("APIs Time Taken: not available"));
    }
}

/// 开始测验失败保留已分配的会话ID
#[tokio::test]
async fn start_quiz_failure_keeps_session_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.txt");

    let report = LoadTestManager::new(Arc::new(StubQuizApi::new(FailureMode::StartQuiz)), &path)
        .run(3, &pool(&["test1@example.com"]), &pool(&["go"]))
        .await
        .unwrap();

    assert_eq!(report.summary.failed, 3);
    let contents = std::fs::read_to_string(&path).unwrap();
    let blocks = outcome_blocks(&contents);
    assert_eq!(blocks.len(), 3);
    for block in blocks {
        assert!(block.contains("Session ID: ssid-"));
        assert!(block.contains("Status: failed"));
        assert!(block.contains("start_quiz unavailable"));
    }
}

/// 空题目列表属于失败
#[tokio::test]
async fn empty_question_list_fails_session() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(StubQuizApi::new(FailureMode::NoQuestions));

    let report = LoadTestManager::new(api.clone(), dir.path().join("results.txt"))
        .run(2, &pool(&["test1@example.com"]), &pool(&["go"]))
        .await
        .unwrap();

    assert_eq!(report.summary.failed, 2);
    assert_eq!(api.submissions(), 0);
}

/// 报告与邮件同时失败时每个用户仍只有一条结果
#[tokio::test]
async fn follow_up_double_failure_yields_single_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.txt");

    let report = LoadTestManager::new(
        Arc::new(StubQuizApi::new(FailureMode::ReportAndEmail)),
        &path,
    )
    .run(5, &pool(&["test1@example.com"]), &pool(&["go"]))
    .await
    .unwrap();

    assert_eq!(report.summary.total, 5);
    assert_eq!(report.summary.failed, 5);

    let contents = std::fs::read_to_string(&path).unwrap();
    let blocks = outcome_blocks(&contents);
    assert_eq!(blocks.len(), 5);
    for block in blocks {
        assert_eq!(block.matches("Error: ").count(), 1);
        let report_pos = block.find("get_report unavailable").unwrap();
        let email_pos = block.find("get_email_report unavailable").unwrap();
        assert!(report_pos < email_pos);
    }
}

/// 仅报告失败时分数已记录
#[tokio::test]
async fn report_failure_keeps_score() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.txt");

    LoadTestManager::new(Arc::new(StubQuizApi::new(FailureMode::Report)), &path)
        .run(1, &pool(&["test1@example.com"]), &pool(&["go"]))
        .await
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Score: 2"));
    assert!(contents.contains("Status: failed"));
    assert!(contents.contains("Questions-Answers: [q1: "));
}
