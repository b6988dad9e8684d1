// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use quizload::domain::models::quiz::{Answer, Question};
use quizload::quiz_api::{QuizApi, QuizApiError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// 失败注入方式
#[derive(Debug, Clone, PartialEq)]
pub enum FailureMode {
    None,
    /// 指定邮箱创建会话失败
    CreateSessionFor(String),
    StartQuiz,
    NoQuestions,
    Report,
    ReportAndEmail,
}

pub struct StubQuizApi {
    mode: FailureMode,
    sessions: AtomicUsize,
    submissions: AtomicUsize,
    assignments: Mutex<Vec<(String, String)>>,
}

impl StubQuizApi {
    pub fn new(mode: FailureMode) -> Self {
        Self {
            mode,
            sessions: AtomicUsize::new(0),
            submissions: AtomicUsize::new(0),
            assignments: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(FailureMode::None)
    }

    pub fn sessions_created(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    /// 所有创建会话请求的 (email, topic)
    pub fn assignments(&self) -> Vec<(String, String)> {
        self.assignments.lock().unwrap().clone()
    }

    fn failure(operation: &'static str) -> QuizApiError {
        QuizApiError::ErrorResponse {
            operation,
            status: 503,
            message: format!("{} unavailable", operation),
        }
    }
}

#[async_trait]
impl QuizApi for StubQuizApi {
    async fn create_session(&self, email: &str, topic: &str) -> Result<String, QuizApiError> {
        self.assignments
            .lock()
            .unwrap()
            .push((email.to_string(), topic.to_string()));

        if let FailureMode::CreateSessionFor(target) = &self.mode {
            if target == email {
                return Err(Self::failure("create_session"));
            }
        }
        let n = self.sessions.fetch_add(1, Ordering::SeqCst);
        Ok(format!("ssid-{}", n))
    }

    async fn start_quiz(&self, _id: &str, _topic: &str) -> Result<Vec<Question>, QuizApiError> {
        match self.mode {
            FailureMode::StartQuiz => Err(Self::failure("start_quiz")),
            FailureMode::NoQuestions => Ok(Vec::new()),
            _ => Ok(vec![
                Question {
                    id: "q1".to_string(),
                    text: "first".to_string(),
                    options: vec!["a".to_string(), "b".to_string()],
                },
                Question {
                    id: "q2".to_string(),
                    text: "second".to_string(),
                    options: vec!["c".to_string()],
                },
            ]),
        }
    }

    async fn submit_quiz(&self, _id: &str, answers: &[Answer]) -> Result<i64, QuizApiError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        Ok(answers.len() as i64)
    }

    async fn get_report(&self, id: &str) -> Result<String, QuizApiError> {
        match self.mode {
            FailureMode::Report | FailureMode::ReportAndEmail => Err(Self::failure("get_report")),
            _ => Ok(format!("./tmp/reports/{}_report.pdf", id)),
        }
    }

    async fn get_email_report(&self, _id: &str) -> Result<String, QuizApiError> {
        match self.mode {
            FailureMode::ReportAndEmail => Err(Self::failure("get_email_report")),
            _ => Ok("Email report request accepted".to_string()),
        }
    }
}
