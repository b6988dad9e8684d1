// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::session::SessionStatus;
use crate::quiz_api::traits::QuizApiError;
use thiserror::Error;

/// 工作流阶段错误类型
///
/// 记录在 `Session.error` 中，描述某个用户的工作流在哪个阶段失败
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("failed to start session for email: {email} on topic: {topic}: {source}")]
    CreateSession {
        email: String,
        topic: String,
        #[source]
        source: QuizApiError,
    },

    #[error("failed to start quiz: {0}")]
    StartQuiz(#[source] QuizApiError),

    #[error("no questions received for session ID: {0}")]
    NoQuestions(String),

    #[error("no options available for question ID: {0}")]
    NoOptions(String),

    #[error("failed to submit quiz: {0}")]
    SubmitQuiz(#[source] QuizApiError),

    #[error("failed to get report: {0}")]
    Report(#[source] QuizApiError),

    #[error("failed to get email report: {0}")]
    EmailReport(#[source] QuizApiError),

    /// 报告与邮件请求同时失败，按工作流顺序先记录报告错误
    #[error("report and email requests both failed: report: {report}; email: {email}")]
    FollowUpFailed {
        report: Box<WorkerError>,
        email: Box<WorkerError>,
    },

    #[error("worker for email: {email} on topic: {topic} panicked: {message}")]
    Panicked {
        email: String,
        topic: String,
        message: String,
    },

    #[error("内部错误: {0}")]
    InternalError(String),
}

/// 会话状态错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid session status transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },
}

/// 压测运行错误类型
///
/// 结果文件写入失败属于致命错误，没有恢复路径
#[derive(Error, Debug)]
pub enum LoadTestError {
    #[error("results file error: {0}")]
    ResultsFile(#[from] std::io::Error),

    #[error("aggregator task failed: {0}")]
    AggregatorJoin(#[from] tokio::task::JoinError),

    #[error("invalid workload: {0}")]
    InvalidWorkload(String),
}
