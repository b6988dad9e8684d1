// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::session::Session;
use crate::utils::errors::WorkerError;

/// 工作器失败载荷
///
/// 每个变体携带各自需要的字段，由错误聚合器转换为结果记录
#[derive(Debug)]
pub enum WorkerFailure {
    /// 会话创建前失败，此时还没有会话记录
    PreSession {
        email: String,
        topic: String,
        error: WorkerError,
    },
    /// 会话内失败，携带失败前已填充的会话
    InSession(Session),
    /// 无法归类的失败
    Unclassified(WorkerError),
}

impl WorkerFailure {
    /// 转换为结果记录
    pub fn into_outcome(self) -> Session {
        match self {
            WorkerFailure::PreSession {
                email,
                topic,
                error,
            } => Session::pre_session_failure(email, topic, error),
            WorkerFailure::InSession(session) => session,
            WorkerFailure::Unclassified(error) => Session::unclassified_failure(error),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WorkerFailure::PreSession { .. } => "pre_session",
            WorkerFailure::InSession(_) => "in_session",
            WorkerFailure::Unclassified(_) => "unclassified",
        }
    }
}
