// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::quiz::{Answer, Question};
use crate::utils::errors::{SessionError, WorkerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 会话实体
///
/// 一个虚拟用户的一次完整测验流程记录。由工作器在会话创建成功后生成，
/// 随各阶段完成逐步填充，最终以完成或失败状态发送到结果通道，且只发送一次。
#[derive(Debug)]
pub struct Session {
    /// 会话ID，由远端服务分配；会话创建前失败时为空
    pub id: String,
    /// 用户邮箱
    pub email: String,
    /// 测验主题
    pub topic: String,
    /// 合成用户ID
    pub user_id: String,
    /// 开始时间（毫秒时间戳）
    pub start_time: i64,
    /// 结束时间（毫秒时间戳）
    pub end_time: i64,
    /// 收到的题目
    pub questions: Vec<Question>,
    /// 作答记录
    pub answers: Vec<Answer>,
    /// 得分
    pub score: i64,
    /// 报告引用（本地文件路径）
    pub report: String,
    /// 会话状态，只能通过 `advance`/`fail`/`complete` 推进
    status: SessionStatus,
    /// 失败原因
    pub error: Option<WorkerError>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 各接口耗时；会话未创建时不存在
    pub latencies: Option<ApiLatencies>,
}

/// 会话状态
///
/// 状态只能前进：
/// Created → Started → Completed，任意非终态都可以直接进入 Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Created,
    Started,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }

    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::Created, SessionStatus::Started)
                | (SessionStatus::Created, SessionStatus::Failed)
                | (SessionStatus::Started, SessionStatus::Completed)
                | (SessionStatus::Started, SessionStatus::Failed)
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SessionStatus::Created => write!(f, "created"),
            SessionStatus::Started => write!(f, "started"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// 各接口调用耗时（毫秒）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiLatencies {
    pub session_creation: u64,
    pub start_quiz: u64,
    pub submit_quiz: u64,
    pub report_api: u64,
    pub email_api: u64,
}

/// 当前毫秒时间戳
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl Session {
    /// 会话创建成功后生成会话记录
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        topic: impl Into<String>,
        start_time: i64,
    ) -> Self {
        let email = email.into();
        Self {
            id: id.into(),
            user_id: format!("user_{}", email),
            email,
            topic: topic.into(),
            start_time,
            end_time: 0,
            questions: Vec::new(),
            answers: Vec::new(),
            score: 0,
            report: String::new(),
            status: SessionStatus::Created,
            error: None,
            created_at: Utc::now(),
            latencies: Some(ApiLatencies::default()),
        }
    }

    /// 会话创建前失败的结果记录，只包含邮箱和主题
    pub fn pre_session_failure(
        email: impl Into<String>,
        topic: impl Into<String>,
        error: WorkerError,
    ) -> Self {
        Self {
            id: String::new(),
            email: email.into(),
            topic: topic.into(),
            user_id: String::new(),
            start_time: 0,
            end_time: 0,
            questions: Vec::new(),
            answers: Vec::new(),
            score: 0,
            report: String::new(),
            status: SessionStatus::Failed,
            error: Some(error),
            created_at: Utc::now(),
            latencies: None,
        }
    }

    /// 无法归类的失败结果记录
    pub fn unclassified_failure(error: WorkerError) -> Self {
        Self::pre_session_failure(String::new(), String::new(), error)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// 推进会话状态，拒绝回退以及离开终态的转换
    pub fn advance(&mut self, next: SessionStatus) -> Result<(), SessionError> {
        if !self.status.can_transition_to(next) {
            return Err(SessionError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// 标记失败并记录结束时间
    pub fn fail(&mut self, error: WorkerError) -> Result<(), SessionError> {
        self.advance(SessionStatus::Failed)?;
        self.error = Some(error);
        self.end_time = now_millis();
        Ok(())
    }

    /// 标记完成并记录结束时间
    pub fn complete(&mut self) -> Result<(), SessionError> {
        self.advance(SessionStatus::Completed)?;
        self.end_time = now_millis();
        Ok(())
    }

    /// 耗时（毫秒）
    pub fn elapsed_ms(&self) -> i64 {
        self.end_time - self.start_time
    }

    pub fn latencies_mut(&mut self) -> &mut ApiLatencies {
        self.latencies.get_or_insert_with(ApiLatencies::default)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
