// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::quiz::{Answer, Question};
use async_trait::async_trait;
use thiserror::Error;

/// 测验接口错误类型
#[derive(Error, Debug)]
pub enum QuizApiError {
    /// 请求参数不合法，请求未发出
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// 请求失败（连接、超时等）
    #[error("request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非预期的状态码
    #[error("failed to {operation}, status code: {status}")]
    UnexpectedStatus { operation: &'static str, status: u16 },
    /// 服务端返回的错误响应
    #[error("failed to {operation}, status code: {status}, message: {message}")]
    ErrorResponse {
        operation: &'static str,
        status: u16,
        message: String,
    },
    /// 响应内容不合法
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// 本地文件读写错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuizApiError {
    /// 判断是否为超时错误
    pub fn is_timeout(&self) -> bool {
        matches!(self, QuizApiError::RequestFailed(e) if e.is_timeout())
    }
}

/// 测验服务接口
///
/// 每个虚拟用户的工作流依次调用这五个接口
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// 创建会话，返回会话ID
    async fn create_session(&self, email: &str, topic: &str) -> Result<String, QuizApiError>;

    /// 开始测验，返回题目列表
    async fn start_quiz(&self, session_id: &str, topic: &str)
        -> Result<Vec<Question>, QuizApiError>;

    /// 提交答案，返回得分
    async fn submit_quiz(&self, session_id: &str, answers: &[Answer])
        -> Result<i64, QuizApiError>;

    /// 获取报告，返回报告引用
    async fn get_report(&self, session_id: &str) -> Result<String, QuizApiError>;

    /// 请求邮件报告，返回确认信息
    async fn get_email_report(&self, session_id: &str) -> Result<String, QuizApiError>;
}
