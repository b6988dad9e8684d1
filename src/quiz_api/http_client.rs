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

use crate::config::settings::Settings;
use crate::domain::models::quiz::{Answer, Question};
use crate::quiz_api::dto::{
    CreateSessionRequest, CreateSessionResponse, ReportErrorResponse, StartQuizRequest,
    StartQuizResponse, SubmitQuizRequest, SubmitQuizResponse,
};
use crate::quiz_api::traits::{QuizApi, QuizApiError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;
use validator::ValidateEmail;

/// 接口地址
#[derive(Debug, Clone)]
struct Endpoints {
    create_session: String,
    start_quiz: String,
    submit_quiz: String,
    report_base: Url,
}

impl Endpoints {
    fn new(base_url: &str, report_server_base_url: &str) -> Result<Self, QuizApiError> {
        let base_url = base_url.trim_end_matches('/');
        let report_base = Url::parse(report_server_base_url).map_err(|e| {
            QuizApiError::InvalidInput(format!(
                "invalid report server URL {}: {}",
                report_server_base_url, e
            ))
        })?;
        if report_base.cannot_be_a_base() {
            return Err(QuizApiError::InvalidInput(format!(
                "report server URL cannot be a base: {}",
                report_server_base_url
            )));
        }

        Ok(Self {
            create_session: format!("{}/session/create", base_url),
            start_quiz: format!("{}/quiz/start", base_url),
            submit_quiz: format!("{}/quiz/submit", base_url),
            report_base,
        })
    }

    fn report(&self, session_id: &str) -> Result<Url, QuizApiError> {
        self.session_url(session_id, "report")
    }

    fn email_report(&self, session_id: &str) -> Result<Url, QuizApiError> {
        self.session_url(session_id, "email-report")
    }

    /// `{report_base}/sessions/{session_id}/{action}`，会话ID作为单个路径段编码
    fn session_url(&self, session_id: &str, action: &str) -> Result<Url, QuizApiError> {
        validate_session_id(session_id)?;

        let mut url = self.report_base.clone();
        url.path_segments_mut()
            .map_err(|_| QuizApiError::InvalidInput("report server URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["sessions", session_id, action]);
        Ok(url)
    }
}

/// 测验服务HTTP客户端
///
/// 基于reqwest实现，所有请求共享一个客户端和统一的超时时间
pub struct HttpQuizApi {
    client: Client,
    endpoints: Endpoints,
    reports_dir: PathBuf,
}

impl HttpQuizApi {
    /// 创建新的客户端实例
    ///
    /// # 参数
    ///
    /// * `base_url` - 测验服务地址
    /// * `report_server_base_url` - 报告服务地址
    /// * `timeout` - 单次请求超时时间
    /// * `reports_dir` - 报告文件保存目录
    pub fn new(
        base_url: &str,
        report_server_base_url: &str,
        timeout: Duration,
        reports_dir: impl Into<PathBuf>,
    ) -> Result<Self, QuizApiError> {
        let client = Client::builder()
            .user_agent(concat!("quizload/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoints: Endpoints::new(base_url, report_server_base_url)?,
            reports_dir: reports_dir.into(),
        })
    }

    /// 根据配置创建客户端
    pub fn from_settings(settings: &Settings) -> Result<Self, QuizApiError> {
        Self::new(
            &settings.quiz_api.base_url,
            &settings.quiz_api.report_server_base_url,
            Duration::from_secs(settings.quiz_api.timeout_secs),
            &settings.output.reports_dir,
        )
    }

    async fn save_report(&self, session_id: &str, mut response: Response) -> Result<String, QuizApiError> {
        fs::create_dir_all(&self.reports_dir).await?;
        let file_path = report_file_path(&self.reports_dir, session_id)?;

        let mut file = fs::File::create(&file_path).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(file_path.display().to_string())
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn create_session(&self, email: &str, topic: &str) -> Result<String, QuizApiError> {
        validate_create_session_inputs(email, topic)?;

        let response = self
            .client
            .post(&self.endpoints.create_session)
            .json(&CreateSessionRequest { email, topic })
            .send()
            .await?;

        expect_status(&response, StatusCode::OK, "create session")?;

        let body: CreateSessionResponse = response
            .json()
            .await
            .map_err(|e| QuizApiError::InvalidResponse(format!("failed to decode response: {}", e)))?;

        if body.session_id.is_empty() {
            return Err(QuizApiError::InvalidResponse(format!(
                "session ID is empty in response: {}",
                body.message
            )));
        }
        validate_session_id(&body.session_id).map_err(|e| {
            QuizApiError::InvalidResponse(format!("rejected session ID from server: {}", e))
        })?;

        debug!(email, topic, session_id = %body.session_id, "Session created");
        Ok(body.session_id)
    }

    async fn start_quiz(
        &self,
        session_id: &str,
        topic: &str,
    ) -> Result<Vec<Question>, QuizApiError> {
        validate_start_quiz_inputs(session_id, topic)?;

        let response = self
            .client
            .post(&self.endpoints.start_quiz)
            .json(&StartQuizRequest {
                ssid: session_id,
                topic,
            })
            .send()
            .await?;

        expect_status(&response, StatusCode::OK, "start quiz")?;

        let body: StartQuizResponse = response
            .json()
            .await
            .map_err(|e| QuizApiError::InvalidResponse(format!("failed to decode response: {}", e)))?;

        if body.session_id.is_empty() || body.questions.is_empty() {
            return Err(QuizApiError::InvalidResponse(
                "session_id or questions are empty".to_string(),
            ));
        }

        Ok(body.questions)
    }

    async fn submit_quiz(&self, session_id: &str, answers: &[Answer]) -> Result<i64, QuizApiError> {
        validate_submit_quiz_inputs(session_id, answers)?;

        let response = self
            .client
            .post(&self.endpoints.submit_quiz)
            .json(&SubmitQuizRequest {
                session_id,
                answers,
            })
            .send()
            .await?;

        expect_status(&response, StatusCode::OK, "submit quiz")?;

        let body: SubmitQuizResponse = response
            .json()
            .await
            .map_err(|e| QuizApiError::InvalidResponse(format!("failed to decode response: {}", e)))?;

        if body.score < 0 {
            return Err(QuizApiError::InvalidResponse(format!(
                "invalid score received: {}",
                body.score
            )));
        }

        Ok(body.score)
    }

    async fn get_report(&self, session_id: &str) -> Result<String, QuizApiError> {
        let response = self.client.get(self.endpoints.report(session_id)?).send().await?;

        if response.status() != StatusCode::OK {
            let error = parse_error_response(response, "get report").await?;
            if error.status_code == 0 {
                return Err(QuizApiError::InvalidResponse(
                    "error response should have a valid statusCode".to_string(),
                ));
            }
            return Err(QuizApiError::ErrorResponse {
                operation: "get report",
                status: error.status_code,
                message: error.message,
            });
        }

        self.save_report(session_id, response).await
    }

    async fn get_email_report(&self, session_id: &str) -> Result<String, QuizApiError> {
        let response = self
            .client
            .post(self.endpoints.email_report(session_id)?)
            .send()
            .await?;

        if response.status() != StatusCode::ACCEPTED {
            let error = parse_error_response(response, "get email report").await?;
            return Err(QuizApiError::ErrorResponse {
                operation: "get email report",
                status: error.status_code,
                message: error.message,
            });
        }

        Ok("Email report request accepted".to_string())
    }
}

fn expect_status(
    response: &Response,
    expected: StatusCode,
    operation: &'static str,
) -> Result<(), QuizApiError> {
    if response.status() != expected {
        return Err(QuizApiError::UnexpectedStatus {
            operation,
            status: response.status().as_u16(),
        });
    }
    Ok(())
}

async fn parse_error_response(
    response: Response,
    operation: &'static str,
) -> Result<ReportErrorResponse, QuizApiError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        QuizApiError::InvalidResponse(format!(
            "failed to {}: status code {}, failed to parse error response body: {}",
            operation, status, e
        ))
    })
}

pub(crate) fn report_file_path(reports_dir: &Path, session_id: &str) -> Result<PathBuf, QuizApiError> {
    validate_session_id(session_id)?;
    Ok(reports_dir.join(format!("{}_report.pdf", session_id)))
}

/// 会话ID会出现在URL路径和报告文件名中，必须是单个普通路径段
pub(crate) fn validate_session_id(session_id: &str) -> Result<(), QuizApiError> {
    let mut components = Path::new(session_id).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if !single_normal || session_id.contains(['/', '\\']) || session_id.chars().any(char::is_control) {
        return Err(QuizApiError::InvalidInput(format!(
            "invalid session ID: {:?}",
            session_id
        )));
    }
    Ok(())
}

pub(crate) fn validate_create_session_inputs(email: &str, topic: &str) -> Result<(), QuizApiError> {
    if email.is_empty() || topic.is_empty() {
        return Err(QuizApiError::InvalidInput(
            "email and topic are required".to_string(),
        ));
    }
    if !email.validate_email() {
        return Err(QuizApiError::InvalidInput(format!(
            "invalid email format: {}",
            email
        )));
    }
    Ok(())
}

pub(crate) fn validate_start_quiz_inputs(session_id: &str, topic: &str) -> Result<(), QuizApiError> {
    if session_id.is_empty() {
        return Err(QuizApiError::InvalidInput("session ID is required".to_string()));
    }
    if topic.is_empty() {
        return Err(QuizApiError::InvalidInput("topic is required".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_submit_quiz_inputs(
    session_id: &str,
    answers: &[Answer],
) -> Result<(), QuizApiError> {
    if session_id.is_empty() {
        return Err(QuizApiError::InvalidInput("session ID is required".to_string()));
    }
    if answers.is_empty() {
        return Err(QuizApiError::InvalidInput(
            "at least one answer is required".to_string(),
        ));
    }
    if answers
        .iter()
        .any(|a| a.question_id.is_empty() || a.answer.is_empty())
    {
        return Err(QuizApiError::InvalidInput(
            "each answer must have a question ID and an answer".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "http_client_test.rs"]
mod tests;
