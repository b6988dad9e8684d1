// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::quiz::{Answer, Question};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub email: &'a str,
    pub topic: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionResponse {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StartQuizRequest<'a> {
    pub ssid: &'a str,
    pub topic: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct StartQuizResponse {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizRequest<'a> {
    pub session_id: &'a str,
    pub answers: &'a [Answer],
}

#[derive(Debug, Deserialize)]
pub struct SubmitQuizResponse {
    pub score: i64,
}

/// 报告服务的错误响应
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportErrorResponse {
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
}
