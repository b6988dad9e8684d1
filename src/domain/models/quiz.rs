// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 测验题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 题目ID
    #[serde(rename = "ques_id")]
    pub id: String,
    /// 题目内容
    #[serde(rename = "question", default)]
    pub text: String,
    /// 候选项
    #[serde(default)]
    pub options: Vec<String>,
}

/// 作答记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// 题目ID
    #[serde(rename = "ques_id")]
    pub question_id: String,
    /// 选中的答案
    pub answer: String,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            answer: answer.into(),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.question_id, self.answer)
    }
}
