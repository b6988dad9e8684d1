// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod stub_quiz_api;

pub use stub_quiz_api::{FailureMode, StubQuizApi};

pub fn pool(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// 按结果块拆分结果文件，最后一块为汇总
pub fn outcome_blocks(contents: &str) -> Vec<&str> {
    contents
        .split("-----------------------------------------------\n")
        .filter(|block| block.contains("Email: "))
        .collect()
}
