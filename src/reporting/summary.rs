// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::session::SessionStatus;
use serde::Serialize;

/// 运行汇总统计
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// 结果总数
    pub total: usize,
    /// 完成数
    pub completed: usize,
    /// 失败数
    pub failed: usize,
    /// 平均耗时（毫秒），没有结果时为0
    pub average_ms: f64,
}

/// 耗时样本累加器
#[derive(Debug, Default)]
pub struct SummaryAccumulator {
    samples: Vec<i64>,
    completed: usize,
    failed: usize,
}

impl SummaryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, elapsed_ms: i64, status: SessionStatus) {
        self.samples.push(elapsed_ms);
        match status {
            SessionStatus::Completed => self.completed += 1,
            SessionStatus::Failed => self.failed += 1,
            _ => {}
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn finish(&self) -> RunSummary {
        RunSummary {
            total: self.samples.len(),
            completed: self.completed,
            failed: self.failed,
            average_ms: mean(&self.samples),
        }
    }
}

/// 算术平均值，空样本返回0
pub fn mean(samples: &[i64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let total: i64 = samples.iter().sum();
    total as f64 / samples.len() as f64
}
