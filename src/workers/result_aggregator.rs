// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::session::Session;
use crate::infrastructure::results_file::ResultsFile;
use crate::reporting::record::{format_outcome, format_summary};
use crate::reporting::summary::{RunSummary, SummaryAccumulator};
use crate::utils::errors::LoadTestError;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// 结果聚合器
///
/// 唯一的结果文件写入者。每条结果追加一个文本块，输入通道关闭后追加汇总块。
/// 写入失败属于致命错误，聚合器立即停止并返回错误。
pub struct ResultAggregator {
    outcomes: mpsc::Receiver<Session>,
    results_path: PathBuf,
}

impl ResultAggregator {
    pub fn new(outcomes: mpsc::Receiver<Session>, results_path: impl Into<PathBuf>) -> Self {
        Self {
            outcomes,
            results_path: results_path.into(),
        }
    }

    /// 运行聚合器，返回运行汇总
    pub async fn run(mut self) -> Result<RunSummary, LoadTestError> {
        info!(path = %self.results_path.display(), "Result aggregator started");

        let mut file = ResultsFile::create(&self.results_path).await.map_err(|e| {
            error!(path = %self.results_path.display(), "Failed to create results file: {}", e);
            LoadTestError::from(e)
        })?;
        let mut accumulator = SummaryAccumulator::new();

        while let Some(outcome) = self.outcomes.recv().await {
            accumulator.record(outcome.elapsed_ms(), outcome.status());
            debug!(
                session_id = %outcome.id,
                status = %outcome.status(),
                recorded = accumulator.len(),
                "Recording outcome"
            );

            if let Err(e) = file.append(&format_outcome(&outcome)).await {
                error!("Failed to write to results file: {}", e);
                return Err(e.into());
            }
        }

        let summary = accumulator.finish();
        let block = format_summary(
            summary.total,
            summary.average_ms,
            &file.path().display().to_string(),
        );
        print!("{}", block);

        if let Err(e) = file.append(&block).await {
            error!("Failed to write summary to results file: {}", e);
            return Err(e.into());
        }

        info!(
            total = summary.total,
            completed = summary.completed,
            failed = summary.failed,
            average_ms = summary.average_ms,
            "Result aggregator finished"
        );
        Ok(summary)
    }
}
