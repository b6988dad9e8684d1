// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::failure::WorkerFailure;
use crate::domain::models::session::Session;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// 错误聚合器
///
/// 消费失败载荷直到通道关闭，每个失败转换为一条结果记录并转发到结果通道
pub struct ErrorAggregator {
    failures: mpsc::Receiver<WorkerFailure>,
    results: mpsc::Sender<Session>,
}

impl ErrorAggregator {
    pub fn new(failures: mpsc::Receiver<WorkerFailure>, results: mpsc::Sender<Session>) -> Self {
        Self { failures, results }
    }

    /// 运行聚合器
    ///
    /// 输入通道关闭且排空后返回已处理的失败数量
    pub async fn run(mut self) -> usize {
        info!("Error aggregator started");
        let mut processed = 0;

        while let Some(failure) = self.failures.recv().await {
            let kind = failure.kind();
            let outcome = failure.into_outcome();
            debug!(kind, session_id = %outcome.id, email = %outcome.email, "Forwarding failed outcome");

            // Keep draining even if the result side is gone so workers never block
            if let Err(e) = self.results.send(outcome).await {
                error!(kind, session_id = %e.0.id, "Result channel closed, outcome dropped");
                continue;
            }
            processed += 1;
        }

        info!(processed, "Error aggregator finished");
        processed
    }
}
