// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::failure::WorkerFailure;
use crate::domain::models::session::Session;
use crate::quiz_api::traits::QuizApi;
use crate::reporting::summary::RunSummary;
use crate::utils::errors::LoadTestError;
use crate::workers::error_aggregator::ErrorAggregator;
use crate::workers::result_aggregator::ResultAggregator;
use crate::workers::session_worker::SessionWorker;
use crate::workers::tracker::CompletionTracker;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// 一次完整压测的结果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    /// 从启动第一个工作器到最后一个工作器结束
    pub workers_elapsed: Duration,
    /// 包含聚合器排空与汇总写入的总耗时
    pub total_elapsed: Duration,
}

/// 压测管理器
///
/// 持有共享通道和完成计数器，先启动两个聚合器再派发工作器，
/// 最后按两阶段顺序关闭：先关闭错误通道并等待错误聚合器，再关闭结果通道并等待结果聚合器
pub struct LoadTestManager {
    api: Arc<dyn QuizApi>,
    results_path: PathBuf,
    run_id: Uuid,
    tracker: CompletionTracker,
    failures_tx: Option<mpsc::Sender<WorkerFailure>>,
    results_tx: Option<mpsc::Sender<Session>>,
    error_aggregator: Option<JoinHandle<usize>>,
    result_aggregator: Option<JoinHandle<Result<RunSummary, LoadTestError>>>,
    handles: Vec<JoinHandle<()>>,
}

impl LoadTestManager {
    pub fn new(api: Arc<dyn QuizApi>, results_path: impl Into<PathBuf>) -> Self {
        Self {
            api,
            results_path: results_path.into(),
            run_id: Uuid::new_v4(),
            tracker: CompletionTracker::new(),
            failures_tx: None,
            results_tx: None,
            error_aggregator: None,
            result_aggregator: None,
            handles: Vec::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// 仍在运行的工作器数量
    pub fn active_workers(&self) -> usize {
        self.tracker.active()
    }

    /// 启动工作器
    ///
    /// 第 i 个用户使用 `emails[i % len]` 和 `topics[i % len]`，立即返回不等待工作器
    ///
    /// # 参数
    ///
    /// * `num_users` - 虚拟用户数量
    /// * `emails` - 邮箱池
    /// * `topics` - 主题池
    pub fn start(
        &mut self,
        num_users: usize,
        emails: &[String],
        topics: &[String],
    ) -> Result<(), LoadTestError> {
        if num_users > 0 && (emails.is_empty() || topics.is_empty()) {
            return Err(LoadTestError::InvalidWorkload(format!(
                "{} users requested but email pool has {} entries and topic pool has {}",
                num_users,
                emails.len(),
                topics.len()
            )));
        }

        let (failures_tx, results_tx) = self.ensure_aggregators(num_users);
        info!(run_id = %self.run_id, num_users, "Starting user simulations");

        for i in 0..num_users {
            let email = emails[i % emails.len()].clone();
            let topic = topics[i % topics.len()].clone();
            let worker = SessionWorker::new(self.api.clone(), failures_tx.clone(), results_tx.clone());
            let guard = self.tracker.add();
            let span = info_span!("user", run_id = %self.run_id, user = i, email = %email, topic = %topic);

            let handle = tokio::spawn(
                async move {
                    worker.run(email, topic).await;
                    // Release the channel handles before signalling completion
                    drop(worker);
                    drop(guard);
                }
                .instrument(span),
            );
            self.handles.push(handle);
        }

        Ok(())
    }

    /// 等待所有工作器结束
    pub async fn wait_for_workers(&self) {
        self.tracker.wait().await;
        info!(run_id = %self.run_id, "All user simulations finished");
    }

    /// 两阶段关闭
    ///
    /// # Panics
    ///
    /// 仍有工作器在运行时调用会 panic
    pub async fn shutdown(mut self) -> Result<RunSummary, LoadTestError> {
        let active = self.tracker.active();
        assert!(
            active == 0,
            "shutdown called while {} user simulations are still running; call wait_for_workers first",
            active
        );
        self.handles.clear();

        // Aggregators still own the results file even when no user was started
        self.ensure_aggregators(1);

        info!(run_id = %self.run_id, "Closing error channel");
        self.failures_tx.take();
        if let Some(handle) = self.error_aggregator.take() {
            let forwarded = handle.await?;
            info!(run_id = %self.run_id, forwarded, "Error aggregator drained");
        }

        info!(run_id = %self.run_id, "Closing result channel");
        self.results_tx.take();
        let summary = match self.result_aggregator.take() {
            Some(handle) => handle.await??,
            None => RunSummary::default(),
        };

        info!(run_id = %self.run_id, total = summary.total, "Load test shut down");
        Ok(summary)
    }

    /// 启动、等待并关闭，返回两段耗时
    pub async fn run(
        mut self,
        num_users: usize,
        emails: &[String],
        topics: &[String],
    ) -> Result<RunReport, LoadTestError> {
        let started = Instant::now();
        self.start(num_users, emails, topics)?;
        self.wait_for_workers().await;
        let workers_elapsed = started.elapsed();

        let summary = self.shutdown().await?;
        Ok(RunReport {
            summary,
            workers_elapsed,
            total_elapsed: started.elapsed(),
        })
    }

    fn ensure_aggregators(
        &mut self,
        num_users: usize,
    ) -> (mpsc::Sender<WorkerFailure>, mpsc::Sender<Session>) {
        if let (Some(failures_tx), Some(results_tx)) = (&self.failures_tx, &self.results_tx) {
            return (failures_tx.clone(), results_tx.clone());
        }

        let (failures_tx, failures_rx) = mpsc::channel(1);
        let (results_tx, results_rx) = mpsc::channel(num_users.max(1));

        self.result_aggregator = Some(tokio::spawn(
            ResultAggregator::new(results_rx, self.results_path.clone()).run(),
        ));
        self.error_aggregator = Some(tokio::spawn(
            ErrorAggregator::new(failures_rx, results_tx.clone()).run(),
        ));

        self.failures_tx = Some(failures_tx.clone());
        self.results_tx = Some(results_tx.clone());
        (failures_tx, results_tx)
    }
}
