// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 包括单用户工作流、错误与结果聚合器、完成计数器和压测管理器
pub mod error_aggregator;
pub mod manager;
pub mod result_aggregator;
pub mod session_worker;
pub mod tracker;

pub use error_aggregator::ErrorAggregator;
pub use manager::{LoadTestManager, RunReport};
pub use result_aggregator::ResultAggregator;
pub use session_worker::{SessionWorker, WorkerOutcome, WorkflowStage};
pub use tracker::CompletionTracker;
