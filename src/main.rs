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

use quizload::config::settings::Settings;
use quizload::infrastructure::metrics;
use quizload::quiz_api::HttpQuizApi;
use quizload::utils::telemetry;
use quizload::workers::LoadTestManager;
use std::sync::Arc;
use tracing::info;

/// 主函数
///
/// 初始化日志、配置和客户端，运行一次完整压测并输出耗时
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting quizload...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!(
        num_users = settings.load.num_users,
        base_url = %settings.quiz_api.base_url,
        "Configuration loaded"
    );

    // 3. Metrics
    metrics::init_metrics(&settings.metrics);

    // 4. Quiz service client
    let api = Arc::new(HttpQuizApi::from_settings(&settings)?);

    // 5. Run
    let manager = LoadTestManager::new(api, &settings.output.results_path);
    info!(run_id = %manager.run_id(), "Load test starting");
    let report = manager
        .run(
            settings.load.num_users,
            &settings.load.emails,
            &settings.load.topics,
        )
        .await?;

    println!(
        "Total time taken to complete all sessions concurrently: {:.2} seconds",
        report.workers_elapsed.as_secs_f64()
    );
    println!(
        "Total time taken by test: {:.2} seconds",
        report.total_elapsed.as_secs_f64()
    );

    info!(
        total = report.summary.total,
        completed = report.summary.completed,
        failed = report.summary.failed,
        "Load test finished"
    );
    Ok(())
}
