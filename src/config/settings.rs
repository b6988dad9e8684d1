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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 默认邮箱池
pub const DEFAULT_EMAILS: [&str; 30] = [
    "test1@example.com",
    "test2@example.com",
    "test3@example.com",
    "test4@example.com",
    "test5@example.com",
    "test6@example.com",
    "test7@example.com",
    "test8@example.com",
    "test9@example.com",
    "test10@example.com",
    "test11@example.com",
    "test12@example.com",
    "test13@example.com",
    "test14@example.com",
    "test15@example.com",
    "test16@example.com",
    "test17@example.com",
    "test18@example.com",
    "test19@example.com",
    "test20@example.com",
    "test21@example.com",
    "test22@example.com",
    "test23@example.com",
    "test24@example.com",
    "test25@example.com",
    "test26@example.com",
    "test27@example.com",
    "test28@example.com",
    "test29@example.com",
    "test30@example.com",
];

/// 默认主题池
pub const DEFAULT_TOPICS: [&str; 13] = [
    "go",
    "java",
    "python",
    "c",
    "c++",
    "zig",
    "rust",
    "ocaml",
    "javascript",
    "ruby",
    "kotlin",
    "lua",
    "shell",
];

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 测验服务配置
    pub quiz_api: QuizApiSettings,
    /// 负载配置
    pub load: LoadSettings,
    /// 输出配置
    pub output: OutputSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 测验服务配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct QuizApiSettings {
    /// 测验服务地址
    pub base_url: String,
    /// 报告服务地址
    pub report_server_base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

/// 负载配置设置
///
/// 邮箱池与主题池加载后只读，由所有工作器共享
#[derive(Debug, Clone, Deserialize)]
pub struct LoadSettings {
    /// 虚拟用户数
    pub num_users: usize,
    /// 邮箱池
    pub emails: Vec<String>,
    /// 主题池
    pub topics: Vec<String>,
}

/// 输出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// 结果日志文件路径
    pub results_path: String,
    /// 报告文件保存目录
    pub reports_dir: String,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用Prometheus导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `QUIZLOAD__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").ok();
        let mut builder = Self::defaults()?;
        for name in config_files(env.as_deref()) {
            builder = builder.add_source(File::with_name(&name).required(false));
        }
        let builder = builder.add_source(
            Environment::with_prefix("QUIZLOAD")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("load.emails")
                .with_list_parse_key("load.topics")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 只包含默认值的配置构建器
    pub fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("quiz_api.base_url", "http://localhost:8080")?
            .set_default("quiz_api.report_server_base_url", "http://localhost:8070")?
            .set_default("quiz_api.timeout_secs", 60)?
            .set_default("load.num_users", 10)?
            .set_default("load.emails", DEFAULT_EMAILS.to_vec())?
            .set_default("load.topics", DEFAULT_TOPICS.to_vec())?
            .set_default("output.results_path", "./tmp/results.txt")?
            .set_default("output.reports_dir", "./tmp/reports")?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("quiz_api.base_url", &self.quiz_api.base_url),
            (
                "quiz_api.report_server_base_url",
                &self.quiz_api.report_server_base_url,
            ),
        ] {
            url::Url::parse(value)
                .map_err(|e| ConfigError::Message(format!("invalid {}: {}", key, e)))?;
        }

        if self.quiz_api.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "quiz_api.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.load.num_users > 0 && (self.load.emails.is_empty() || self.load.topics.is_empty())
        {
            return Err(ConfigError::Message(
                "load.emails and load.topics must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// 按加载顺序返回配置文件名，环境文件与默认文件相同时只加载一次
pub(crate) fn config_files(environment: Option<&str>) -> Vec<String> {
    let mut files = vec!["config/default".to_string()];
    match environment.map(str::trim) {
        Some(env) if !env.is_empty() && env != "default" => files.push(format!("config/{}", env)),
        _ => {}
    }
    files
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
