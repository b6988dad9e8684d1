// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,quizload=debug";

/// 初始化日志
///
/// 默认级别为 `info,quizload=debug`，可通过 `RUST_LOG` 覆盖；
/// `LOG_FORMAT=json` 时输出结构化JSON日志
pub fn init_telemetry() {
    let json = json_requested(std::env::var("LOG_FORMAT").ok().as_deref());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json.then(|| fmt::layer().json().with_current_span(true)))
        .with((!json).then(|| fmt::layer().with_target(false)))
        .init();
}

fn json_requested(format: Option<&str>) -> bool {
    format.is_some_and(|f| f.eq_ignore_ascii_case("json"))
}
