// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 提供结果文件写入和指标导出
pub mod metrics;
pub mod results_file;
