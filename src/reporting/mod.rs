// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 报告模块
///
/// 结果记录的文本格式以及运行汇总统计
pub mod record;
pub mod summary;

pub use summary::RunSummary;
