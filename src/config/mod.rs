// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理测验服务地址、负载规模、输出路径和指标导出等配置
pub mod settings;
