// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含会话、作答和失败载荷等数据模型
pub mod domain;

/// 基础设施模块
///
/// 提供结果文件写入和指标导出
pub mod infrastructure;

/// 测验服务客户端模块
///
/// 定义客户端接口并提供基于HTTP的实现
pub mod quiz_api;

/// 报告模块
///
/// 结果记录的文本格式与运行汇总
pub mod reporting;

/// 工具模块
///
/// 提供错误类型和日志初始化
pub mod utils;

/// 工作器模块
///
/// 实现用户模拟、结果聚合和压测管理
pub mod workers;
