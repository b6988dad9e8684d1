// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 测验服务客户端模块
///
/// 定义测验服务接口，并提供基于reqwest的HTTP实现
pub mod dto;
pub mod http_client;
pub mod traits;

pub use http_client::HttpQuizApi;
pub use traits::{QuizApi, QuizApiError};
