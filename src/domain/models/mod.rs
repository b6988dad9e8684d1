// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod failure;
pub mod quiz;
pub mod session;

pub use failure::WorkerFailure;
pub use quiz::{Answer, Question};
pub use session::{ApiLatencies, Session, SessionStatus};
