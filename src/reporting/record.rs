// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::session::Session;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

const SEPARATOR: &str = "-----------------------------------------------";

/// 毫秒时间戳格式化为 RFC 3339
pub fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| millis.to_string())
}

/// 将一条结果记录格式化为多行文本块
pub fn format_outcome(session: &Session) -> String {
    let mut out = String::new();

    // Writing into a String never fails
    let _ = write_outcome(&mut out, session);
    out
}

fn write_outcome(out: &mut String, session: &Session) -> std::fmt::Result {
    if session.id.is_empty() {
        writeln!(out, "----------------Error while starting------------")?;
    } else {
        writeln!(out, "----------------Session ID: {}----------------", session.id)?;
    }
    writeln!(out, "Email: {}", session.email)?;
    writeln!(out, "User ID: {}", session.user_id)?;
    writeln!(out, "Topic: {}", session.topic)?;
    writeln!(out, "Score: {}", session.score)?;
    writeln!(out, "Status: {}", session.status())?;
    writeln!(out, "Start Time: {}", format_timestamp(session.start_time))?;
    writeln!(out, "End Time: {}", format_timestamp(session.end_time))?;

    let elapsed = session.elapsed_ms();
    writeln!(
        out,
        "Time Taken: {} ms ({:.2} seconds)",
        elapsed,
        elapsed as f64 / 1000.0
    )?;

    let answers = session
        .answers
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "Questions-Answers: [{}]", answers)?;
    writeln!(out, "Report: {}", session.report)?;

    if let Some(error) = &session.error {
        writeln!(out, "Error: {}", error)?;
    }

    match &session.latencies {
        Some(l) => {
            writeln!(out, "APIs Time Taken:")?;
            writeln!(out, "  Session Creation: {} ms", l.session_creation)?;
            writeln!(out, "  Start Quiz: {} ms", l.start_quiz)?;
            writeln!(out, "  Submit Quiz: {} ms", l.submit_quiz)?;
            writeln!(out, "  Report API: {} ms", l.report_api)?;
            writeln!(out, "  Email API: {} ms", l.email_api)?;
        }
        None => writeln!(out, "APIs Time Taken: not available")?,
    }

    writeln!(out, "{}", SEPARATOR)
}

/// 运行汇总块
pub fn format_summary(total: usize, average_ms: f64, results_path: &str) -> String {
    format!(
        "{sep}\nTotal Sessions: {total}\nAverage Time Taken per session: {avg:.2} ms ({secs:.2} seconds)\nCheck {path} for all logs\n{sep}\n",
        sep = SEPARATOR,
        total = total,
        avg = average_ms,
        secs = average_ms / 1000.0,
        path = results_path,
    )
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
