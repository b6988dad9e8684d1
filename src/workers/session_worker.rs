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

use crate::domain::models::failure::WorkerFailure;
use crate::domain::models::quiz::{Answer, Question};
use crate::domain::models::session::{now_millis, Session, SessionStatus};
use crate::quiz_api::traits::{QuizApi, QuizApiError};
use crate::utils::errors::WorkerError;
use futures::FutureExt;
use metrics::{counter, histogram};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// 工作流阶段
///
/// Init → SessionCreated → QuizStarted → Answered → Submitted →
/// ReportEmailPending → Completed，任意非终态阶段都可能进入 Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    Init,
    SessionCreated,
    QuizStarted,
    Answered,
    Submitted,
    ReportEmailPending,
    Completed,
    Failed,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Init => "init",
            WorkflowStage::SessionCreated => "session_created",
            WorkflowStage::QuizStarted => "quiz_started",
            WorkflowStage::Answered => "answered",
            WorkflowStage::Submitted => "submitted",
            WorkflowStage::ReportEmailPending => "report_email_pending",
            WorkflowStage::Completed => "completed",
            WorkflowStage::Failed => "failed",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个工作流的最终结果
#[derive(Debug)]
pub enum WorkerOutcome {
    /// 所有阶段成功，会话直接发送到结果通道
    Completed(Session),
    /// 某个阶段失败，失败载荷发送到错误通道
    Failed {
        stage: WorkflowStage,
        failure: WorkerFailure,
    },
}

/// 会话工作器
///
/// 执行一个虚拟用户的完整测验流程，并把结果交给对应的通道
#[derive(Clone)]
pub struct SessionWorker {
    api: Arc<dyn QuizApi>,
    failures: mpsc::Sender<WorkerFailure>,
    results: mpsc::Sender<Session>,
}

impl SessionWorker {
    pub fn new(
        api: Arc<dyn QuizApi>,
        failures: mpsc::Sender<WorkerFailure>,
        results: mpsc::Sender<Session>,
    ) -> Self {
        Self {
            api,
            failures,
            results,
        }
    }

    /// 运行工作器
    ///
    /// 工作流内部的 panic 会被捕获并转换为一条失败结果，保证每个用户都有且只有一条结果。
    /// 会话已创建时失败结果保留会话ID，否则按会话创建前失败处理
    pub async fn run(&self, email: String, topic: String) {
        info!(%email, %topic, "Simulating user");

        let start_time = now_millis();
        let created = OnceLock::new();
        let outcome = match AssertUnwindSafe(self.execute_tracked(&email, &topic, start_time, &created))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(%email, %topic, "Recovered from panic in user simulation: {}", message);
                panicked_outcome(email.clone(), topic.clone(), start_time, created.get(), message)
            }
        };

        self.dispatch(outcome).await;
        debug!(%email, %topic, "User simulation finished");
    }

    /// 执行完整工作流，不做任何发送
    pub async fn execute(&self, email: &str, topic: &str) -> WorkerOutcome {
        self.execute_tracked(email, topic, now_millis(), &OnceLock::new())
            .await
    }

    /// 会话创建成功后会话ID写入 `created`
    async fn execute_tracked(
        &self,
        email: &str,
        topic: &str,
        start_time: i64,
        created: &OnceLock<String>,
    ) -> WorkerOutcome {
        counter!("quizload_sessions_started_total").increment(1);

        // 1. Create session
        debug!(email, topic, "Sending request to create session");
        let started = Instant::now();
        let result = self.api.create_session(email, topic).await;
        let creation_ms = observe_latency("create_session", started);

        let session_id = match result {
            Ok(id) => id,
            Err(e) => {
                error!(email, topic, "Error creating session: {}", e);
                return WorkerOutcome::Failed {
                    stage: WorkflowStage::Init,
                    failure: WorkerFailure::PreSession {
                        email: email.to_string(),
                        topic: topic.to_string(),
                        error: WorkerError::CreateSession {
                            email: email.to_string(),
                            topic: topic.to_string(),
                            source: e,
                        },
                    },
                };
            }
        };
        let _ = created.set(session_id.clone());

        let mut session = Session::new(session_id, email, topic, start_time);
        session.latencies_mut().session_creation = creation_ms;
        let mut stage = WorkflowStage::SessionCreated;
        info!(email, topic, session_id = %session.id, "Session created");

        // 2. Start quiz
        let started = Instant::now();
        let result = self.api.start_quiz(&session.id, topic).await;
        session.latencies_mut().start_quiz = observe_latency("start_quiz", started);

        match result {
            Ok(questions) if !questions.is_empty() => {
                debug!(session_id = %session.id, questions = questions.len(), "Quiz started");
                session.questions = questions;
            }
            Ok(_) => {
                let error = WorkerError::NoQuestions(session.id.clone());
                return fail_session(session, stage, error);
            }
            Err(e) => return fail_session(session, stage, WorkerError::StartQuiz(e)),
        }
        if let Err(e) = session.advance(SessionStatus::Started) {
            return fail_session(session, stage, WorkerError::InternalError(e.to_string()));
        }
        stage = WorkflowStage::QuizStarted;

        // 3. Answer every question
        let picked = pick_answers(&session.questions, &mut rand::rng());
        match picked {
            Ok(answers) => session.answers = answers,
            Err(e) => return fail_session(session, stage, e),
        }
        stage = WorkflowStage::Answered;

        // 4. Submit
        let started = Instant::now();
        let result = self.api.submit_quiz(&session.id, &session.answers).await;
        session.latencies_mut().submit_quiz = observe_latency("submit_quiz", started);

        match result {
            Ok(score) => session.score = score,
            Err(e) => return fail_session(session, stage, WorkerError::SubmitQuiz(e)),
        }
        stage = WorkflowStage::Submitted;
        debug!(session_id = %session.id, score = session.score, stage = %stage, "Quiz submitted");

        // 5. Report and email confirmation run concurrently, results merged after both finish
        stage = WorkflowStage::ReportEmailPending;
        let (report, email_report) = tokio::join!(
            self.timed("get_report", self.api.get_report(&session.id)),
            self.timed("get_email_report", self.api.get_email_report(&session.id)),
        );

        let latencies = session.latencies_mut();
        latencies.report_api = report.1;
        latencies.email_api = email_report.1;

        let follow_up_error = match (report.0, email_report.0) {
            (Ok(path), Ok(_)) => {
                session.report = path;
                None
            }
            (Ok(path), Err(e)) => {
                session.report = path;
                Some(WorkerError::EmailReport(e))
            }
            (Err(e), Ok(_)) => Some(WorkerError::Report(e)),
            (Err(report_err), Err(email_err)) => Some(WorkerError::FollowUpFailed {
                report: Box::new(WorkerError::Report(report_err)),
                email: Box::new(WorkerError::EmailReport(email_err)),
            }),
        };
        if let Some(error) = follow_up_error {
            return fail_session(session, stage, error);
        }

        // 6. Finalize
        if let Err(e) = session.complete() {
            return fail_session(session, stage, WorkerError::InternalError(e.to_string()));
        }
        counter!("quizload_sessions_completed_total").increment(1);
        info!(
            email,
            topic,
            session_id = %session.id,
            score = session.score,
            "Session completed"
        );

        WorkerOutcome::Completed(session)
    }

    async fn timed<F>(&self, call: &'static str, future: F) -> (Result<String, QuizApiError>, u64)
    where
        F: std::future::Future<Output = Result<String, QuizApiError>>,
    {
        let started = Instant::now();
        let result = future.await;
        (result, observe_latency(call, started))
    }

    async fn dispatch(&self, outcome: WorkerOutcome) {
        match outcome {
            WorkerOutcome::Completed(session) => {
                if let Err(e) = self.results.send(session).await {
                    error!(session_id = %e.0.id, "Result channel closed, outcome dropped");
                }
            }
            WorkerOutcome::Failed { stage, failure } => {
                counter!("quizload_sessions_failed_total", "stage" => stage.as_str()).increment(1);
                if let Err(e) = self.failures.send(failure).await {
                    error!(kind = e.0.kind(), "Error channel closed, failure dropped");
                }
            }
        }
    }
}

/// 为每道题随机选择一个选项
///
/// 没有选项的题目属于数据错误，整个工作流以失败结束
pub fn pick_answers<R: Rng + ?Sized>(
    questions: &[Question],
    rng: &mut R,
) -> Result<Vec<Answer>, WorkerError> {
    questions
        .iter()
        .map(|question| {
            question
                .options
                .choose(rng)
                .map(|option| Answer::new(question.id.clone(), option.clone()))
                .ok_or_else(|| WorkerError::NoOptions(question.id.clone()))
        })
        .collect()
}

fn fail_session(mut session: Session, stage: WorkflowStage, error: WorkerError) -> WorkerOutcome {
    error!(
        session_id = %session.id,
        stage = %stage,
        "Session failed: {}",
        error
    );
    if let Err(e) = session.fail(error) {
        warn!(session_id = %session.id, "Could not mark session as failed: {}", e);
    }
    WorkerOutcome::Failed {
        stage,
        failure: WorkerFailure::InSession(session),
    }
}

fn panicked_outcome(
    email: String,
    topic: String,
    start_time: i64,
    session_id: Option<&String>,
    message: String,
) -> WorkerOutcome {
    let error = WorkerError::Panicked {
        email: email.clone(),
        topic: topic.clone(),
        message,
    };

    let failure = match session_id {
        Some(id) => {
            let mut session = Session::new(id.clone(), email, topic, start_time);
            session.latencies = None;
            if let Err(e) = session.fail(error) {
                warn!(session_id = %session.id, "Could not mark session as failed: {}", e);
            }
            WorkerFailure::InSession(session)
        }
        None => WorkerFailure::PreSession {
            email,
            topic,
            error,
        },
    };

    WorkerOutcome::Failed {
        stage: WorkflowStage::Failed,
        failure,
    }
}

fn observe_latency(call: &'static str, started: Instant) -> u64 {
    let elapsed = started.elapsed().as_millis() as u64;
    histogram!("quizload_api_latency_ms", "call" => call).record(elapsed as f64);
    elapsed
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "session_worker_test.rs"]
mod tests;
