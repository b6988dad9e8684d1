// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// 工作器完成计数器
///
/// 每启动一个工作器计数加一，对应的 `CompletionGuard` 释放时减一；
/// 工作器 panic 时 guard 同样会被释放
#[derive(Clone, Default)]
pub struct CompletionTracker {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    active: AtomicUsize,
    notify: Notify,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个工作器
    pub fn add(&self) -> CompletionGuard {
        self.inner.active.fetch_add(1, Ordering::AcqRel);
        CompletionGuard {
            inner: self.inner.clone(),
        }
    }

    /// 仍在运行的工作器数量
    pub fn active(&self) -> usize {
        self.inner.active.load(Ordering::Acquire)
    }

    /// 等待所有已登记的工作器结束
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a release in between is not missed
            notified.as_mut().enable();

            if self.active() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// 工作器完成凭证
pub struct CompletionGuard {
    inner: Arc<Inner>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if self.inner.active.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.notify.notify_waiters();
        }
    }
}
