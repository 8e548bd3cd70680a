//! User-visible status: the single error slot and the loading indicator
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::ErrorKind;

/// Message shown inline to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: ErrorKind,
    pub message: String,
}

impl Notice {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Connectivity,
            message: message.into(),
        }
    }
}

/// Single-slot error display. Showing replaces whatever was there.
#[derive(Debug, Clone, Default)]
pub struct StatusSlot {
    notice: Option<Notice>,
}

impl StatusSlot {
    pub fn show(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear(&mut self) {
        self.notice = None;
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

/// Loading indicator shared with in-flight requests.
///
/// Each request holds a [`LoadingGuard`]; the indicator is active while any
/// guard is alive, so it is released on every path, including a completion
/// that is dropped without being handled.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    pending: Arc<AtomicUsize>,
}

impl LoadingIndicator {
    pub fn begin(&self) -> LoadingGuard {
        self.pending.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            pending: Arc::clone(&self.pending),
        }
    }

    pub fn is_active(&self) -> bool {
        self.pending() > 0
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

/// Keeps the loading indicator raised until dropped
#[derive(Debug)]
pub struct LoadingGuard {
    pending: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}
