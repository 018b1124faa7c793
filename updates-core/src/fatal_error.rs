// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pending fatal error from the previous launch
//!
//! When the previous launch crashed, the host records the error message so
//! the next manifest request can report it to the server. The message is
//! consumed by the first request that reads it.

use std::sync::Mutex;

/// Source of a one-shot error message carried into the next manifest request.
pub trait PendingErrorSource: Send + Sync {
    /// Return the pending message, if any, and clear it.
    fn take_pending_error(&self) -> Option<String>;
}

/// In-memory holder for the pending fatal error message.
#[derive(Debug, Default)]
pub struct FatalErrorHolder {
    pending: Mutex<Option<String>>,
}

impl FatalErrorHolder {
    /// Creates an empty holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a holder that already carries a message.
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            pending: Mutex::new(Some(message.into())),
        }
    }

    /// Records a message, replacing any previous one.
    pub fn set_pending_error(&self, message: impl Into<String>) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        *pending = Some(message.into());
    }

    /// Whether a message is waiting to be sent.
    pub fn has_pending_error(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

impl PendingErrorSource for FatalErrorHolder {
    fn take_pending_error(&self) -> Option<String> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

/// Source that never has anything pending.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPendingError;

impl PendingErrorSource for NoPendingError {
    fn take_pending_error(&self) -> Option<String> {
        None
    }
}
