//! User-facing notices for cart operations that did not go through.
//!
//! Every notice is non-fatal. The store hands them to a [`Notifier`], which
//! decides how they reach the user (log line, toast queue, terminal).

use std::sync::{Arc, Mutex, PoisonError};

/// A cart operation that failed, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// Product could not be added (lookup or save failed).
    AddFailed,
    /// Product could not be removed (not in the cart, or save failed).
    RemoveFailed,
    /// Quantity could not be changed (lookup or save failed).
    UpdateFailed,
    /// Requested quantity exceeds available stock.
    OutOfStock,
}

impl Notice {
    /// Message shown to the user.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AddFailed => "Error adding product",
            Self::RemoveFailed => "Error removing product",
            Self::UpdateFailed => "Error updating product amount",
            Self::OutOfStock => "Requested quantity is out of stock",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Delivers notices to the user.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

impl<N: Notifier> Notifier for Arc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Notifier that writes each notice to the log at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!(?notice, "{notice}");
    }
}

/// Notifier that queues notices for a front end to drain and render.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: Mutex<Vec<Notice>>,
}

impl NoticeQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending notices, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *pending)
    }

    /// Number of notices waiting to be drained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NoticeQueue {
    fn notify(&self, notice: Notice) {
        tracing::debug!(?notice, "Queued notice");
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
