use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

/// Reason a context stopped accepting work.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation and deadline scope for a single service call.
///
/// The service forwards the context untouched to every repository call; adapters
/// decide how to honor it, usually by wrapping their I/O in [`Context::run`].
/// Contexts derived with [`Context::with_timeout`] or [`Context::with_deadline`]
/// share the cancellation signal of the context they were derived from.
#[derive(Debug, Clone)]
pub struct Context {
    cancelled: Arc<watch::Sender<bool>>,
    deadline: Option<Instant>,
}

impl Context {
    /// Context that is never cancelled and has no deadline, unless [`Context::cancel`]
    /// is called on it.
    pub fn background() -> Self {
        let (cancelled, _) = watch::channel(false);
        Self {
            cancelled: Arc::new(cancelled),
            deadline: None,
        }
    }

    /// Derive a context that expires `timeout` from now. A timeout too large to
    /// represent leaves the parent's deadline in place.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Derive a context that expires at `deadline`, or at the parent's deadline if
    /// that comes first.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        };

        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context is done, or `None` while it still accepts work.
    pub fn err(&self) -> Option<ContextError> {
        if self.is_cancelled() {
            return Some(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive `future` to completion unless the context is cancelled or its deadline
    /// passes first. A context that is already done never polls the future.
    pub async fn run<F, T>(&self, future: F) -> Result<T, ContextError>
    where
        F: Future<Output = T>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let cancelled = self.cancelled.subscribe();
        let deadline = self.deadline;

        tokio::select! {
            output = future => Ok(output),
            _ = wait_cancelled(cancelled) => Err(ContextError::Cancelled),
            _ = async move {
                match deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            } => Err(ContextError::DeadlineExceeded),
        }
    }
}

async fn wait_cancelled(mut cancelled: watch::Receiver<bool>) {
    loop {
        if *cancelled.borrow_and_update() {
            return;
        }
        if cancelled.changed().await.is_err() {
            // Sender gone: nobody can cancel any more.
            std::future::pending::<()>().await;
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}
