//! Trailing-edge debouncer backed by a tokio task.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Collapses bursts of values into the last one, delivered after `delay` of
/// quiet. Every new value restarts the timer.
///
/// Dropping the debouncer closes the channel; a value still waiting for its
/// quiet period is discarded.
#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the debounce task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F, Fut>(delay: Duration, on_settle: F) -> Self
    where
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(value) => latest = value,
                            None => {
                                debug!("debouncer closed with a pending value");
                                return;
                            }
                        },
                        _ = tokio::time::sleep(delay) => break,
                    }
                }
                on_settle(latest).await;
            }
        });

        Self { tx }
    }

    pub fn push(&self, value: T) {
        if self.tx.send(value).is_err() {
            debug!("debouncer task has stopped");
        }
    }
}
