//! Transient user-facing messages (toast equivalents).
//!
//! Managers never hand remote errors back to the presentation layer; they
//! publish a [`Notice`] instead. Notices are not replayed: a subscriber only
//! sees what is published after it subscribed.

use crate::error::MallError;
use tokio::sync::broadcast;
use tracing::{debug, warn};

const NOTICE_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Builds an error notice naming the operation that failed.
    pub fn failed(operation: &str, error: &MallError) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: format!("{operation}: {error}"),
        }
    }
}

/// Publish side of a notice stream.
#[derive(Debug, Clone)]
pub struct NoticeSender {
    tx: broadcast::Sender<Notice>,
}

impl Default for NoticeSender {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeSender {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTICE_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn publish(&self, notice: Notice) {
        if notice.level == NoticeLevel::Error {
            warn!(message = %notice.message, "notice");
        }
        if self.tx.send(notice).is_err() {
            debug!("notice dropped, no subscribers");
        }
    }

    pub fn failed(&self, operation: &str, error: &MallError) {
        self.publish(Notice::failed(operation, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_notices_published_after_subscribing() {
        let sender = NoticeSender::new();
        sender.publish(Notice::info("before"));

        let mut rx = sender.subscribe();
        sender.failed("Failed to load cart", &MallError::Network("timed out".into()));

        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(
            notice.message,
            "Failed to load cart: network error: timed out"
        );
        assert!(rx.try_recv().is_err());
    }
}
