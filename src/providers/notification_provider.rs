use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;

/// Out-of-band messages carrying a single-use token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    EmailVerification,
    PasswordReset,
}

impl NotificationKind {
    fn path(&self) -> &'static str {
        match self {
            Self::EmailVerification => "/api/users/verify-email",
            Self::PasswordReset => "/api/users/password-update",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailVerification => f.write_str("email_verification"),
            Self::PasswordReset => f.write_str("password_reset"),
        }
    }
}

/// Delivery channel for verification and reset tokens
///
/// Fire-and-forget: implementations swallow and log their own failures.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, kind: NotificationKind, email: &str, token: &str);
}

/// Writes the link to the application log instead of sending mail
pub struct LogNotifier {
    public_base_url: String,
}

impl LogNotifier {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
        }
    }

    fn link(&self, kind: NotificationKind, token: &str) -> String {
        format!("{}{}?token={}", self.public_base_url, kind.path(), token)
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, kind: NotificationKind, email: &str, token: &str) {
        tracing::info!(kind = %kind, email = %email, "Notification queued");
        tracing::debug!(kind = %kind, "Notification link: {}", self.link(kind, token));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub kind: NotificationKind,
    pub email: String,
    pub token: String,
}

/// Keeps every notification in memory so callers can read tokens back
#[derive(Default)]
pub struct InMemoryNotifier {
    sent: Mutex<Vec<SentNotification>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Most recent token of `kind` sent to `email`
    pub fn last_token(&self, email: &str, kind: NotificationKind) -> Option<String> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .rev()
            .find(|n| n.email == email && n.kind == kind)
            .map(|n| n.token.clone())
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn send(&self, kind: NotificationKind, email: &str, token: &str) {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentNotification {
                kind,
                email: email.to_string(),
                token: token.to_string(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_notifier_returns_latest_token_per_kind() {
        let notifier = InMemoryNotifier::new();

        notifier.send(NotificationKind::EmailVerification, "a@x.io", "first").await;
        notifier.send(NotificationKind::PasswordReset, "a@x.io", "reset").await;
        notifier.send(NotificationKind::EmailVerification, "a@x.io", "second").await;

        assert_eq!(notifier.sent().len(), 3);
        assert_eq!(
            notifier.last_token("a@x.io", NotificationKind::EmailVerification),
            Some("second".to_string())
        );
        assert_eq!(
            notifier.last_token("a@x.io", NotificationKind::PasswordReset),
            Some("reset".to_string())
        );
        assert_eq!(notifier.last_token("b@x.io", NotificationKind::PasswordReset), None);
    }

    #[test]
    fn test_log_notifier_link() {
        let notifier = LogNotifier::new("http://localhost:3000");
        assert_eq!(
            notifier.link(NotificationKind::PasswordReset, "abc"),
            "http://localhost:3000/api/users/password-update?token=abc"
        );
    }
}
