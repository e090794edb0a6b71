//! Test-run notifications.
//!
//! A notification is one message per run: a title, a pass/fail flag and one
//! field per executed step. [`SlackNotifier`] delivers it to any
//! Slack-compatible incoming webhook.

pub mod slack;

pub use slack::{build_notification, SlackAttachment, SlackField, SlackNotification, SlackNotifier};

use crate::error::Result;

/// One named section of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubAlert {
    /// Section title (the step name).
    pub title: String,
    /// Section body, sent verbatim.
    pub output: String,
}

/// Delivers run results to an external channel.
pub trait Notifier {
    /// Send one notification. Delivery failures are returned, never retried.
    fn alert(&self, title: &str, sub_alerts: &[SubAlert], ok: bool) -> Result<()>;
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn alert(&self, title: &str, sub_alerts: &[SubAlert], ok: bool) -> Result<()> {
        (**self).alert(title, sub_alerts, ok)
    }
}
