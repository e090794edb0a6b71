//! Slack incoming-webhook delivery.

use crate::error::{MonitorError, Result};
use reqwest::blocking::Client;
use serde::Serialize;

use super::{Notifier, SubAlert};

/// Attachment color for a passing run.
pub const OK_COLOR: &str = "#00CC00";

/// Attachment color for a failing run.
pub const FAIL_COLOR: &str = "#CC0000";

/// Webhook request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackNotification {
    pub attachments: Vec<SlackAttachment>,
}

/// The single attachment carrying a run's results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackAttachment {
    pub fallback: String,
    pub color: String,
    pub title: String,
    pub title_link: String,
    pub mrkdwn_in: Vec<String>,
    pub fields: Vec<SlackField>,
}

/// One step's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

/// Build the webhook payload for one run.
///
/// Fields keep the order of `sub_alerts`; outputs are not escaped.
pub fn build_notification(
    title: &str,
    title_link: &str,
    sub_alerts: &[SubAlert],
    ok: bool,
) -> SlackNotification {
    let (fallback, color) = if ok {
        ("ok", OK_COLOR)
    } else {
        ("failure", FAIL_COLOR)
    };

    let fields = sub_alerts
        .iter()
        .map(|alert| SlackField {
            title: alert.title.clone(),
            value: alert.output.clone(),
            short: false,
        })
        .collect();

    SlackNotification {
        attachments: vec![SlackAttachment {
            fallback: fallback.to_string(),
            color: color.to_string(),
            title: title.to_string(),
            title_link: title_link.to_string(),
            mrkdwn_in: vec!["pretext".to_string(), "text".to_string()],
            fields,
        }],
    }
}

/// Posts notifications to a Slack-compatible webhook.
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
    title_link: String,
}

impl SlackNotifier {
    /// Create a notifier posting to `webhook_url`; titles link to `title_link`.
    pub fn new(webhook_url: impl Into<String>, title_link: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::registry::client::USER_AGENT)
            .build()
            .map_err(|e| anyhow::Error::new(e).context("Failed to build HTTP client"))?;

        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
            title_link: title_link.into(),
        })
    }

    /// Post a prepared payload.
    pub fn send(&self, notification: &SlackNotification) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(notification)
            .send()
            .map_err(|source| MonitorError::Network {
                url: self.webhook_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MonitorError::Remote {
                url: self.webhook_url.clone(),
                code: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

impl Notifier for SlackNotifier {
    fn alert(&self, title: &str, sub_alerts: &[SubAlert], ok: bool) -> Result<()> {
        let notification = build_notification(title, &self.title_link, sub_alerts, ok);
        tracing::debug!(
            "Posting notification '{}' with {} field(s)",
            title,
            sub_alerts.len()
        );
        self.send(&notification)?;
        tracing::info!("Notification sent: {}", title);
        Ok(())
    }
}
