//! Best-effort login webhook.
//!
//! The notification is spawned after the login has been committed and reports
//! through its own task handle; it never affects the session.

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::NotificationConfig;

/// Body posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginEvent {
    pub event: String,
    pub username: String,
    pub timestamp: DateTime<Utc>,
}

impl LoginEvent {
    pub fn login(username: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            event: "login".to_string(),
            username: username.to_string(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("login notification transport failed: {0}")]
    Transport(String),
    #[error("login notification rejected with status {0}")]
    UnexpectedStatus(u16),
}

impl From<reqwest::Error> for NotificationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

pub type NotifyFuture = Pin<Box<dyn Future<Output = Result<(), NotificationError>> + Send>>;

/// Outbound hook invoked after a successful login.
pub trait LoginNotifier: Send + Sync {
    fn notify(&self, event: LoginEvent) -> NotifyFuture;
}

/// Posts [`LoginEvent`] as JSON; only `200 OK` counts as delivered.
#[derive(Debug, Clone)]
pub struct HttpLoginNotifier {
    endpoint: String,
    http: Client,
}

impl HttpLoginNotifier {
    pub fn new(endpoint: impl Into<String>, config: &NotificationConfig) -> Result<Self, NotificationError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    /// `None` when no endpoint is configured.
    pub fn from_config(config: &NotificationConfig) -> Result<Option<Self>, NotificationError> {
        config
            .endpoint
            .as_deref()
            .map(|endpoint| Self::new(endpoint, config))
            .transpose()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LoginNotifier for HttpLoginNotifier {
    fn notify(&self, event: LoginEvent) -> NotifyFuture {
        let request = self.http.post(&self.endpoint).json(&event);
        Box::pin(async move {
            let response = request.send().await?;
            match response.status() {
                StatusCode::OK => Ok(()),
                other => Err(NotificationError::UnexpectedStatus(other.as_u16())),
            }
        })
    }
}

/// Spawns the notification on the current runtime. Returns `None` outside a runtime.
pub fn dispatch(
    notifier: Arc<dyn LoginNotifier>,
    event: LoginEvent,
) -> Option<JoinHandle<Result<(), NotificationError>>> {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        warn!(username = %event.username, "no async runtime, login notification skipped");
        return None;
    };

    Some(runtime.spawn(async move {
        let username = event.username.clone();
        let outcome = notifier.notify(event).await;
        match &outcome {
            Ok(()) => info!(%username, "login notification delivered"),
            Err(err) => warn!(%username, error = %err, "login notification failed"),
        }
        outcome
    }))
}
