//! Operator alerts surfaced as transient toasts

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Visual style of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertVariant {
    Success,
    Danger,
    Warning,
    Info,
}

impl fmt::Display for AlertVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertVariant::Success => write!(f, "success"),
            AlertVariant::Danger => write!(f, "danger"),
            AlertVariant::Warning => write!(f, "warning"),
            AlertVariant::Info => write!(f, "info"),
        }
    }
}

/// A notification shown to the operator for `duration_sec` seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub variant: AlertVariant,
    pub title: String,
    pub message: String,
    pub duration_sec: u32,
}

impl Alert {
    pub fn success(title: impl Into<String>, message: impl Into<String>, duration_sec: u32) -> Self {
        Self {
            variant: AlertVariant::Success,
            title: title.into(),
            message: message.into(),
            duration_sec,
        }
    }

    pub fn danger(title: impl Into<String>, message: impl Into<String>, duration_sec: u32) -> Self {
        Self {
            variant: AlertVariant::Danger,
            title: title.into(),
            message: message.into(),
            duration_sec,
        }
    }
}

/// Receives alerts raised by views
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn add_alert(&self, alert: Alert);
}
