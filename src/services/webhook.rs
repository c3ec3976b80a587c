//! HTTP webhook publisher for weight telemetry.

use crate::config::WebhookConfig;
use crate::messages::WeightReport;
use crate::traits::WebhookClient;

use std::time::Duration;

/// Webhook delivery errors.
///
/// Only transport-level failures (DNS, refused connection, timeout) are
/// errors; a reachable endpoint answering with a non-success status is
/// reported through the `Ok` status code instead.
#[derive(Debug)]
pub struct WebhookError(Box<ureq::Transport>);

impl core::fmt::Display for WebhookError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "webhook transport error: {}", self.0)
    }
}

impl std::error::Error for WebhookError {}

/// Webhook client POSTing JSON reports with a bounded timeout.
pub struct HttpWebhook {
    agent: ureq::Agent,
    url: String,
}

impl HttpWebhook {
    /// Creates a client for the given endpoint.
    pub fn new(url: &str, timeout_ms: u64) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(timeout_ms))
            .build();
        Self {
            agent,
            url: url.into(),
        }
    }

    /// Creates a client from the webhook section of the config.
    pub fn from_config(config: &WebhookConfig) -> Self {
        Self::new(config.url.as_str(), config.timeout_ms)
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl WebhookClient for HttpWebhook {
    type Error = WebhookError;

    fn send_report(&mut self, report: &WeightReport) -> Result<u16, WebhookError> {
        match self.agent.post(&self.url).send_json(report) {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(code, _)) => Ok(code),
            Err(ureq::Error::Transport(transport)) => Err(WebhookError(Box::new(transport))),
        }
    }
}

/// Local wall-clock timestamp in the report format, `%Y-%m-%dT%H:%M:%S`.
pub fn local_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}
