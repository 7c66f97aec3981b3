use form_spec::FieldRecord;
use tracing::debug;

use crate::error::WebhookError;

/// Posts records to a user-supplied webhook URL.
///
/// No retries and no timeout beyond what the transport enforces.
#[derive(Debug, Clone, Default)]
pub struct WebhookClient {
    http: reqwest::Client,
}

impl WebhookClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// POST `record` as JSON. Any 2xx status counts as delivered.
    pub async fn post_record(&self, url: &str, record: &FieldRecord) -> Result<u16, WebhookError> {
        debug!(url, fields = record.len(), "posting record to webhook");
        let response = self
            .http
            .post(url)
            .json(record)
            .send()
            .await
            .map_err(WebhookError::Transport)?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "webhook responded");
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            Err(WebhookError::Status(status.as_u16()))
        }
    }
}
