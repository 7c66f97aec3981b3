use form_spec::SpecError;
use thiserror::Error;

/// Failures while talking to the webhook endpoint.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("webhook responded with HTTP {0}")]
    Status(u16),
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

impl ControllerError {
    /// The missing field id, when collection failed on an absent field.
    pub fn missing_field(&self) -> Option<&str> {
        match self {
            ControllerError::Spec(SpecError::MissingField(id)) => Some(id),
            _ => None,
        }
    }
}
