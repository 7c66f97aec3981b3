//! Multi-step form controller.
//!
//! A [`FormController`] owns the page position of one form and drives a
//! [`FormView`] through navigation, validation and webhook submission.

pub mod controller;
pub mod error;
pub mod state;
pub mod view;
pub mod webhook;

pub use controller::{ControllerEvent, FormController, Navigation, SubmitOutcome};
pub use error::{ControllerError, WebhookError};
pub use state::FormState;
pub use view::{Focus, FormView, Key, MemoryView, SubmitState};
pub use webhook::WebhookClient;
