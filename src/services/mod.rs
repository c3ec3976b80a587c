//! Network services for the weighing station.
//!
//! Only the webhook publisher lives here today. Everything in this module
//! requires `std` and the `webhook` feature.

mod webhook;

pub use webhook::{local_timestamp, HttpWebhook, WebhookError};
