//! Device authorization grant flow: initiation and token polling.

pub mod client;
pub mod types;

pub use client::DeviceFlowClient;
pub use types::{render_token, DeviceAuthorization, TokenPoll};
