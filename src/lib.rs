//! Keycloak device authorization grant client.
//!
//! Implements the OAuth 2.0 Device Authorization Grant (RFC 8628) against a
//! Keycloak-compatible server: one initiation call, an operator-facing
//! verification URL and user code, then a poll loop against the token endpoint
//! until the operator finishes logging in from a browser.
//!
//! The binary in `main.rs` wires this up from environment configuration and
//! prints the resulting access token (or the full token response with
//! `--json`).

pub mod cli;
pub mod config;
pub mod device_flow;
pub mod error;

pub use config::Config;
pub use device_flow::{render_token, DeviceAuthorization, DeviceFlowClient, TokenPoll};
pub use error::{Error, Result};
