use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::debug;

use crate::config::Config;
use crate::device_flow::types::{DeviceAuthorization, TokenPoll};
use crate::error::{Error, Result};

const DEVICE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";
const DEFAULT_INTERVAL_SECS: u64 = 5;
const DEFAULT_EXPIRES_IN_SECS: u64 = 600;

/// Client for one device authorization cycle against a Keycloak realm.
///
/// # Example
/// ```no_run
/// use kc_device_token::{Config, DeviceFlowClient};
///
/// # async fn example() -> kc_device_token::Result<()> {
/// let config = Config::from_env()?;
/// let client = DeviceFlowClient::new(&config);
/// let authorization = client.start_device_authorization().await?;
/// println!("visit {} and enter {}", authorization.verification_uri, authorization.user_code);
/// let _token = client.poll_until_complete(&authorization).await?;
/// # Ok(())
/// # }
/// ```
pub struct DeviceFlowClient {
    client: reqwest::Client,
    device_endpoint: String,
    token_endpoint: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl DeviceFlowClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            device_endpoint: config.device_endpoint(),
            token_endpoint: config.token_endpoint(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
        }
    }

    /// POST a device authorization request and validate the response.
    ///
    /// A server-reported `error` is terminal here (disabled client, invalid
    /// scope, ...). A 200 body missing `device_code`, `user_code`, or a
    /// verification URI is rejected as incomplete, carrying the full response
    /// for diagnosis. Missing timing hints fall back to the RFC 8628 defaults.
    pub async fn start_device_authorization(&self) -> Result<DeviceAuthorization> {
        let response = self
            .post_form(
                &self.device_endpoint,
                &[
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                    ("scope", self.scope.as_str()),
                ],
            )
            .await?;

        if response.contains_key("error") {
            return Err(Error::Authorization {
                description: error_description(&response),
            });
        }

        let parsed: DeviceAuthorizationResponse =
            serde_json::from_value(Value::Object(response.clone())).map_err(|_| {
                Error::IncompleteAuthorization {
                    response: Value::Object(response.clone()),
                }
            })?;

        let verification_uri = parsed
            .verification_uri
            .or(parsed.verification_uri_complete);
        match (parsed.device_code, parsed.user_code, verification_uri) {
            (Some(device_code), Some(user_code), Some(verification_uri)) => {
                debug!(user_code = %user_code, "device authorization started");
                Ok(DeviceAuthorization {
                    device_code,
                    user_code,
                    verification_uri,
                    interval: parsed.interval.unwrap_or(DEFAULT_INTERVAL_SECS),
                    expires_in: parsed.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
                })
            }
            _ => Err(Error::IncompleteAuthorization {
                response: Value::Object(response),
            }),
        }
    }

    /// One token-exchange attempt for the given device code.
    pub async fn poll_token(&self, device_code: &str) -> Result<TokenPoll> {
        let response = self
            .post_form(
                &self.token_endpoint,
                &[
                    ("grant_type", DEVICE_GRANT_TYPE),
                    ("device_code", device_code),
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                ],
            )
            .await?;

        if response.contains_key("error") {
            return match response.get("error").and_then(Value::as_str) {
                Some("authorization_pending") => Ok(TokenPoll::Pending),
                Some("slow_down") => Ok(TokenPoll::SlowDown),
                _ => Err(Error::Authorization {
                    description: error_description(&response),
                }),
            };
        }
        Ok(TokenPoll::Authorized(response))
    }

    /// Poll the token endpoint until the flow terminates.
    ///
    /// Expiry is declared at the top of each iteration, before the attempt, so
    /// a slow response near the boundary still counts for that attempt.
    pub async fn poll_until_complete(
        &self,
        authorization: &DeviceAuthorization,
    ) -> Result<Map<String, Value>> {
        let started = Instant::now();
        let interval = Duration::from_secs(authorization.interval);
        let expires_in = Duration::from_secs(authorization.expires_in);

        loop {
            if started.elapsed() >= expires_in {
                return Err(Error::Expired);
            }
            match self.poll_token(&authorization.device_code).await? {
                TokenPoll::Authorized(response) => return Ok(response),
                // The interval stays fixed at the server's initial hint, even
                // on slow_down. Known deviation from RFC 8628's escalation.
                TokenPoll::Pending | TokenPoll::SlowDown => {
                    debug!(
                        interval_secs = authorization.interval,
                        "authorization pending"
                    );
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }

    /// URL-encoded form POST, response parsed as a JSON object.
    ///
    /// The HTTP status is deliberately not checked: Keycloak reports pending
    /// polls as 400, and the `error` key in the body is authoritative. A body
    /// that is not a JSON object is fatal and kept verbatim for diagnosis.
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<Map<String, Value>> {
        let resp = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .form(fields)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!(%url, %status, "form POST completed");
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(Error::NonJsonResponse { body }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeviceAuthorizationResponse {
    device_code: Option<String>,
    user_code: Option<String>,
    verification_uri: Option<String>,
    verification_uri_complete: Option<String>,
    interval: Option<u64>,
    expires_in: Option<u64>,
}

/// Human-readable description for a server-reported OAuth error:
/// `error_description` when present, the bare `error` code otherwise.
fn error_description(response: &Map<String, Value>) -> String {
    response
        .get("error_description")
        .and_then(Value::as_str)
        .or_else(|| response.get("error").and_then(Value::as_str))
        .unwrap_or("unknown authorization error")
        .to_string()
}
