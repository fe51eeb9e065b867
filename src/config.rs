//! Environment-based configuration.
//!
//! All identifiers come from the environment (`.env` supported via dotenvy):
//! `KEYCLOAK_URL`, `REALM`, `CLIENT_ID`, `CLIENT_SECRET` are required and must
//! be non-empty; `SCOPE` falls back to a default scope list. Loading happens
//! once at startup, before any network activity, and the result is immutable.

use crate::error::{Error, Result};

const DEFAULT_SCOPE: &str = "openid email profile groups";

/// Immutable configuration for one authorization cycle.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Keycloak server, trailing slashes stripped.
    pub base_url: String,
    pub realm: String,
    pub client_id: String,
    pub client_secret: String,
    /// Space-delimited scope list.
    pub scope: String,
}

impl Config {
    /// Load from the process environment (loads `.env` first, if present).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary lookup. Lets tests avoid mutating the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |name: &'static str| -> Result<String> {
            match lookup(name) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(Error::MissingVar(name)),
            }
        };

        let base_url = require("KEYCLOAK_URL")?
            .trim_end_matches('/')
            .to_string();
        let realm = require("REALM")?;
        let client_id = require("CLIENT_ID")?;
        let client_secret = require("CLIENT_SECRET")?;
        let scope = lookup("SCOPE")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SCOPE.to_string());

        Ok(Self {
            base_url,
            realm,
            client_id,
            client_secret,
            scope,
        })
    }

    /// Device authorization endpoint for this realm.
    pub fn device_endpoint(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/auth/device",
            self.base_url, self.realm
        )
    }

    /// Token endpoint for this realm.
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url, self.realm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env(&[
            ("KEYCLOAK_URL", "https://auth.example.com"),
            ("REALM", "acme"),
            ("CLIENT_ID", "cli"),
            ("CLIENT_SECRET", "s3cr3t"),
        ])
    }

    fn load(vars: &HashMap<String, String>) -> Result<Config> {
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn loads_with_default_scope() {
        let config = load(&full_env()).unwrap();
        assert_eq!(config.base_url, "https://auth.example.com");
        assert_eq!(config.realm, "acme");
        assert_eq!(config.client_id, "cli");
        assert_eq!(config.client_secret, "s3cr3t");
        assert_eq!(config.scope, "openid email profile groups");
    }

    #[test]
    fn scope_override_is_respected() {
        let mut vars = full_env();
        vars.insert("SCOPE".to_string(), "openid".to_string());
        let config = load(&vars).unwrap();
        assert_eq!(config.scope, "openid");
    }

    #[test]
    fn trailing_slash_is_stripped_from_base_url() {
        let mut vars = full_env();
        vars.insert(
            "KEYCLOAK_URL".to_string(),
            "https://auth.example.com/".to_string(),
        );
        let config = load(&vars).unwrap();
        assert_eq!(config.base_url, "https://auth.example.com");
        assert_eq!(
            config.device_endpoint(),
            "https://auth.example.com/realms/acme/protocol/openid-connect/auth/device"
        );
        assert_eq!(
            config.token_endpoint(),
            "https://auth.example.com/realms/acme/protocol/openid-connect/token"
        );
    }

    #[test]
    fn each_required_var_is_checked() {
        for name in ["KEYCLOAK_URL", "REALM", "CLIENT_ID", "CLIENT_SECRET"] {
            let mut vars = full_env();
            vars.remove(name);
            match load(&vars) {
                Err(crate::Error::MissingVar(missing)) => assert_eq!(missing, name),
                other => panic!("expected MissingVar({name}), got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_required_var_is_an_error() {
        let mut vars = full_env();
        vars.insert("CLIENT_SECRET".to_string(), String::new());
        assert!(matches!(
            load(&vars),
            Err(crate::Error::MissingVar("CLIENT_SECRET"))
        ));
    }

    #[test]
    fn empty_scope_falls_back_to_default() {
        let mut vars = full_env();
        vars.insert("SCOPE".to_string(), String::new());
        let config = load(&vars).unwrap();
        assert_eq!(config.scope, "openid email profile groups");
    }
}
