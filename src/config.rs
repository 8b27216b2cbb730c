//! Environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::aggregates::credit::CREDIT_LIMIT;
use crate::domain::value_objects::Won;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_STATE_DIR: &str = ".pharmacy-portal";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub ai_api_base_url: String,
    pub timeout: Duration,
    pub ai_timeout: Duration,
    /// Directory holding the saved session and, unless overridden, the order cart.
    pub state_dir: PathBuf,
    pub cart_path: Option<PathBuf>,
    pub credit_limit: Won,
}

impl PortalConfig {
    /// Reads `PORTAL_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> { Self::from_lookup(|name| std::env::var(name).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_base_url = var("PORTAL_API_BASE_URL").ok_or(ConfigError::Missing("PORTAL_API_BASE_URL"))?;
        let ai_api_base_url = var("PORTAL_AI_API_BASE_URL").unwrap_or_else(|| api_base_url.clone());
        let timeout = Duration::from_secs(parse_or(var("PORTAL_TIMEOUT_SECS"), "PORTAL_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?);
        let ai_timeout = Duration::from_secs(parse_or(var("PORTAL_AI_TIMEOUT_SECS"), "PORTAL_AI_TIMEOUT_SECS", DEFAULT_AI_TIMEOUT_SECS)?);
        let credit_limit = Won(parse_or(var("PORTAL_CREDIT_LIMIT"), "PORTAL_CREDIT_LIMIT", CREDIT_LIMIT.amount())?);
        if credit_limit < Won::ZERO {
            return Err(ConfigError::Invalid { name: "PORTAL_CREDIT_LIMIT", value: credit_limit.amount().to_string() });
        }

        Ok(Self {
            api_base_url,
            ai_api_base_url,
            timeout,
            ai_timeout,
            state_dir: var("PORTAL_STATE_DIR").map_or_else(|| PathBuf::from(DEFAULT_STATE_DIR), PathBuf::from),
            cart_path: var("PORTAL_CART_PATH").map(PathBuf::from),
            credit_limit,
        })
    }

    pub fn session_path(&self) -> PathBuf { self.state_dir.join("session.json") }

    pub fn order_cart_path(&self) -> PathBuf { self.cart_path.clone().unwrap_or_else(|| self.state_dir.join("order-cart.json")) }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<PortalConfig, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        PortalConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[("PORTAL_API_BASE_URL", "http://localhost:8080/api")]).unwrap();
        assert_eq!(cfg.ai_api_base_url, "http://localhost:8080/api");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.ai_timeout, Duration::from_secs(60));
        assert_eq!(cfg.credit_limit, CREDIT_LIMIT);
        assert_eq!(cfg.order_cart_path(), PathBuf::from(".pharmacy-portal/order-cart.json"));
    }

    #[test]
    fn test_missing_and_invalid_values() {
        assert_eq!(config(&[]), Err(ConfigError::Missing("PORTAL_API_BASE_URL")));
        assert_eq!(config(&[("PORTAL_API_BASE_URL", "  ")]), Err(ConfigError::Missing("PORTAL_API_BASE_URL")));

        let err = config(&[("PORTAL_API_BASE_URL", "http://x"), ("PORTAL_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert_eq!(err, ConfigError::Invalid { name: "PORTAL_TIMEOUT_SECS", value: "soon".into() });
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("PORTAL_API_BASE_URL", "http://x"),
            ("PORTAL_AI_API_BASE_URL", "http://ai"),
            ("PORTAL_CREDIT_LIMIT", "5000000"),
            ("PORTAL_CART_PATH", "/tmp/cart.json"),
        ])
        .unwrap();
        assert_eq!(cfg.ai_api_base_url, "http://ai");
        assert_eq!(cfg.credit_limit, Won(5_000_000));
        assert_eq!(cfg.order_cart_path(), PathBuf::from("/tmp/cart.json"));
    }
}
