//! Environment-driven configuration.

use std::env;

use crate::config::AdapterConfig;
use crate::errors::{AdapterError, AdapterResult};
use crate::logging::DebugLogs;

pub const USE_PLURAL_VAR: &str = "AUTH_ADAPTER_USE_PLURAL";
pub const DEBUG_LOGS_VAR: &str = "AUTH_ADAPTER_DEBUG_LOGS";
pub const EXTRA_MODELS_VAR: &str = "AUTH_ADAPTER_MODELS";

impl AdapterConfig {
    /// Build a configuration from environment variables.
    ///
    /// - `AUTH_ADAPTER_USE_PLURAL`: `true`/`false`/`1`/`0` (default `false`)
    /// - `AUTH_ADAPTER_DEBUG_LOGS`: boolean, or operations such as `create,findOne`
    /// - `AUTH_ADAPTER_MODELS`: comma-separated extra model names
    pub fn from_env() -> AdapterResult<Self> {
        let mut config = AdapterConfig::default();

        if let Some(raw) = optional_var(USE_PLURAL_VAR) {
            config.use_plural = parse_bool(USE_PLURAL_VAR, &raw)?;
        }

        if let Some(raw) = optional_var(DEBUG_LOGS_VAR) {
            config.debug_logs = raw
                .parse::<DebugLogs>()
                .map_err(|e| AdapterError::config(format!("{DEBUG_LOGS_VAR}: {e}")))?;
        }

        if let Some(raw) = optional_var(EXTRA_MODELS_VAR) {
            for model in raw.split(',').map(str::trim).filter(|m| !m.is_empty()) {
                config = config.with_model(model);
            }
        }

        Ok(config)
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(name: &str, raw: &str) -> AdapterResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AdapterError::config(format!(
            "Environment variable '{name}' must be a boolean, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use crate::logging::Operation;

    fn clear_env() {
        env::remove_var(USE_PLURAL_VAR);
        env::remove_var(DEBUG_LOGS_VAR);
        env::remove_var(EXTRA_MODELS_VAR);
    }

    // Env vars are process-global, so every case runs inside one test.
    #[test]
    fn test_from_env() {
        clear_env();
        let config = AdapterConfig::from_env().unwrap();
        assert!(!config.use_plural);
        assert_eq!(config.debug_logs, DebugLogs::Disabled);
        assert!(config.models.is_empty());

        env::set_var(USE_PLURAL_VAR, "true");
        env::set_var(DEBUG_LOGS_VAR, "update,updateMany");
        env::set_var(EXTRA_MODELS_VAR, "twoFactor, passkey,");
        let config = AdapterConfig::from_env().unwrap();
        assert!(config.use_plural);
        assert!(config.debug_logs.enabled_for(Operation::UpdateMany));
        assert!(!config.debug_logs.enabled_for(Operation::Create));
        assert_eq!(config.models, vec!["twoFactor", "passkey"]);

        env::set_var(USE_PLURAL_VAR, "sometimes");
        let err = AdapterConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(USE_PLURAL_VAR));

        env::set_var(USE_PLURAL_VAR, "0");
        env::set_var(DEBUG_LOGS_VAR, "create,destroy");
        assert!(AdapterConfig::from_env().is_err());

        clear_env();
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("X", "YES").unwrap(), true);
        assert_eq!(parse_bool("X", " off ").unwrap(), false);
        assert!(parse_bool("X", "2").is_err());
    }
}
