//! Catalog of the external services whose credentials are resolved.
//!
//! The catalog feeds the `Default` layer of the chain, decides which process
//! environment variables belong to the application and maps service ids to
//! display names for the dashboard.

use crate::secrets::types::{SecretMap, SecretValue, NOT_APPLICABLE};

/// Suffix identifying credential variables in the process environment.
pub const API_KEY_SUFFIX: &str = "_API_KEY";

/// Placeholder shown when a key is not configured.
pub const UNSET_PLACEHOLDER: &str = "—";

/// Describes how an API key for an external service is named and defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceKey {
    pub service_id: &'static str,
    pub display_name: &'static str,
    pub env_var: &'static str,
    pub default_value: Option<&'static str>,
}

/// Services known to the application.
pub const SERVICE_KEYS: &[ServiceKey] = &[
    ServiceKey {
        service_id: "blockcypher",
        display_name: "BlockCypher API",
        env_var: "BLOCKCYPHER_API_KEY",
        default_value: None,
    },
    ServiceKey {
        service_id: "blockchair",
        display_name: "Blockchair",
        env_var: "BLOCKCHAIR_API_KEY",
        default_value: None,
    },
    ServiceKey {
        service_id: "chainz",
        display_name: "Chainz",
        env_var: "CHAINZ_API_KEY",
        default_value: None,
    },
    ServiceKey {
        service_id: "coingecko",
        display_name: "CoinGecko",
        env_var: "COINGECKO_API_KEY",
        default_value: None,
    },
    ServiceKey {
        service_id: "ofac_watchlist",
        display_name: "OFAC Watchlist",
        env_var: "OFAC_API_KEY",
        default_value: Some(NOT_APPLICABLE),
    },
    ServiceKey {
        service_id: "heuristic_mixer",
        display_name: "Heuristic Mixer Watchlist",
        env_var: "HEURISTIC_MIXER_TOKEN",
        default_value: Some(NOT_APPLICABLE),
    },
];

/// Look up a service by id.
pub fn find_service(service_id: &str) -> Option<&'static ServiceKey> {
    SERVICE_KEYS.iter().find(|s| s.service_id == service_id)
}

/// Display name for a service id, falling back to the id itself.
pub fn display_name(service_id: &str) -> &str {
    find_service(service_id)
        .map(|s| s.display_name)
        .unwrap_or(service_id)
}

/// Whether an environment variable belongs to the application's key namespace.
pub fn is_recognized_name(name: &str) -> bool {
    name.ends_with(API_KEY_SUFFIX) || SERVICE_KEYS.iter().any(|s| s.env_var == name)
}

/// Built-in defaults, keyed by environment variable name.
pub fn default_secrets() -> SecretMap {
    SERVICE_KEYS
        .iter()
        .filter_map(|s| {
            let value = SecretValue::parse(s.default_value?)?;
            Some((s.env_var.to_string(), value))
        })
        .collect()
}

/// Render a secret for display without leaking it.
pub fn mask(value: Option<&SecretValue>) -> String {
    let raw = match value {
        None => return UNSET_PLACEHOLDER.to_string(),
        Some(SecretValue::NotApplicable) => return NOT_APPLICABLE.to_string(),
        Some(SecretValue::Value(raw)) => raw,
    };

    let chars: Vec<char> = raw.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_service() {
        let svc = find_service("coingecko").unwrap();
        assert_eq!(svc.env_var, "COINGECKO_API_KEY");
        assert!(find_service("etherscan").is_none());
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(display_name("ofac_watchlist"), "OFAC Watchlist");
        assert_eq!(display_name("mystery"), "mystery");
    }

    #[test]
    fn test_namespace() {
        assert!(is_recognized_name("BLOCKCYPHER_API_KEY"));
        assert!(is_recognized_name("ETHERSCAN_API_KEY"));
        assert!(is_recognized_name("HEURISTIC_MIXER_TOKEN"));
        assert!(!is_recognized_name("PATH"));
        assert!(!is_recognized_name("ARCHEBLOW_MONITORING_WEBHOOK"));
    }

    #[test]
    fn test_default_secrets() {
        let defaults = default_secrets();
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults.get("OFAC_API_KEY"), Some(&SecretValue::NotApplicable));
        assert!(defaults.get("BLOCKCYPHER_API_KEY").is_none());
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask(None), "—");
        assert_eq!(mask(Some(&SecretValue::NotApplicable)), "N/A");
        assert_eq!(mask(Some(&SecretValue::Value("abcd".into()))), "****");
        assert_eq!(mask(Some(&SecretValue::Value("abcdef12".into()))), "ab****12");
    }
}
