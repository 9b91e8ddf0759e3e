//! Secret value types and error definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Sentinel text marking a secret as "not applicable".
pub const NOT_APPLICABLE: &str = "N/A";

/// Name of a secret, e.g. `BLOCKCYPHER_API_KEY`. Case-sensitive.
pub type SecretName = String;

/// Raw key/value pairs produced by one source layer.
pub type SecretMap = BTreeMap<SecretName, SecretValue>;

/// A defined secret value.
///
/// Absence is modelled by `Option::None` at lookup time; a value set to the
/// sentinel is present but inapplicable and must be handled explicitly.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretValue {
    /// A usable credential.
    Value(String),
    /// Explicitly marked as not applicable (`N/A`).
    NotApplicable,
}

impl SecretValue {
    /// Normalize raw text into a value. Empty text defines nothing.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.eq_ignore_ascii_case(NOT_APPLICABLE) {
            Some(SecretValue::NotApplicable)
        } else {
            Some(SecretValue::Value(trimmed.to_string()))
        }
    }

    /// The usable credential, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SecretValue::Value(v) => Some(v),
            SecretValue::NotApplicable => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, SecretValue::NotApplicable)
    }
}

// Raw credentials never reach logs through Debug.
impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretValue::Value(_) => f.write_str("Value(<redacted>)"),
            SecretValue::NotApplicable => f.write_str("NotApplicable"),
        }
    }
}

/// One precedence tier of the resolution chain.
///
/// Ordering follows precedence: `Default < ConfigFile < Environment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceLayer {
    Default,
    ConfigFile,
    Environment,
}

impl SourceLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLayer::Default => "default",
            SourceLayer::ConfigFile => "config_file",
            SourceLayer::Environment => "environment",
        }
    }
}

impl fmt::Display for SourceLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while reading secret sources.
#[derive(Debug, Error)]
pub enum SecretsError {
    /// A secrets file was explicitly requested but could not be read.
    #[error("failed to read secrets file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The explicit override path cannot name a file at all.
    #[error("invalid secrets file override '{0}'")]
    InvalidOverridePath(String),
}

/// Result type for secret operations.
pub type SecretsResult<T> = Result<T, SecretsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(SecretValue::parse("  abc123 "), Some(SecretValue::Value("abc123".into())));
        assert_eq!(SecretValue::parse("n/a"), Some(SecretValue::NotApplicable));
        assert_eq!(SecretValue::parse("N/A"), Some(SecretValue::NotApplicable));
        assert_eq!(SecretValue::parse("   "), None);
        assert_eq!(SecretValue::parse(""), None);
    }

    #[test]
    fn test_debug_redacts() {
        let value = SecretValue::Value("super-secret".into());
        assert!(!format!("{:?}", value).contains("super-secret"));
    }

    #[test]
    fn test_layer_precedence_order() {
        assert!(SourceLayer::Environment > SourceLayer::ConfigFile);
        assert!(SourceLayer::ConfigFile > SourceLayer::Default);
    }

    #[test]
    fn test_error_display() {
        let err = SecretsError::FileRead {
            path: PathBuf::from("/tmp/keys.env"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/keys.env"));
    }
}
