//! Layered secret resolution.
//!
//! Layers are applied lowest precedence first and the last definition of a
//! key wins, so `Environment` overrides `ConfigFile` overrides `Default`.

use std::collections::BTreeMap;

use crate::config::SecretsConfig;
use crate::observability::metrics;
use crate::secrets::sources::{EnvironmentSource, FileSource, SecretSource, StaticSource};
use crate::secrets::types::{SecretName, SecretValue, SecretsError, SecretsResult, SourceLayer};

/// A resolved value and the layer that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub value: SecretValue,
    pub layer: SourceLayer,
}

/// A layer that could not be read during resolution.
#[derive(Debug)]
pub struct LayerFailure {
    pub layer: SourceLayer,
    pub error: SecretsError,
}

/// The merged, immutable view of all layers.
#[derive(Debug, Default)]
pub struct ResolvedSecrets {
    entries: BTreeMap<SecretName, ResolvedEntry>,
    failures: Vec<LayerFailure>,
}

impl ResolvedSecrets {
    /// Look up a secret. `None` means no layer defines it.
    pub fn get(&self, name: &str) -> Option<&SecretValue> {
        self.entries.get(name).map(|e| &e.value)
    }

    /// Layer that supplied a secret.
    pub fn origin(&self, name: &str) -> Option<SourceLayer> {
        self.entries.get(name).map(|e| e.layer)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Layers skipped because they failed to read.
    pub fn layer_errors(&self) -> &[LayerFailure] {
        &self.failures
    }
}

/// Ordered set of sources folded into [`ResolvedSecrets`].
#[derive(Default)]
pub struct ResolutionChain {
    sources: Vec<Box<dyn SecretSource>>,
}

impl ResolutionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry defaults, the configured secrets file and the live process
    /// environment.
    pub fn standard(config: &SecretsConfig) -> Self {
        Self::new()
            .with_source(StaticSource::registry_defaults())
            .with_source(FileSource::from_config(config))
            .with_source(EnvironmentSource::from_process())
    }

    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: SecretSource + 'static,
    {
        self.sources.push(Box::new(source));
        self
    }

    /// Build the merged mapping from scratch.
    ///
    /// A layer that fails to read is skipped and recorded; only an override
    /// path that cannot name a file at all aborts resolution.
    pub fn resolve(&self) -> SecretsResult<ResolvedSecrets> {
        let mut ordered: Vec<&dyn SecretSource> = self.sources.iter().map(|s| s.as_ref()).collect();
        ordered.sort_by_key(|s| s.layer());

        let mut resolved = ResolvedSecrets::default();
        for source in ordered {
            let layer = source.layer();
            match source.read() {
                Ok(entries) => {
                    metrics::record_secrets_read(layer.as_str(), entries.len());
                    for (name, value) in entries {
                        resolved.entries.insert(name, ResolvedEntry { value, layer });
                    }
                }
                Err(error @ SecretsError::InvalidOverridePath(_)) => return Err(error),
                Err(error) => {
                    tracing::warn!(layer = %layer, error = %error, "Secret layer unavailable, continuing without it");
                    resolved.failures.push(LayerFailure { layer, error });
                }
            }
        }

        tracing::info!(
            secrets = resolved.len(),
            failed_layers = resolved.failures.len(),
            "Secrets resolved"
        );
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::types::SecretMap;

    fn map(pairs: &[(&str, &str)]) -> SecretMap {
        pairs
            .iter()
            .filter_map(|(k, v)| SecretValue::parse(v).map(|v| (k.to_string(), v)))
            .collect()
    }

    struct FailingSource;

    impl SecretSource for FailingSource {
        fn layer(&self) -> SourceLayer {
            SourceLayer::ConfigFile
        }

        fn read(&self) -> SecretsResult<SecretMap> {
            Err(SecretsError::FileRead {
                path: "/nope/api_keys.env".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    #[test]
    fn test_environment_beats_file() {
        let chain = ResolutionChain::new()
            .with_source(EnvironmentSource::from_vars([("COINGECKO_API_KEY", "env")]))
            .with_source(StaticSource::new(SourceLayer::ConfigFile, map(&[("COINGECKO_API_KEY", "file")])));

        let resolved = chain.resolve().unwrap();
        assert_eq!(resolved.get("COINGECKO_API_KEY"), Some(&SecretValue::Value("env".into())));
        assert_eq!(resolved.origin("COINGECKO_API_KEY"), Some(SourceLayer::Environment));
    }

    #[test]
    fn test_file_beats_default() {
        let chain = ResolutionChain::new()
            .with_source(StaticSource::new(SourceLayer::ConfigFile, map(&[("OFAC_API_KEY", "real-key")])))
            .with_source(StaticSource::registry_defaults());

        let resolved = chain.resolve().unwrap();
        assert_eq!(resolved.get("OFAC_API_KEY"), Some(&SecretValue::Value("real-key".into())));
        assert_eq!(resolved.origin("OFAC_API_KEY"), Some(SourceLayer::ConfigFile));
    }

    #[test]
    fn test_undefined_is_none() {
        let resolved = ResolutionChain::new()
            .with_source(StaticSource::registry_defaults())
            .resolve()
            .unwrap();

        assert_eq!(resolved.get("BLOCKCYPHER_API_KEY"), None);
        assert!(!resolved.contains("BLOCKCYPHER_API_KEY"));
    }

    #[test]
    fn test_sentinel_distinct_from_undefined() {
        let resolved = ResolutionChain::new()
            .with_source(StaticSource::registry_defaults())
            .resolve()
            .unwrap();

        let value = resolved.get("OFAC_API_KEY");
        assert_eq!(value, Some(&SecretValue::NotApplicable));
        assert_ne!(value, None);
        assert_eq!(resolved.origin("OFAC_API_KEY"), Some(SourceLayer::Default));
    }

    #[test]
    fn test_failed_layer_is_skipped() {
        let chain = ResolutionChain::new()
            .with_source(StaticSource::registry_defaults())
            .with_source(FailingSource)
            .with_source(EnvironmentSource::from_vars([("CHAINZ_API_KEY", "cz")]));

        let resolved = chain.resolve().unwrap();
        assert_eq!(resolved.layer_errors().len(), 1);
        assert_eq!(resolved.layer_errors()[0].layer, SourceLayer::ConfigFile);
        assert!(resolved.contains("CHAINZ_API_KEY"));
        assert!(resolved.contains("OFAC_API_KEY"));
    }

    #[test]
    fn test_malformed_override_is_fatal() {
        let chain = ResolutionChain::new()
            .with_source(StaticSource::registry_defaults())
            .with_source(FileSource::new(Some("".into()), Vec::new(), Vec::new()));

        assert!(matches!(chain.resolve(), Err(SecretsError::InvalidOverridePath(_))));
    }
}
