//! Shared, reloadable handle over the resolved secrets.

use std::sync::Arc;
use arc_swap::ArcSwap;

use crate::secrets::chain::{ResolutionChain, ResolvedSecrets};
use crate::secrets::registry;
use crate::secrets::types::{SecretValue, SecretsResult};

/// Resolved secrets plus the chain that produced them.
///
/// Reads are lock-free. [`SecretStore::reload`] recomputes every layer and
/// swaps the snapshot atomically; readers holding an older snapshot keep it.
pub struct SecretStore {
    chain: ResolutionChain,
    current: ArcSwap<ResolvedSecrets>,
}

impl SecretStore {
    /// Resolve the chain once and keep it for later reloads.
    pub fn resolve(chain: ResolutionChain) -> SecretsResult<Self> {
        let resolved = chain.resolve()?;
        Ok(Self {
            chain,
            current: ArcSwap::from_pointee(resolved),
        })
    }

    /// Look up a secret by name. `None` means no layer defines it.
    pub fn get(&self, name: &str) -> Option<SecretValue> {
        self.current.load().get(name).cloned()
    }

    /// Resolve the key of a registered service by its id.
    pub fn api_key(&self, service_id: &str) -> Option<SecretValue> {
        registry::find_service(service_id).and_then(|svc| self.get(svc.env_var))
    }

    /// Masked key of a registered service, safe for display.
    pub fn masked_key(&self, service_id: &str) -> String {
        registry::mask(self.api_key(service_id).as_ref())
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<ResolvedSecrets> {
        self.current.load_full()
    }

    /// Recompute from scratch. On error the previous snapshot stays active.
    pub fn reload(&self) -> SecretsResult<()> {
        let resolved = self.chain.resolve()?;
        tracing::info!(secrets = resolved.len(), "Secrets reloaded");
        self.current.store(Arc::new(resolved));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use crate::secrets::sources::{FileSource, StaticSource};

    #[test]
    fn test_api_key_and_mask() {
        let store = SecretStore::resolve(
            ResolutionChain::new()
                .with_source(StaticSource::registry_defaults())
                .with_source(crate::secrets::sources::EnvironmentSource::from_vars([(
                    "COINGECKO_API_KEY",
                    "cg-123456",
                )])),
        )
        .unwrap();

        assert_eq!(store.api_key("coingecko"), Some(SecretValue::Value("cg-123456".into())));
        assert_eq!(store.masked_key("coingecko"), "cg*****56");
        assert_eq!(store.masked_key("ofac_watchlist"), "N/A");
        assert_eq!(store.masked_key("blockcypher"), "—");
        assert_eq!(store.masked_key("unknown"), "—");
    }

    #[test]
    fn test_reload_picks_up_file_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_keys.env");
        fs::write(&path, "CHAINZ_API_KEY=first\n").unwrap();

        let store = SecretStore::resolve(ResolutionChain::new().with_source(FileSource::new(
            None,
            vec![dir.path().to_path_buf()],
            vec!["api_keys.env".into()],
        )))
        .unwrap();
        let before = store.snapshot();

        fs::write(&path, "CHAINZ_API_KEY=second\n").unwrap();
        // No watching: the old value stays until an explicit reload.
        assert_eq!(store.get("CHAINZ_API_KEY"), Some(SecretValue::Value("first".into())));

        store.reload().unwrap();
        assert_eq!(store.get("CHAINZ_API_KEY"), Some(SecretValue::Value("second".into())));
        assert_eq!(before.get("CHAINZ_API_KEY"), Some(&SecretValue::Value("first".into())));
    }
}
