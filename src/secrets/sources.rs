//! Source readers for the resolution chain.
//!
//! # Responsibilities
//! - Read recognized credential variables from the process environment
//! - Locate and parse `KEY=VALUE` secrets files
//! - Expose the registry defaults as the lowest layer

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::SecretsConfig;
use crate::secrets::registry;
use crate::secrets::types::{SecretMap, SecretValue, SecretsError, SecretsResult, SourceLayer};

/// A reader producing the raw entries of one layer.
///
/// Sources are re-read from scratch on every resolution.
pub trait SecretSource: Send + Sync {
    /// Layer this source populates.
    fn layer(&self) -> SourceLayer;

    /// Read all entries this source currently defines.
    fn read(&self) -> SecretsResult<SecretMap>;
}

/// Read all recognized credential variables from the process environment.
pub fn read_environment() -> SecretMap {
    environment_from(utf8_vars(std::env::vars_os()))
}

/// Keep only entries whose name and value are both valid UTF-8.
///
/// Unrelated variables may hold arbitrary bytes; they are dropped rather
/// than aborting the listing.
pub fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
}

/// Filter an environment listing down to the application's key namespace.
pub fn environment_from<I>(vars: I) -> SecretMap
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(name, _)| registry::is_recognized_name(name))
        .filter_map(|(name, raw)| SecretValue::parse(&raw).map(|value| (name, value)))
        .collect()
}

/// Parse the contents of a `KEY=VALUE` secrets file.
///
/// Blank lines, `#` comments and lines without `=` are skipped. Within one
/// file the first occurrence of a key wins.
pub fn parse_env_file(content: &str) -> SecretMap {
    let mut entries = SecretMap::new();

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || entries.contains_key(key) {
            continue;
        }
        let value = value.trim().trim_matches('"').trim_matches('\'');
        if let Some(value) = SecretValue::parse(value) {
            entries.insert(key.to_string(), value);
        }
    }

    entries
}

/// Read a secrets file.
///
/// A missing file yields an empty mapping unless it was explicitly
/// requested; any other I/O failure is a [`SecretsError::FileRead`].
pub fn read_file(path: &Path, explicit: bool) -> SecretsResult<SecretMap> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(parse_env_file(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound && !explicit => Ok(SecretMap::new()),
        Err(source) => Err(SecretsError::FileRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Process environment layer.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSource {
    snapshot: Option<Vec<(String, String)>>,
}

impl EnvironmentSource {
    /// Read the live process environment on every resolution.
    pub fn from_process() -> Self {
        Self { snapshot: None }
    }

    /// Use a fixed listing instead of the live environment.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            snapshot: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }
}

impl SecretSource for EnvironmentSource {
    fn layer(&self) -> SourceLayer {
        SourceLayer::Environment
    }

    fn read(&self) -> SecretsResult<SecretMap> {
        Ok(match &self.snapshot {
            Some(vars) => environment_from(vars.iter().cloned()),
            None => read_environment(),
        })
    }
}

/// Secrets file layer.
#[derive(Debug, Clone)]
pub struct FileSource {
    override_path: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
    file_names: Vec<String>,
}

/// A located secrets file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFile {
    pub path: PathBuf,
    /// True when named by the override rather than discovered.
    pub explicit: bool,
}

impl FileSource {
    pub fn new(
        override_path: Option<PathBuf>,
        search_dirs: Vec<PathBuf>,
        file_names: Vec<String>,
    ) -> Self {
        Self {
            override_path,
            search_dirs,
            file_names,
        }
    }

    pub fn from_config(config: &SecretsConfig) -> Self {
        Self::new(
            config.override_file.clone(),
            config.effective_search_dirs(),
            config.file_names.clone(),
        )
    }

    /// Candidate paths in search order, duplicates removed.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for dir in &self.search_dirs {
            for name in &self.file_names {
                let path = dir.join(name);
                let key = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
                if seen.insert(key) {
                    out.push(path);
                }
            }
        }
        out
    }

    /// Decide which file this layer reads.
    ///
    /// The override is used exclusively when present. Otherwise the first
    /// existing candidate wins.
    pub fn locate(&self) -> SecretsResult<Option<LocatedFile>> {
        if let Some(raw) = &self.override_path {
            return Ok(Some(LocatedFile {
                path: expand_override(raw)?,
                explicit: true,
            }));
        }

        Ok(self
            .candidates()
            .into_iter()
            .find(|path| path.is_file())
            .map(|path| LocatedFile {
                path,
                explicit: false,
            }))
    }
}

impl SecretSource for FileSource {
    fn layer(&self) -> SourceLayer {
        SourceLayer::ConfigFile
    }

    fn read(&self) -> SecretsResult<SecretMap> {
        match self.locate()? {
            Some(file) => {
                let entries = read_file(&file.path, file.explicit)?;
                tracing::debug!(
                    path = %file.path.display(),
                    explicit = file.explicit,
                    entries = entries.len(),
                    "Secrets file read"
                );
                Ok(entries)
            }
            None => {
                tracing::debug!("No secrets file found");
                Ok(SecretMap::new())
            }
        }
    }
}

fn expand_override(raw: &Path) -> SecretsResult<PathBuf> {
    let text = raw.to_string_lossy();
    if text.trim().is_empty() || text.contains('\0') {
        return Err(SecretsError::InvalidOverridePath(text.into_owned()));
    }

    let rest = if text == "~" {
        Some("")
    } else {
        text.strip_prefix("~/")
    };

    match rest {
        Some(rest) => {
            let home = std::env::var_os("HOME")
                .filter(|h| !h.is_empty())
                .ok_or_else(|| SecretsError::InvalidOverridePath(text.to_string()))?;
            Ok(PathBuf::from(home).join(rest))
        }
        None => Ok(raw.to_path_buf()),
    }
}

/// Fixed entries, typically the registry defaults.
#[derive(Debug, Clone)]
pub struct StaticSource {
    layer: SourceLayer,
    entries: SecretMap,
}

impl StaticSource {
    pub fn new(layer: SourceLayer, entries: SecretMap) -> Self {
        Self { layer, entries }
    }

    /// Built-in defaults from the service registry.
    pub fn registry_defaults() -> Self {
        Self::new(SourceLayer::Default, registry::default_secrets())
    }
}

impl SecretSource for StaticSource {
    fn layer(&self) -> SourceLayer {
        self.layer
    }

    fn read(&self) -> SecretsResult<SecretMap> {
        Ok(self.entries.clone())
    }
}
