// src/config.rs
//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields the standard setup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;

/// Provider identity that assemblies name to grant adapters access to internal members.
pub const DEFAULT_PROVIDER_IDENTITY: &str = "conform.adapters";
/// Attribute that flags an interface as a static capability set.
pub const DEFAULT_STATIC_ATTRIBUTE: &str = "conform.Static";
/// Generic marker interface a type implements to announce a static capability.
pub const DEFAULT_ADAPTER_MARKER: &str = "conform.IStatic";
/// Assembly attribute carrying internals-visibility grants.
pub const INTERNALS_VISIBLE_TO: &str = "InternalsVisibleTo";

/// Configuration shared by the resolver, the adapter registry, the oracle and
/// the policy checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Identity of the trusted adapter provider.
    pub provider_identity: String,
    /// Largest parameter count a forwarded member may have.
    pub max_parameters: u8,
    /// Full name of the static capability attribute.
    pub static_attribute: String,
    /// Full name (without arity) of the adapter marker interface.
    pub adapter_marker: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider_identity: DEFAULT_PROVIDER_IDENTITY.to_string(),
            max_parameters: u8::MAX,
            static_attribute: DEFAULT_STATIC_ATTRIBUTE.to_string(),
            adapter_marker: DEFAULT_ADAPTER_MARKER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self, LoadError> {
        toml::from_str(source).map_err(LoadError::from_toml)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source).map_err(|e| e.with_file(&path.display().to_string()))
    }

    /// Load `path` if given, else `conform.toml` in the working directory if it
    /// exists, else the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, LoadError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let local = Path::new("conform.toml");
        if local.is_file() {
            tracing::debug!("using conform.toml from working directory");
            return Self::load(local);
        }
        Ok(Self::default())
    }
}
