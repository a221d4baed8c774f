//! Configuration for Concord components
//!
//! Sources are layered with increasing priority: defaults, a TOML file, then
//! environment variables. The result is validated before use.
//!
//! ```toml
//! [ring]
//! replicas = 8
//!
//! [counter]
//! node_id = "replica-a"
//! ```

use crate::errors::{ConcordError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable overriding [`RingConfig::replicas`].
pub const ENV_RING_REPLICAS: &str = "CONCORD_RING_REPLICAS";
/// Environment variable overriding [`CounterConfig::node_id`].
pub const ENV_NODE_ID: &str = "CONCORD_NODE_ID";

/// Default number of virtual positions per physical node.
pub const DEFAULT_REPLICAS: usize = 10;

/// Configuration validation trait
pub trait ConfigValidation {
    /// Validate the configuration
    fn validate(&self) -> Result<()>;
}

/// Hash ring settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Virtual positions created per physical node (must be at least 1)
    pub replicas: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
        }
    }
}

impl ConfigValidation for RingConfig {
    fn validate(&self) -> Result<()> {
        if self.replicas == 0 {
            return Err(ConcordError::invalid_config(
                "ring.replicas must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Replica counter settings
///
/// There is no default identity: two processes sharing one would merge into
/// the same slot and lose increments. `node_id` must come from the file or
/// [`ENV_NODE_ID`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Stable identity of the local replica; unique across the cluster
    pub node_id: String,
}

impl ConfigValidation for CounterConfig {
    fn validate(&self) -> Result<()> {
        if self.node_id.trim().is_empty() {
            return Err(ConcordError::invalid_config(
                "counter.node_id must be set to an identity unique to this replica",
            ));
        }
        Ok(())
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcordConfig {
    /// Hash ring settings
    pub ring: RingConfig,
    /// Replica counter settings
    pub counter: CounterConfig,
}

impl ConfigValidation for ConcordConfig {
    fn validate(&self) -> Result<()> {
        self.ring.validate()?;
        self.counter.validate()
    }
}

impl ConcordConfig {
    /// Parse a TOML document. Missing tables and keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Load configuration from a TOML file without validating it.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn merge_with_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_RING_REPLICAS) {
            self.ring.replicas = raw.trim().parse().map_err(|_| {
                ConcordError::invalid_config(format!(
                    "{ENV_RING_REPLICAS} must be a positive integer, got {raw:?}"
                ))
            })?;
            debug!(replicas = self.ring.replicas, "ring replicas overridden from environment");
        }
        if let Some(node_id) = lookup(ENV_NODE_ID) {
            self.counter.node_id = node_id;
            debug!(node_id = %self.counter.node_id, "node id overridden from environment");
        }
        Ok(())
    }

    /// Defaults, then `path` if given, then the environment; validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_vars(path, |name| std::env::var(name).ok())
    }

    /// [`load`](Self::load) with overrides taken from `lookup` instead of the
    /// process environment.
    pub fn load_with_vars<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_vars(lookup)?;
        config.validate()?;
        Ok(config)
    }
}
