use serde::{Deserialize, Serialize};

use transit_store::StoreBackend;

use crate::error::{ForestError, ForestResult};

/// Configuration for an [`IndexedForest`](crate::IndexedForest).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of nodes the store is pre-sized for.
    pub initial_capacity: usize,
    /// Store implementation holding the nodes.
    pub backend: StoreBackend,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
            backend: StoreBackend::default(),
        }
    }
}

impl ForestConfig {
    /// A configuration using the single-lock backend.
    pub fn locked() -> Self {
        Self {
            backend: StoreBackend::Locked,
            ..Default::default()
        }
    }

    /// Check the configuration before opening a store with it.
    pub fn validate(&self) -> ForestResult<()> {
        if let StoreBackend::Sharded {
            shard_amount: Some(shards),
        } = self.backend
        {
            if shards < 2 || !shards.is_power_of_two() {
                return Err(ForestError::Config(format!(
                    "shard_amount must be a power of two greater than 1, got {shards}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ForestConfig::default();
        assert_eq!(c.backend, StoreBackend::Sharded { shard_amount: None });
        assert_eq!(c.initial_capacity, 256);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn locked_config() {
        let c = ForestConfig::locked();
        assert_eq!(c.backend, StoreBackend::Locked);
        assert_eq!(c.initial_capacity, 256);
    }

    #[test]
    fn rejects_bad_shard_amount() {
        for shards in [0, 1, 12] {
            let c = ForestConfig {
                backend: StoreBackend::Sharded {
                    shard_amount: Some(shards),
                },
                ..Default::default()
            };
            assert!(matches!(c.validate(), Err(ForestError::Config(_))));
        }
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let c: ForestConfig = toml::from_str("initial_capacity = 4096").unwrap();
        assert_eq!(c.initial_capacity, 4096);
        assert_eq!(c.backend, StoreBackend::default());

        let c: ForestConfig =
            toml::from_str("[backend]\nkind = \"sharded\"\nshard_amount = 64\n").unwrap();
        assert_eq!(
            c.backend,
            StoreBackend::Sharded {
                shard_amount: Some(64)
            }
        );
    }
}
