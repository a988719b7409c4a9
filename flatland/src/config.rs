// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Registry configuration
//!
//! Tunables for storage pre-allocation and diagnostic logging. Values can be
//! set programmatically or read from the environment:
//!
//! ```bash
//! export FLATLAND_POOL_CAPACITY=256
//! export FLATLAND_ENTITY_CAPACITY=4096
//! export FLATLAND_LOG_COMPONENTS=1
//! ```

use crate::error::{EcsError, EcsResult};
use std::str::FromStr;

/// Environment variable overriding [`RegistryConfig::initial_pool_capacity`]
pub const ENV_POOL_CAPACITY: &str = "FLATLAND_POOL_CAPACITY";
/// Environment variable overriding [`RegistryConfig::entity_capacity`]
pub const ENV_ENTITY_CAPACITY: &str = "FLATLAND_ENTITY_CAPACITY";
/// Environment variable overriding [`RegistryConfig::log_component_events`]
pub const ENV_LOG_COMPONENTS: &str = "FLATLAND_LOG_COMPONENTS";

/// Configuration for registry storage behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Number of slots a component pool is created with
    pub initial_pool_capacity: usize,
    /// Number of entity signatures to reserve up front
    pub entity_capacity: usize,
    /// Whether to trace every component add/remove
    pub log_component_events: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            initial_pool_capacity: 100,
            entity_capacity: 0,
            log_component_events: false,
        }
    }
}

impl RegistryConfig {
    /// Create a configuration with custom pre-allocation sizes
    pub fn new(initial_pool_capacity: usize, entity_capacity: usize) -> Self {
        RegistryConfig {
            initial_pool_capacity,
            entity_capacity,
            log_component_events: false,
        }
    }

    /// Enable tracing of component add/remove events
    pub fn with_logging(mut self) -> Self {
        self.log_component_events = true;
        self
    }

    /// Set the slot count new pools start with
    pub fn with_initial_pool_capacity(mut self, capacity: usize) -> Self {
        self.initial_pool_capacity = capacity;
        self
    }

    /// Set the number of entity signatures reserved up front
    pub fn with_entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity;
        self
    }

    /// Build a configuration from the process environment
    ///
    /// Unset variables keep their default. A set but unparsable variable is an
    /// error rather than being silently ignored.
    pub fn from_env() -> EcsResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> EcsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = RegistryConfig::default();

        if let Some(raw) = lookup(ENV_POOL_CAPACITY) {
            config.initial_pool_capacity = parse_var(ENV_POOL_CAPACITY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ENTITY_CAPACITY) {
            config.entity_capacity = parse_var(ENV_ENTITY_CAPACITY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LOG_COMPONENTS) {
            config.log_component_events = parse_flag(ENV_LOG_COMPONENTS, &raw)?;
        }

        if config.initial_pool_capacity == 0 {
            log::warn!("{ENV_POOL_CAPACITY}=0: pools will grow from empty on first insert");
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> EcsResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| EcsError::InvalidConfig(format!("{key}: cannot parse `{raw}`")))
}

fn parse_flag(key: &str, raw: &str) -> EcsResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(EcsError::InvalidConfig(format!("{key}: expected a boolean, got `{raw}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.initial_pool_capacity, 100);
        assert_eq!(config.entity_capacity, 0);
        assert!(!config.log_component_events);
    }

    #[test]
    fn test_builder() {
        let config = RegistryConfig::new(8, 16).with_logging();
        assert_eq!(config.initial_pool_capacity, 8);
        assert_eq!(config.entity_capacity, 16);
        assert!(config.log_component_events);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = RegistryConfig::from_lookup(lookup_from(&[
            (ENV_POOL_CAPACITY, "256"),
            (ENV_LOG_COMPONENTS, "yes"),
        ]))
        .unwrap();
        assert_eq!(config.initial_pool_capacity, 256);
        assert_eq!(config.entity_capacity, 0);
        assert!(config.log_component_events);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = RegistryConfig::from_lookup(lookup_from(&[(ENV_ENTITY_CAPACITY, "lots")]))
            .unwrap_err();
        assert!(matches!(err, EcsError::InvalidConfig(msg) if msg.contains(ENV_ENTITY_CAPACITY)));

        let err = RegistryConfig::from_lookup(lookup_from(&[(ENV_LOG_COMPONENTS, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, EcsError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        let config = RegistryConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, RegistryConfig::default());
    }
}
