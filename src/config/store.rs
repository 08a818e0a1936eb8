//! Key-value configuration sources
//!
//! The host application owns its settings storage; the orchestrator only reads
//! typed values from it through [`ConfigStore`].

use serde_json::Value;
use std::collections::HashMap;

/// Read access to a flat key-value settings store
pub trait ConfigStore: Send + Sync {
    /// Raw value for `key`, `None` when unset
    fn get(&self, key: &str) -> Option<Value>;
}

/// Map-backed store, mostly for tests and embedding hosts
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    values: HashMap<String, Value>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}

/// Environment variables named `{PREFIX}_{KEY}`, values parsed as YAML scalars
/// or flow sequences (`3`, `true`, `[429, 503]`, `openai`)
#[derive(Debug, Clone)]
pub struct EnvConfigStore {
    prefix: String,
}

impl EnvConfigStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn var_name(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key.to_uppercase())
    }
}

impl ConfigStore for EnvConfigStore {
    fn get(&self, key: &str) -> Option<Value> {
        let raw = std::env::var(self.var_name(key)).ok()?;
        Some(serde_yaml::from_str::<Value>(&raw).unwrap_or(Value::String(raw)))
    }
}
