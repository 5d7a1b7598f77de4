//! Persisted user preferences.
//!
//! An [`OptionStore`] owns one option value and writes it through to a
//! [`KeyValueStore`] after every mutation. There is no implicit reactivity:
//! callers mutate via [`OptionStore::set`] or [`OptionStore::update`].

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

use crate::foundation::error::{PostframeError, PostframeResult};

/// String key-value persistence collaborator.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> PostframeResult<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> PostframeResult<()>;
}

/// In-memory store, mostly for tests and ephemeral sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> PostframeResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> PostframeResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per key.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> PostframeResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create preference dir '{}'", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PostframeResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(PostframeError::validation(format!(
                "preference key '{key}' must be [A-Za-z0-9._-] and not start with '.'"
            )));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> PostframeResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read preference '{}'", path.display()))
                .into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> PostframeResult<()> {
        let path = self.path_for(key)?;
        std::fs::write(&path, value)
            .with_context(|| format!("write preference '{}'", path.display()))?;
        Ok(())
    }
}

/// A single persisted value bound to a key.
#[derive(Debug)]
pub struct OptionStore<T, S> {
    key: String,
    value: T,
    backend: S,
}

impl<T, S> OptionStore<T, S>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    /// Bind `key`, preferring a previously persisted value over `initial`.
    ///
    /// The resolved value is written back immediately so the store always
    /// reflects what the caller sees.
    pub fn open(key: impl Into<String>, initial: T, backend: S) -> PostframeResult<Self> {
        let key = key.into();
        let value = match backend.get_item(&key)? {
            Some(raw) => match serde_json::from_str::<T>(&raw) {
                Ok(v) => v,
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "discarding unreadable preference");
                    initial
                }
            },
            None => initial,
        };
        let mut store = Self {
            key,
            value,
            backend,
        };
        store.persist()?;
        Ok(store)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and persist it.
    pub fn set(&mut self, value: T) -> PostframeResult<()> {
        self.value = value;
        self.persist()
    }

    /// Mutate the value in place and persist it.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) -> PostframeResult<()> {
        f(&mut self.value);
        self.persist()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_inner(self) -> (T, S) {
        (self.value, self.backend)
    }

    fn persist(&mut self) -> PostframeResult<()> {
        let raw = serde_json::to_string(&self.value)
            .map_err(|e| PostframeError::serde(format!("serialize '{}': {e}", self.key)))?;
        self.backend.set_item(&self.key, &raw)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/options/store.rs"]
mod tests;
