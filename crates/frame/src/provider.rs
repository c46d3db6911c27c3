//! Scoped key-value settings storage

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::prelude::*;

/// Scope name for bot-wide settings
pub const GLOBAL_SCOPE: &str = "global";
/// Global key holding the list of users whose messages are ignored
pub const BLACKLIST_KEY: &str = "user-blacklist";
/// Per-guild (or global) key holding the command prefix
pub const PREFIX_KEY: &str = "prefix";

/// A persistent settings store
///
/// Settings are JSON values addressed by a scope (`"global"`, or a guild ID)
/// and a key.
#[async_trait]
pub trait Provider: fmt::Debug + Send + Sync {
    /// Read a setting, returning `None` if it is unset
    async fn get(&self, scope: &str, key: &str) -> Result<Option<Value>>;

    /// Write a setting
    async fn set(&self, scope: &str, key: &str, value: Value) -> Result;

    /// Clear a setting, returning its previous value
    async fn remove(&self, scope: &str, key: &str) -> Result<Option<Value>>;
}

/// Read a setting and deserialize it, falling back to `default` if unset
///
/// # Errors
/// Fails if the provider fails or if the stored value does not have the
/// expected shape.
pub async fn get_or<T: DeserializeOwned>(
    provider: &(impl Provider + ?Sized),
    scope: &str,
    key: &str,
    default: T,
) -> Result<T> {
    match provider.get(scope, key).await? {
        Some(val) => serde_json::from_value(val)
            .with_context(|| format!("Invalid value for setting {key:?} in scope {scope:?}")),
        None => Ok(default),
    }
}

/// Serialize a value and write it as a setting
///
/// # Errors
/// Fails if serialization or the provider fails.
pub async fn set<T: Serialize + ?Sized>(
    provider: &(impl Provider + ?Sized),
    scope: &str,
    key: &str,
    value: &T,
) -> Result {
    let value = serde_json::to_value(value)
        .with_context(|| format!("Error serializing setting {key:?}"))?;
    provider.set(scope, key, value).await
}

/// The settings map held by a [`MemoryProvider`], keyed by scope then key
pub type Snapshot = std::collections::BTreeMap<String, serde_json::Map<String, Value>>;

/// A [`Provider`] holding all settings in memory
#[derive(Debug, Default)]
pub struct MemoryProvider(RwLock<HashMap<String, HashMap<String, Value>>>);

impl MemoryProvider {
    /// Construct an empty store
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Construct a store pre-populated from a snapshot
    #[must_use]
    pub fn from_snapshot(snap: Snapshot) -> Self {
        Self(RwLock::new(
            snap.into_iter()
                .map(|(scope, keys)| (scope, keys.into_iter().collect()))
                .collect(),
        ))
    }

    /// Copy out the current contents of the store
    pub async fn snapshot(&self) -> Snapshot {
        self.0
            .read()
            .await
            .iter()
            .filter(|(_, keys)| !keys.is_empty())
            .map(|(scope, keys)| {
                (
                    scope.clone(),
                    keys.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                )
            })
            .collect()
    }
}

#[async_trait]
impl Provider for MemoryProvider {
    async fn get(&self, scope: &str, key: &str) -> Result<Option<Value>> {
        Ok(self
            .0
            .read()
            .await
            .get(scope)
            .and_then(|s| s.get(key))
            .cloned())
    }

    async fn set(&self, scope: &str, key: &str, value: Value) -> Result {
        self.0
            .write()
            .await
            .entry(scope.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, scope: &str, key: &str) -> Result<Option<Value>> {
        Ok(self
            .0
            .write()
            .await
            .get_mut(scope)
            .and_then(|s| s.remove(key)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{get_or, set, MemoryProvider, Provider, GLOBAL_SCOPE};
    use crate::prelude::*;

    #[tokio::test]
    async fn test_get_or_default() -> Result {
        let store = MemoryProvider::new();

        assert_eq!(get_or(&store, "123", "prefix", "!".to_owned()).await?, "!");

        set(&store, "123", "prefix", "?").await?;
        assert_eq!(get_or(&store, "123", "prefix", "!".to_owned()).await?, "?");
        assert_eq!(get_or(&store, "456", "prefix", "!".to_owned()).await?, "!");

        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_shape() -> Result {
        let store = MemoryProvider::new();
        store.set(GLOBAL_SCOPE, "user-blacklist", json!("nope")).await?;

        assert!(get_or(&store, GLOBAL_SCOPE, "user-blacklist", Vec::<UserId>::new())
            .await
            .is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() -> Result {
        let store = MemoryProvider::new();
        set(&store, GLOBAL_SCOPE, "user-blacklist", &[UserId::new(5)]).await?;
        set(&store, "42", "prefix", "$").await?;
        store.set("7", "prefix", json!("%")).await?;
        assert_eq!(store.remove("7", "prefix").await?, Some(json!("%")));

        let snap = store.snapshot().await;
        assert_eq!(snap.len(), 2);
        assert!(!snap.contains_key("7"));

        let restored = MemoryProvider::from_snapshot(snap);
        assert_eq!(
            get_or(&restored, GLOBAL_SCOPE, "user-blacklist", Vec::<UserId>::new()).await?,
            vec![UserId::new(5)]
        );
        assert_eq!(restored.get("42", "prefix").await?, Some(json!("$")));

        Ok(())
    }
}
