//! File-backed settings storage

use std::path::Path;

use frame::provider::{MemoryProvider, Provider, Snapshot};
use serde_json::Value;

use crate::prelude::*;

/// Settings held in memory and written through to a JSON file
#[derive(Debug)]
pub struct JsonSettings {
    path: Option<PathBuf>,
    store: MemoryProvider,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonSettings {
    /// Load settings from `path`, or start empty if it does not exist yet.
    /// With no path, settings are kept in memory only.
    #[instrument(level = "debug")]
    pub async fn open(path: Option<PathBuf>) -> Result<Self> {
        let store = match path {
            Some(ref path) => Self::load(path).await?,
            None => {
                warn!("No settings file configured, settings will not persist");
                MemoryProvider::new()
            },
        };

        Ok(Self {
            path,
            store,
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    async fn load(path: &Path) -> Result<MemoryProvider> {
        let bytes = match tokio::fs::read(path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Settings file {path:?} not found, starting empty");
                return Ok(MemoryProvider::new());
            },
            Err(e) => return Err(e).with_context(|| format!("Error reading {path:?}")),
        };

        let snap: Snapshot = serde_json::from_slice(&bytes)
            .with_context(|| format!("Error parsing settings file {path:?}"))?;

        debug!(scopes = snap.len(), "Loaded settings");
        Ok(MemoryProvider::from_snapshot(snap))
    }

    /// Write the current snapshot to disk.  Callers must hold `write_lock`
    /// from their in-memory change until this returns.
    async fn persist(&self) -> Result {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        let json = serde_json::to_vec_pretty(&self.store.snapshot().await)
            .context("Error serializing settings")?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Error writing {tmp:?}"))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Error replacing {path:?}"))
    }
}

#[async_trait]
impl Provider for JsonSettings {
    async fn get(&self, scope: &str, key: &str) -> Result<Option<Value>> {
        self.store.get(scope, key).await
    }

    async fn set(&self, scope: &str, key: &str, value: Value) -> Result {
        let _guard = self.write_lock.lock().await;
        let prev = self.store.get(scope, key).await?;
        self.store.set(scope, key, value).await?;

        if let Err(err) = self.persist().await {
            match prev {
                Some(prev) => self.store.set(scope, key, prev).await?,
                None => {
                    self.store.remove(scope, key).await?;
                },
            }

            return Err(err);
        }

        Ok(())
    }

    async fn remove(&self, scope: &str, key: &str) -> Result<Option<Value>> {
        let _guard = self.write_lock.lock().await;
        let prev = self.store.remove(scope, key).await?;

        if let Some(ref prev) = prev {
            if let Err(err) = self.persist().await {
                self.store.set(scope, key, prev.clone()).await?;
                return Err(err);
            }
        }

        Ok(prev)
    }
}

#[cfg(test)]
mod tests {
    use frame::provider::{self, Provider};
    use serde_json::json;

    use super::JsonSettings;
    use crate::prelude::*;

    #[tokio::test]
    async fn test_persist_and_reload() -> Result {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.json");

        let settings = JsonSettings::open(Some(path.clone())).await?;
        assert_eq!(settings.get("global", "prefix").await?, None);

        provider::set(&settings, "123", "prefix", "q!").await?;
        settings.set("global", "user-blacklist", json!([])).await?;
        assert!(path.exists());

        let reloaded = JsonSettings::open(Some(path.clone())).await?;
        assert_eq!(reloaded.get("123", "prefix").await?, Some(json!("q!")));
        assert_eq!(reloaded.remove("123", "prefix").await?, Some(json!("q!")));

        let reloaded = JsonSettings::open(Some(path)).await?;
        assert_eq!(reloaded.get("123", "prefix").await?, None);
        assert_eq!(
            reloaded.get("global", "user-blacklist").await?,
            Some(json!([]))
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_file() -> Result {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json")?;

        assert!(JsonSettings::open(Some(path)).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_only() -> Result {
        let settings = JsonSettings::open(None).await?;
        settings.set("global", "prefix", json!("$")).await?;
        assert_eq!(settings.get("global", "prefix").await?, Some(json!("$")));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_write_keeps_old_value() -> Result {
        let dir = tempfile::tempdir()?;
        let sub = dir.path().join("data");
        std::fs::create_dir(&sub)?;

        let settings = JsonSettings::open(Some(sub.join("settings.json"))).await?;
        provider::set(&settings, "123", "prefix", "q!").await?;

        std::fs::remove_dir_all(&sub)?;

        assert!(provider::set(&settings, "123", "prefix", "$").await.is_err());
        assert_eq!(settings.get("123", "prefix").await?, Some(json!("q!")));

        assert!(settings.set("123", "color", json!("red")).await.is_err());
        assert_eq!(settings.get("123", "color").await?, None);

        assert!(settings.remove("123", "prefix").await.is_err());
        assert_eq!(settings.get("123", "prefix").await?, Some(json!("q!")));

        Ok(())
    }
}
