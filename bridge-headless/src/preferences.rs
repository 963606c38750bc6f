//! Native preference store simulations

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::NativePreferences,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory preference store
///
/// Behaves like a freshly installed app's UserDefaults/SharedPreferences:
/// empty on start, lost on drop.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl NativePreferences for MemoryPreferences {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.lock().await.clear();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock().await.keys().cloned().collect())
    }
}

/// Preference store persisted as a flat JSON object
///
/// Every mutation rewrites the whole file and only takes effect in memory
/// once the write succeeds. Suitable for desktop shells that
/// want preferences to survive restarts; not meant for large data.
#[derive(Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFilePreferences {
    /// Open (or lazily create) the store at `path`
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(BridgeError::Io)?;
        }

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                BridgeError::Decode(format!("preferences file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(BridgeError::Io(e)),
        };

        debug!(path = ?path, entries = entries.len(), "Opened preference file");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| BridgeError::OperationFailed(format!("encode preferences: {}", e)))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(BridgeError::Io)
    }
}

#[async_trait]
impl NativePreferences for JsonFilePreferences {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        let mut staged = entries.clone();
        staged.insert(key.to_string(), value.to_string());
        self.persist(&staged).await?;
        *entries = staged;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut staged = entries.clone();
        staged.remove(key);
        self.persist(&staged).await?;
        *entries = staged;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.lock().await;
        let staged = BTreeMap::new();
        self.persist(&staged).await?;
        *entries = staged;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_preferences_roundtrip() {
        let prefs = MemoryPreferences::new();
        assert_eq!(prefs.get("theme").await.unwrap(), None);

        prefs.set("theme", "dark").await.unwrap();
        prefs.set("theme", "light").await.unwrap();
        assert_eq!(prefs.get("theme").await.unwrap(), Some("light".to_string()));

        prefs.remove("theme").await.unwrap();
        prefs.remove("theme").await.unwrap();
        assert_eq!(prefs.get("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_preferences_clear() {
        let prefs = MemoryPreferences::with_entries([("a", "1"), ("b", "2")]);
        assert_eq!(prefs.keys().await.unwrap(), vec!["a", "b"]);

        prefs.clear().await.unwrap();
        assert!(prefs.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_file_preferences_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shell").join("preferences.json");

        let prefs = JsonFilePreferences::open(&path).await.unwrap();
        prefs.set("auth_token", "t1").await.unwrap();
        prefs.set("locale", "de").await.unwrap();
        drop(prefs);

        let reopened = JsonFilePreferences::open(&path).await.unwrap();
        assert_eq!(reopened.get("auth_token").await.unwrap(), Some("t1".to_string()));
        assert_eq!(reopened.keys().await.unwrap(), vec!["auth_token", "locale"]);

        reopened.clear().await.unwrap();
        let cleared = JsonFilePreferences::open(&path).await.unwrap();
        assert!(cleared.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_file_preferences_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let err = JsonFilePreferences::open(&path).await.unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
    }

    #[tokio::test]
    async fn test_json_file_preferences_failed_write_leaves_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let prefs = JsonFilePreferences::open(&path).await.unwrap();
        prefs.set("locale", "de").await.unwrap();

        // A directory in place of the file makes every write fail.
        tokio::fs::remove_file(&path).await.unwrap();
        tokio::fs::create_dir(&path).await.unwrap();

        assert!(matches!(
            prefs.set("auth_token", "t1").await,
            Err(BridgeError::Io(_))
        ));
        assert!(prefs.remove("locale").await.is_err());
        assert!(prefs.clear().await.is_err());

        assert_eq!(prefs.get("auth_token").await.unwrap(), None);
        assert_eq!(prefs.get("locale").await.unwrap(), Some("de".to_string()));
        assert_eq!(prefs.keys().await.unwrap(), vec!["locale"]);
    }
}
