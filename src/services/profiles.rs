use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{fs, sync::RwLock};
use tracing::{debug, warn};

use crate::error::AppError;

const PROFILES_FILE: &str = "local_storage.json";
const TEMP_SUFFIX: &str = "tmp";
const CORRUPT_SUFFIX: &str = "corrupt";
const PICTURE_PREFIX: &str = "profilePicture_";
const DESCRIPTION_PREFIX: &str = "profileDescription_";

/// String key-value store persisted as one JSON object, written through on
/// every change. Keys are plain `<prefix><username>` concatenations.
///
/// Writes go to a sibling temp file that is renamed over the store, and the
/// in-memory map only changes once that succeeded.
#[derive(Clone)]
pub struct ProfileStore {
    path: Arc<PathBuf>,
    values: Arc<RwLock<BTreeMap<String, String>>>,
}

impl ProfileStore {
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, AppError> {
        let root = root.as_ref();
        fs::create_dir_all(root).await?;
        let path = root.join(PROFILES_FILE);
        let values = if fs::try_exists(&path).await? {
            let raw = fs::read(&path).await?;
            if raw.is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_slice(&raw) {
                    Ok(values) => values,
                    Err(err) => {
                        let aside = sibling(&path, CORRUPT_SUFFIX);
                        fs::rename(&path, &aside).await?;
                        warn!(
                            path = %path.display(),
                            moved_to = %aside.display(),
                            "profile store unreadable, starting empty: {err}"
                        );
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };
        debug!(entries = values.len(), "profile store loaded");
        Ok(Self {
            path: Arc::new(path),
            values: Arc::new(RwLock::new(values)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: String) -> Result<(), AppError> {
        let mut values = self.values.write().await;
        let mut next = values.clone();
        next.insert(key.to_string(), value);
        self.flush(&next).await?;
        *values = next;
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut values = self.values.write().await;
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut next = values.clone();
        next.remove(key);
        self.flush(&next).await?;
        *values = next;
        Ok(())
    }

    async fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), AppError> {
        let data = serde_json::to_vec_pretty(values)?;
        let temp = sibling(self.path(), TEMP_SUFFIX);
        fs::write(&temp, data).await?;
        fs::rename(&temp, self.path()).await?;
        Ok(())
    }

    pub async fn picture(&self, username: &str) -> Option<String> {
        self.get(&format!("{PICTURE_PREFIX}{username}")).await
    }

    pub async fn set_picture(&self, username: &str, data_url: String) -> Result<(), AppError> {
        self.set(&format!("{PICTURE_PREFIX}{username}"), data_url)
            .await
    }

    pub async fn description(&self, username: &str) -> Option<String> {
        self.get(&format!("{DESCRIPTION_PREFIX}{username}")).await
    }

    /// Blank text removes the entry instead of storing it.
    pub async fn set_description(&self, username: &str, text: String) -> Result<(), AppError> {
        let key = format!("{DESCRIPTION_PREFIX}{username}");
        if text.trim().is_empty() {
            self.remove(&key).await
        } else {
            self.set(&key, text).await
        }
    }
}

/// `local_storage.json` -> `local_storage.json.<suffix>`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_write_leaves_values_untouched() {
        let root = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(root.path()).await.unwrap();
        store
            .set_description("alice", "first".to_string())
            .await
            .unwrap();

        // A directory in the temp file's place makes every write fail.
        std::fs::create_dir(sibling(store.path(), TEMP_SUFFIX)).unwrap();

        assert!(store
            .set_description("alice", "second".to_string())
            .await
            .is_err());
        assert!(store
            .set_picture("alice", "data:image/png;base64,AAAA".to_string())
            .await
            .is_err());
        assert!(store.set_description("alice", String::new()).await.is_err());

        assert_eq!(store.description("alice").await.as_deref(), Some("first"));
        assert_eq!(store.picture("alice").await, None);

        let reopened = ProfileStore::open(root.path()).await.unwrap();
        assert_eq!(reopened.description("alice").await.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn unreadable_file_is_moved_aside() {
        let root = tempfile::tempdir().unwrap();
        let truncated = r#"{"profileDescription_bob":"Sails","profilePicture_bob":"data:ima"#;
        std::fs::write(root.path().join(PROFILES_FILE), truncated).unwrap();

        let store = ProfileStore::open(root.path()).await.unwrap();
        assert_eq!(store.description("bob").await, None);
        store
            .set_description("alice", "hi".to_string())
            .await
            .unwrap();

        let aside = std::fs::read_to_string(sibling(store.path(), CORRUPT_SUFFIX)).unwrap();
        assert_eq!(aside, truncated);
        let current = std::fs::read_to_string(store.path()).unwrap();
        assert!(current.contains("profileDescription_alice"));
        assert!(!sibling(store.path(), TEMP_SUFFIX).exists());
    }

    #[tokio::test]
    async fn writes_replace_the_file_whole() {
        let root = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(root.path()).await.unwrap();
        store
            .set_description("bob", "Sails".to_string())
            .await
            .unwrap();
        store
            .set_description("alice", "Hikes".to_string())
            .await
            .unwrap();

        let raw = std::fs::read(store.path()).unwrap();
        let values: BTreeMap<String, String> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(values.len(), 2);
        assert!(!sibling(store.path(), TEMP_SUFFIX).exists());
    }
}
