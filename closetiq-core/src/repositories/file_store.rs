use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use closetiq_common::error::Error;
use closetiq_common::traits::KeyValueStore;

/// One JSON file per key inside a data directory.
///
/// Values are written to a sibling temp file and renamed into place so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| Error::Storage(format!("{} is not valid UTF-8: {}", path.display(), e)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn set_get_remove() -> Result<(), Error> {
        let dir = TempDir::new()?;
        let store = FileKeyValueStore::new(dir.path().join("nested"));

        assert_eq!(store.get("closetIQ-wardrobe").await?, None);

        store.set("closetIQ-wardrobe", "[]").await?;
        assert_eq!(store.get("closetIQ-wardrobe").await?.as_deref(), Some("[]"));
        assert!(store.path_for("closetIQ-wardrobe").ends_with("closetIQ-wardrobe.json"));

        store.set("closetIQ-wardrobe", "[1]").await?;
        assert_eq!(store.get("closetIQ-wardrobe").await?.as_deref(), Some("[1]"));

        store.remove("closetIQ-wardrobe").await?;
        store.remove("closetIQ-wardrobe").await?;
        assert_eq!(store.get("closetIQ-wardrobe").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn non_utf8_value_is_a_storage_error() -> Result<(), Error> {
        let dir = TempDir::new()?;
        let store = FileKeyValueStore::new(dir.path());
        std::fs::write(store.path_for("closetIQ-wardrobe"), [0xff, 0xfe, b'[', b']'])?;

        let err = store.get("closetIQ-wardrobe").await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        Ok(())
    }

    #[test]
    fn keys_are_sanitized() {
        let store = FileKeyValueStore::new("/data");
        assert_eq!(store.path_for("../etc/passwd"), PathBuf::from("/data/___etc_passwd.json"));
    }
}
