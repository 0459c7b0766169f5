use async_trait::async_trait;

use crate::error::Error;

/// Whole-value string storage addressed by a fixed key.
///
/// Writers always replace the full value; there is no partial update.
/// A value that exists but cannot be read back as text is `Error::Storage`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    async fn remove(&self, key: &str) -> Result<(), Error>;
}
