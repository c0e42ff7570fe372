//! Secure key-value storage seam.
//!
//! Holds the session token between launches. Values are opaque strings.

use crate::error::Result;

#[async_trait::async_trait]
pub trait SecureStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn delete_item(&self, key: &str) -> Result<()>;
}
