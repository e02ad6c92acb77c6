use crate::error::Result;

/// Abstract interface for raw slot storage.
///
/// A backend only knows how to read and write strings under a key, the way a
/// browser's local storage does. Serialization and the meaning of the stored
/// value live in [`super::persistence::Persistence`].
pub trait StorageBackend {
    /// Read the value stored under `key`.
    /// Returns `Ok(None)` when nothing was ever written (first run).
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    /// MUST be atomic so a crash never leaves a half-written value behind.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}
