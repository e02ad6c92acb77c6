use super::backend::StorageBackend;
use crate::error::{Result, StockError};
use crate::model::Product;
use serde::{Deserialize, Serialize};

/// The single slot holding the whole inventory.
pub const STORAGE_KEY: &str = "medication_stock_data";

/// Where an unreadable inventory is copied before anything overwrites it.
pub const CORRUPT_BACKUP_KEY: &str = "medication_stock_data.corrupt";

/// Persisted document layout: `{ "products": [...] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StockData {
    products: Vec<Product>,
}

#[derive(Debug, Serialize)]
struct StockDataRef<'a> {
    products: &'a [Product],
}

/// Serializes the product collection into a backend slot and back.
pub struct Persistence<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Persistence<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Overwrite the slot with the full collection.
    pub fn save(&self, products: &[Product]) -> Result<()> {
        let content = serde_json::to_string_pretty(&StockDataRef { products })?;
        self.backend.write(STORAGE_KEY, &content)?;
        tracing::debug!(count = products.len(), "inventory saved");
        Ok(())
    }

    /// Read the collection. A missing or blank slot is a first run, not an error.
    pub fn load(&self) -> Result<Vec<Product>> {
        let raw = match self.backend.read(STORAGE_KEY)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                tracing::debug!("no stored inventory, starting empty");
                return Ok(Vec::new());
            }
        };
        let data: StockData =
            serde_json::from_str(&raw).map_err(|e| StockError::CorruptState(e.to_string()))?;
        tracing::debug!(count = data.products.len(), "inventory loaded");
        Ok(data.products)
    }

    /// Copy the current slot verbatim to [`CORRUPT_BACKUP_KEY`].
    pub fn back_up_raw(&self) -> Result<()> {
        if let Some(raw) = self.backend.read(STORAGE_KEY)? {
            self.backend.write(CORRUPT_BACKUP_KEY, &raw)?;
            tracing::warn!(key = CORRUPT_BACKUP_KEY, "unreadable inventory copied aside");
        }
        Ok(())
    }
}
