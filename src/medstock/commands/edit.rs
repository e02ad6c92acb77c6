use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StockError};
use crate::model::{ProductId, ProductPatch};
use crate::store::{ProductStore, StorageBackend};

pub fn run<B: StorageBackend>(
    store: &mut ProductStore<B>,
    id: &ProductId,
    patch: &ProductPatch,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    if patch.is_empty() {
        // Still fail on unknown ids, but skip the pointless save.
        let product = store
            .get(id)
            .cloned()
            .ok_or_else(|| StockError::NotFound(id.clone()))?;
        result.add_message(CmdMessage::info("Nothing to change."));
        return Ok(result.with_affected_products(vec![product]));
    }

    let product = store.update(id, patch)?;
    result.add_message(CmdMessage::success(format!(
        "Product updated: {}",
        product.name
    )));
    Ok(result.with_affected_products(vec![product]))
}
