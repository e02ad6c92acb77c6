use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ProductId;
use crate::store::{ProductStore, StorageBackend};

pub fn run<B: StorageBackend>(store: &mut ProductStore<B>, id: &ProductId) -> Result<CmdResult> {
    let product = store.remove(id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Product removed: {}",
        product.name
    )));
    Ok(result.with_affected_products(vec![product]))
}
