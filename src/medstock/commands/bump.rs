use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StockError};
use crate::model::ProductId;
use crate::store::{ProductStore, StorageBackend};

pub fn run<B: StorageBackend>(
    store: &mut ProductStore<B>,
    id: &ProductId,
    delta: i64,
) -> Result<CmdResult> {
    let before = store
        .get(id)
        .map(|p| p.quantity)
        .ok_or_else(|| StockError::NotFound(id.clone()))?;
    let product = store.adjust_quantity(id, delta)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{}: {} -> {}",
        product.name, before, product.quantity
    )));
    if i64::from(before).saturating_add(delta) < 0 {
        result.add_message(CmdMessage::warning("Stock cannot go below zero."));
    }
    Ok(result.with_affected_products(vec![product]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::store::product_store::fixtures::StoreFixture;

    #[test]
    fn bumps_up_and_down() {
        let mut fixture = StoreFixture::new().with_product("Aspirina", Category::Adult, 1);
        let id = fixture.store.all()[0].id.clone();

        let up = run(&mut fixture.store, &id, 1).unwrap();
        assert_eq!(up.affected_products[0].quantity, 2);
        assert_eq!(up.messages[0].content, "Aspirina: 1 -> 2");

        let down = run(&mut fixture.store, &id, -1).unwrap();
        assert_eq!(down.affected_products[0].quantity, 1);
    }

    #[test]
    fn clamps_and_warns_below_zero() {
        let mut fixture = StoreFixture::new().with_product("Aspirina", Category::Adult, 0);
        let id = fixture.store.all()[0].id.clone();

        let result = run(&mut fixture.store, &id, -1).unwrap();
        assert_eq!(result.affected_products[0].quantity, 0);
        assert_eq!(result.messages.len(), 2);
    }
}
