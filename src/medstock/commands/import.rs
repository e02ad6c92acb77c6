use crate::commands::{CmdMessage, CmdResult, ImportOutcome};
use crate::csv::from_csv;
use crate::error::Result;
use crate::store::{ProductStore, StorageBackend};

/// Replace the inventory with the products in `text`.
///
/// The file is fully decoded before anything else happens, so a bad header leaves
/// the store untouched. Without `confirmed` the products are only counted.
pub fn run<B: StorageBackend>(
    store: &mut ProductStore<B>,
    text: &str,
    confirmed: bool,
) -> Result<CmdResult> {
    let products = from_csv(text)?;
    let count = products.len();
    let mut result = CmdResult::default();

    if !confirmed {
        result.add_message(CmdMessage::info(format!(
            "Found {} products. The current inventory was not replaced.",
            count
        )));
        return Ok(result.with_import(ImportOutcome::Pending { found: count }));
    }

    store.replace_all(products)?;
    tracing::info!(count, "inventory replaced from CSV");
    result.add_message(CmdMessage::success(format!(
        "Inventory imported: {} products",
        count
    )));
    Ok(result
        .with_affected_products(store.all().to_vec())
        .with_import(ImportOutcome::Replaced { imported: count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::{to_csv, CSV_HEADER};
    use crate::error::StockError;
    use crate::store::product_store::fixtures::StoreFixture;

    fn file_with(rows: &[&str]) -> String {
        let mut lines = vec![CSV_HEADER.join(",")];
        lines.extend(rows.iter().map(|r| r.to_string()));
        lines.join("\n")
    }

    #[test]
    fn confirmed_import_replaces_inventory() {
        let mut fixture = StoreFixture::new().with_products(3);
        let text = file_with(&["x,\"Soro\",Adult,Solution,4,2030-01-01"]);

        let result = run(&mut fixture.store, &text, true).unwrap();

        assert_eq!(result.import, Some(ImportOutcome::Replaced { imported: 1 }));
        assert_eq!(fixture.store.len(), 1);
        assert_eq!(fixture.store.all()[0].name, "Soro");
    }

    #[test]
    fn unconfirmed_import_changes_nothing() {
        let mut fixture = StoreFixture::new().with_products(2);
        let before = fixture.store.all().to_vec();
        let writes = fixture.store.backend().write_count();
        let text = to_csv(&before);

        let result = run(&mut fixture.store, &text, false).unwrap();

        assert_eq!(result.import, Some(ImportOutcome::Pending { found: 2 }));
        assert_eq!(fixture.store.all(), before.as_slice());
        assert_eq!(fixture.store.backend().write_count(), writes);
    }

    #[test]
    fn wrong_header_aborts_without_change() {
        let mut fixture = StoreFixture::new().with_products(2);
        let before = fixture.store.all().to_vec();

        let result = run(&mut fixture.store, "A,B,C,D,E,F\n1,X,Adult,T,1,", true);

        assert!(matches!(result, Err(StockError::InvalidFormat(_))));
        assert_eq!(fixture.store.all(), before.as_slice());
    }

    #[test]
    fn imported_ids_are_fresh() {
        let mut fixture = StoreFixture::new().with_products(2);
        let before = fixture.store.all().to_vec();
        let text = to_csv(&before);

        run(&mut fixture.store, &text, true).unwrap();

        for (old, new) in before.iter().zip(fixture.store.all()) {
            assert_ne!(old.id, new.id);
            assert_eq!(old.name, new.name);
        }
    }
}
