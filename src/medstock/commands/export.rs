use crate::commands::{CmdMessage, CmdResult, CsvExport};
use crate::csv::{export_filename, to_csv_file};
use crate::error::Result;
use crate::store::{ProductStore, StorageBackend};
use chrono::NaiveDate;

/// Build the export file for the whole inventory. Nothing is written here; the
/// caller decides where the file goes.
pub fn run<B: StorageBackend>(store: &ProductStore<B>, today: NaiveDate) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    if store.is_empty() {
        result.add_message(CmdMessage::info("No products to export."));
        return Ok(result);
    }

    let export = CsvExport {
        filename: export_filename(today),
        contents: to_csv_file(store.all()),
    };
    tracing::info!(file = %export.filename, count = store.len(), "inventory exported");
    result.add_message(CmdMessage::success(format!(
        "Exported {} products",
        store.len()
    )));
    Ok(result.with_export(export))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::{CSV_HEADER, UTF8_BOM};
    use crate::store::product_store::fixtures::StoreFixture;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
    }

    #[test]
    fn exports_all_products_with_dated_filename() {
        let fixture = StoreFixture::new().with_products(3);
        let result = run(&fixture.store, today()).unwrap();
        let export = result.export.unwrap();

        assert_eq!(export.filename, "inventario_medicamentos_2025-02-14.csv");
        assert!(export.contents.starts_with(UTF8_BOM));
        assert!(export.contents.contains(&CSV_HEADER.join(",")));
        assert_eq!(export.contents.lines().count(), 4);
    }

    #[test]
    fn empty_inventory_exports_nothing() {
        let fixture = StoreFixture::new();
        let result = run(&fixture.store, today()).unwrap();
        assert!(result.export.is_none());
        assert_eq!(result.messages[0].content, "No products to export.");
    }
}
