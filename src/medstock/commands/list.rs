use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{ProductStore, StorageBackend};
use crate::view::{project, CategoryFilter, Projection};
use chrono::NaiveDate;

pub fn run<B: StorageBackend>(
    store: &ProductStore<B>,
    filter: &CategoryFilter,
    search: &str,
    today: NaiveDate,
) -> Result<CmdResult> {
    let projection = project(store.all(), filter, search, today);
    let mut result = CmdResult::default();

    if let Projection::Empty = projection {
        if store.is_empty() {
            result.add_message(CmdMessage::info(
                "The inventory is empty. Add a product to get started.",
            ));
        } else {
            result.add_message(CmdMessage::info("No medication found."));
        }
    }

    Ok(result.with_projection(projection))
}
