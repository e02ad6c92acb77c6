//! # API Facade
//!
//! The single entry point for every UI. It turns raw inputs (form strings, ids as
//! typed) into typed values, dispatches to the command layer and hands back a
//! [`CmdResult`]. It holds no logic of its own and never prints anything.
//!
//! `StockApi<B: StorageBackend>` is generic over the storage backend:
//! - Production: `StockApi<FsBackend>`
//! - Testing: `StockApi<MemBackend>`

use crate::commands;
use crate::error::Result;
use crate::model::{PatchForm, ProductForm, ProductId};
use crate::store::{ProductStore, StorageBackend};
use crate::view::{self, CategoryFilter};
use chrono::NaiveDate;
use std::path::PathBuf;

pub struct StockApi<B: StorageBackend> {
    store: ProductStore<B>,
    config_dir: PathBuf,
    today: Option<NaiveDate>,
}

impl<B: StorageBackend> StockApi<B> {
    pub fn new(store: ProductStore<B>, config_dir: PathBuf) -> Self {
        Self {
            store,
            config_dir,
            today: None,
        }
    }

    /// Pin "today" instead of reading the clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(view::today)
    }

    pub fn list_view(&self, filter: &CategoryFilter, search: &str) -> Result<CmdResult> {
        commands::list::run(&self.store, filter, search, self.today())
    }

    pub fn create_product(&mut self, form: ProductForm) -> Result<CmdResult> {
        let draft = form.into_draft()?;
        commands::create::run(&mut self.store, draft)
    }

    pub fn edit_product(&mut self, id: &str, form: PatchForm) -> Result<CmdResult> {
        let patch = form.into_patch()?;
        commands::edit::run(&mut self.store, &ProductId::from(id), &patch)
    }

    pub fn bump_quantity(&mut self, id: &str, delta: i64) -> Result<CmdResult> {
        commands::bump::run(&mut self.store, &ProductId::from(id), delta)
    }

    pub fn remove_product(&mut self, id: &str) -> Result<CmdResult> {
        commands::remove::run(&mut self.store, &ProductId::from(id))
    }

    pub fn export_csv(&self) -> Result<CmdResult> {
        commands::export::run(&self.store, self.today())
    }

    pub fn import_csv(&mut self, text: &str, confirmed: bool) -> Result<CmdResult> {
        commands::import::run(&mut self.store, text, confirmed)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    pub fn store(&self) -> &ProductStore<B> {
        &self.store
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, CsvExport, ImportOutcome, MessageLevel};
