//! # Storage Layer
//!
//! Persistence is split in two, mirroring a browser's local storage:
//!
//! 1. [`backend::StorageBackend`]: raw string slots addressed by key.
//!    - [`fs_backend::FsBackend`]: production, one `<key>.json` file per slot.
//!    - [`mem_backend::MemBackend`]: tests, no file system involved.
//! 2. [`persistence::Persistence`]: turns the product collection into the
//!    `{ "products": [...] }` document stored under [`persistence::STORAGE_KEY`].
//!
//! On top sits [`product_store::ProductStore`], the single owner of the collection.
//! It loads once on open and saves after every mutation.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── medication_stock_data.json   # The inventory
//! └── config.json                  # User configuration
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod persistence;
pub mod product_store;

pub use backend::StorageBackend;
pub use product_store::ProductStore;
