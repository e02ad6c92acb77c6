//! # Medstock Architecture
//!
//! Medstock keeps a small household inventory of medication: what is on the shelf, who
//! it is for, how many units are left and when it expires. The inventory can be moved
//! in and out as a spreadsheet-friendly CSV file.
//!
//! Like any UI-agnostic core, the library never prints; the binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders listings, prompts, exit codes  │
//! │  - Reads import files and writes export files               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Parses raw form input into drafts and patches            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One operation per file, returns `CmdResult`              │
//! │  - Uses `view` for listings and `csv` for the file format   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - ProductStore owns the collection, saves on every change  │
//! │  - StorageBackend: FsBackend (production), MemBackend (test)│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns `Result<CmdResult>`. It never
//! writes to stdout/stderr, never exits and never reads the clock implicitly in tests:
//! "today" can be pinned with [`api::StockApi::with_today`].
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Logic for each operation
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: `Product`, `Category`, drafts, patches and form parsing
//! - [`view`]: Filtered, classified projections of the inventory
//! - [`csv`]: The CSV import/export format
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and terminal rendering for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod csv;
pub mod error;
pub mod model;
pub mod store;
pub mod view;
