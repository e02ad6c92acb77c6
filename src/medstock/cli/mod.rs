//! # CLI Layer
//!
//! Thin shell over [`medstock::api::StockApi`]: parse arguments, call the API, print the
//! [`CmdResult`](medstock::api::CmdResult). Everything that touches the terminal or the
//! real filesystem outside the data directory (export files, import files, prompts)
//! lives here; the library never does.

pub mod render;
pub mod setup;

use clap::Parser;
use directories::ProjectDirs;
use medstock::api::{ConfigAction, ImportOutcome, StockApi};
use medstock::config::{StockConfig, CONFIG_KEYS};
use medstock::error::{Result, StockError};
use medstock::model::{PatchForm, ProductForm};
use medstock::store::fs_backend::FsBackend;
use medstock::store::ProductStore;
use medstock::view::{self, CategoryFilter};
use render::{
    line_width, print_messages, render_product_list, render_summary, use_color,
};
use setup::{init_logging, Cli, Commands};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const HOME_ENV: &str = "MEDSTOCK_HOME";

struct AppContext {
    api: StockApi<FsBackend>,
    config: StockConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { category, search }) => handle_list(&ctx, &category, search),
        Some(Commands::Add {
            name,
            category,
            kind,
            quantity,
            expiry,
        }) => handle_add(
            &mut ctx,
            ProductForm {
                name,
                category,
                kind,
                quantity,
                expiry_date: expiry,
            },
        ),
        Some(Commands::Edit {
            id,
            name,
            category,
            kind,
            quantity,
            expiry,
        }) => handle_edit(
            &mut ctx,
            &id,
            PatchForm {
                name,
                category,
                kind,
                quantity,
                expiry_date: expiry,
            },
        ),
        Some(Commands::Bump { id, delta }) => handle_bump(&mut ctx, &id, delta),
        Some(Commands::Remove { id }) => handle_remove(&mut ctx, &id),
        Some(Commands::Export { output }) => handle_export(&ctx, output),
        Some(Commands::Import { file, yes }) => handle_import(&mut ctx, &file, yes),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, "all", None),
    }
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "medstock", "medstock")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| StockError::Store("Could not determine a data directory".into()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    tracing::debug!(dir = %data_dir.display(), "using data directory");

    let config = StockConfig::load(&data_dir).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config, using defaults");
        StockConfig::default()
    });
    let store = ProductStore::open(FsBackend::new(data_dir.clone()))?;
    let api = StockApi::new(store, data_dir);

    Ok(AppContext { api, config })
}

fn handle_list(ctx: &AppContext, category: &str, search: Option<String>) -> Result<()> {
    let filter: CategoryFilter = category.parse()?;
    let result = ctx
        .api
        .list_view(&filter, search.as_deref().unwrap_or(""))?;

    if let Some(projection) = &result.projection {
        if !projection.is_empty() {
            let color = use_color();
            print!(
                "{}",
                render_product_list(
                    projection,
                    view::today(),
                    &ctx.config.date_format,
                    line_width(),
                    color,
                )
            );
            print!("{}", render_summary(&projection.summary(), color));
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(ctx: &mut AppContext, form: ProductForm) -> Result<()> {
    let result = ctx.api.create_product(form)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, id: &str, form: PatchForm) -> Result<()> {
    let result = ctx.api.edit_product(id, form)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_bump(ctx: &mut AppContext, id: &str, delta: i64) -> Result<()> {
    let result = ctx.api.bump_quantity(id, delta)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, id: &str) -> Result<()> {
    let result = ctx.api.remove_product(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, output: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.export_csv()?;
    print_messages(&result.messages);

    let Some(export) = result.export else {
        return Ok(());
    };

    let dir = output.unwrap_or_else(|| ctx.config.export_dir.clone());
    fs::create_dir_all(&dir).map_err(StockError::Io)?;
    let path = dir.join(&export.filename);
    fs::write(&path, export.contents.as_bytes()).map_err(StockError::Io)?;
    println!("Saved to {}", path.display());
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: &Path, yes: bool) -> Result<()> {
    let text = fs::read_to_string(file).map_err(StockError::Io)?;

    // Decode once without touching the store so a bad file fails before the prompt.
    let preview = ctx.api.import_csv(&text, false)?;
    let found = match preview.import {
        Some(ImportOutcome::Pending { found }) => found,
        _ => 0,
    };

    if !yes && !confirm(&format!(
        "Found {} products. Replace the current inventory? [y/N] ",
        found
    ))? {
        println!("Import cancelled.");
        return Ok(());
    }

    let result = ctx.api.import_csv(&text, true)?;
    print_messages(&result.messages);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush().map_err(StockError::Io)?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(StockError::Io)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "sim"))
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            for key in CONFIG_KEYS {
                println!("{} = {}", key, config.get(key).unwrap_or_default());
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}
