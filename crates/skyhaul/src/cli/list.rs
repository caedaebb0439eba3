use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use skyhaul_core::catalog::Catalog;
use skyhaul_core::ui::table::TableView;
use tabled::Tabled;

#[derive(Args, Clone, Debug)]
pub struct ListArg {
    /// TOML catalog file to show instead of the built-in table.
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,
}

#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "GROUP")]
    name: String,
    #[tabled(rename = "FILES")]
    files: usize,
    #[tabled(rename = "MERGES INTO")]
    merge: String,
}

pub fn list(arg: ListArg) -> Result<()> {
    let catalog = Catalog::load(arg.catalog.as_deref()).context("failed to load catalog")?;

    let rows: Vec<CatalogRow> = catalog
        .groups
        .iter()
        .map(|g| CatalogRow {
            name: g.name.clone(),
            files: g.locators.len(),
            merge: g.merge_target.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let table = TableView::default().render(rows);
    println!("{table}");
    Ok(())
}
