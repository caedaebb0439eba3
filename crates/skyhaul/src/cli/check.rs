use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use skyhaul_core::catalog::Catalog;
use skyhaul_core::task_pool::POOL;
use skyhaul_core::ui::table::TableView;
use skyhaul_fetch::{Prober, ReqwestClient};
use tabled::Tabled;

#[derive(Args, Clone, Debug)]
pub struct CheckArg {
    /// TOML catalog file to check instead of the built-in table.
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Probe these URLs instead of the catalog.
    #[arg(value_name = "URL")]
    urls: Vec<String>,
}

#[derive(Tabled)]
struct ProbeRow {
    #[tabled(rename = "")]
    glyph: &'static str,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

pub fn check(arg: CheckArg) -> Result<()> {
    let urls: Vec<String> = if arg.urls.is_empty() {
        let catalog = Catalog::load(arg.catalog.as_deref()).context("failed to load catalog")?;
        catalog.locators().map(str::to_string).collect()
    } else {
        arg.urls
    };

    let client = ReqwestClient::new().context("failed to build HTTP client")?;
    let prober = Prober::new(client);

    let mut rows = Vec::with_capacity(urls.len());
    let mut reachable = 0usize;
    for url in urls {
        let outcome = POOL.block_on(prober.probe(&url));
        let ok = outcome.is_reachable();
        if ok {
            reachable += 1;
        }
        rows.push(ProbeRow {
            glyph: if ok { "✓" } else { "✗" },
            url,
            status: outcome.to_string(),
        });
    }

    let total = rows.len();
    let table = TableView {
        title: Some("probe results".to_string()),
        footer: Some(format!("{reachable}/{total} reachable")),
        ..TableView::default()
    }
    .render(rows);
    println!("{table}");
    Ok(())
}
