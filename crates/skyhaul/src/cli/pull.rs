use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use skyhaul_core::catalog::Catalog;
use skyhaul_core::run::{self, MergeStatus, PullReport};
use skyhaul_core::ui::table::TableView;
use skyhaul_fetch::{Fetcher, ReqwestClient};
use tabled::Tabled;

#[derive(Args, Clone, Debug)]
pub struct PullArg {
    /// TOML catalog file to pull instead of the built-in table.
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Directory the datasets land in.
    #[arg(long, default_value = "datasets_downloaded", value_name = "DIR")]
    dir: PathBuf,

    /// Pull only these groups.
    #[arg(value_name = "GROUP")]
    groups: Vec<String>,
}

pub fn pull(arg: PullArg) -> Result<()> {
    let catalog = Catalog::load(arg.catalog.as_deref()).context("failed to load catalog")?;
    let catalog = if arg.groups.is_empty() {
        catalog
    } else {
        catalog.select(&arg.groups)?
    };

    let client = ReqwestClient::new().context("failed to build HTTP client")?;
    let fetcher = Fetcher::new(client);

    println!("{}", "=".repeat(40));
    println!("  skyhaul dataset pull");
    println!("{}", "=".repeat(40));
    println!("target directory: {}", arg.dir.display());
    println!();

    let report = run::pull_catalog(&fetcher, &catalog, &arg.dir);

    print_summary(&report);

    if report.complete() {
        println!("\nall groups processed");
    } else {
        // Completed files are kept, so a rerun picks up where this one left off.
        println!(
            "\nall groups processed, {} file(s) failed; rerun to retry",
            report.total_failed()
        );
    }
    Ok(())
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "GROUP")]
    name: String,
    #[tabled(rename = "FETCHED")]
    fetched: usize,
    #[tabled(rename = "SKIPPED")]
    skipped: usize,
    #[tabled(rename = "FAILED")]
    failed: usize,
    #[tabled(rename = "ARCHIVE")]
    archive: String,
}

fn print_summary(report: &PullReport) {
    let rows: Vec<GroupRow> = report
        .groups
        .iter()
        .map(|g| GroupRow {
            name: g.name.clone(),
            fetched: g.fetched,
            skipped: g.skipped,
            failed: g.failed,
            archive: match (&g.error, g.merge) {
                (Some(e), _) => format!("error: {e}"),
                (None, None) => "-".to_string(),
                (None, Some(MergeStatus::Merged)) => "merged".to_string(),
                (None, Some(MergeStatus::AlreadyMerged)) => "already merged".to_string(),
                (None, Some(MergeStatus::Incomplete)) => "not merged".to_string(),
                (None, Some(MergeStatus::Failed)) => "merge failed".to_string(),
            },
        })
        .collect();

    let table = TableView {
        title: Some("pull summary".to_string()),
        ..TableView::default()
    }
    .render(rows);
    println!("\n{table}");
}

#[cfg(test)]
mod tests {
    use super::super::app::{App, Commands};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_pull_default_directory() {
        let app = App::try_parse_from(["skyhaul", "pull"]).unwrap();

        let Commands::Pull(arg) = app.cmd else {
            panic!("expected pull subcommand");
        };
        assert_eq!(arg.dir, PathBuf::from("datasets_downloaded"));
        assert!(arg.groups.is_empty());
    }

    #[test]
    fn test_pull_group_selection() {
        let app = App::try_parse_from([
            "skyhaul",
            "pull",
            "--dir",
            "out",
            "ratm_piloted",
            "uzh_indoor_45",
        ])
        .unwrap();

        let Commands::Pull(arg) = app.cmd else {
            panic!("expected pull subcommand");
        };
        assert_eq!(arg.dir, PathBuf::from("out"));
        assert_eq!(arg.groups, ["ratm_piloted", "uzh_indoor_45"]);
    }
}
