use anyhow::Result;
use clap::{Parser, Subcommand};

use super::check::CheckArg;
use super::completions::CompletionsArg;
use super::list::ListArg;
use super::pull::PullArg;

#[derive(Clone, Debug, Parser)]
#[command(
    name = "skyhaul",
    version = env!("CARGO_PKG_VERSION"),
    about = "Batch downloader for drone racing and FPV research datasets",
    long_about = None,
    propagate_version = true
)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "c", name = "check", about = "Probe catalog URLs without downloading")]
    Check(CheckArg),

    #[command(
        alias = "p",
        name = "pull",
        about = "Download every group and reassemble split archives"
    )]
    Pull(PullArg),

    #[command(alias = "ls", name = "list", about = "Show the dataset catalog")]
    List(ListArg),

    #[command(alias = "comp", name = "completions", about = "Generate shell completions")]
    Completions(CompletionsArg),
}

impl App {
    pub fn run(self) -> Result<()> {
        match self.cmd {
            Commands::Check(arg) => super::check::check(arg),
            Commands::Pull(arg) => super::pull::pull(arg),
            Commands::List(arg) => super::list::list(arg),
            Commands::Completions(arg) => super::completions::completions(arg),
        }
    }
}
