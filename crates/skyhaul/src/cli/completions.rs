use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{Shell, generate};

use super::app::App;

#[derive(Args, Clone, Debug)]
pub struct CompletionsArg {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    shell: Shell,
}

pub fn completions(arg: CompletionsArg) -> Result<()> {
    let mut cmd = App::command();
    let mut stdout = std::io::stdout();
    generate(arg.shell, &mut cmd, "skyhaul", &mut stdout);
    Ok(())
}
