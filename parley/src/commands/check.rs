use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use parley_project::ProjectFile;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to parley.toml (defaults to ./parley.toml)
    #[arg(short, long, default_value = "parley.toml")]
    pub config: PathBuf,

    /// Configuration stage to apply
    #[arg(long)]
    pub stage: Option<String>,

    /// Project id for platforms that need one (overrides parley.toml)
    #[arg(long)]
    pub project_id: Option<String>,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let file = ProjectFile::open(&self.config, self.stage.as_deref()).unwrap_or_exit();
        let report = ops::check(&file, self.project_id.clone()).unwrap_or_exit();

        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
