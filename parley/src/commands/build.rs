use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use parley_build::BuildFlags;
use parley_project::ProjectFile;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct BuildCommand {
    /// Path to parley.toml (defaults to ./parley.toml)
    #[arg(short, long, default_value = "parley.toml")]
    pub config: PathBuf,

    /// Locale or locale table token to build (repeatable, defaults to every model)
    #[arg(short, long = "locale")]
    pub locales: Vec<String>,

    /// Platform to build (repeatable, defaults to every configured platform)
    #[arg(short, long = "platform")]
    pub platforms: Vec<String>,

    /// Remove each platform's build directory first
    #[arg(long)]
    pub clean: bool,

    /// Overwrite models on reverse builds without keeping a backup
    #[arg(long)]
    pub force: bool,

    /// Turn the native platform files back into canonical models
    #[arg(long)]
    pub reverse: bool,

    /// Configuration stage to apply
    #[arg(long)]
    pub stage: Option<String>,

    /// Project id for platforms that need one (overrides parley.toml)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Build directory (overrides parley.toml)
    #[arg(long = "build-dir")]
    pub build_dir: Option<PathBuf>,
}

impl BuildCommand {
    /// Run the build command
    pub fn run(&self) -> Result<()> {
        let file = ProjectFile::open(&self.config, self.stage.as_deref()).unwrap_or_exit();
        let report = ops::build(file, self.flags()).unwrap_or_exit();

        report.render(&mut TerminalOutput::new());

        if !report.succeeded() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn flags(&self) -> BuildFlags {
        BuildFlags {
            locales: self.locales.clone(),
            platforms: self.platforms.clone(),
            clean: self.clean,
            force: self.force,
            reverse: self.reverse,
            stage: self.stage.clone(),
            project_id: self.project_id.clone(),
            build_directory: self.build_dir.clone(),
        }
    }
}
