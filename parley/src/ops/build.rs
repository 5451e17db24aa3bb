//! Build operation - forward and reverse builds.

use parley_build::{BuildContext, BuildFlags, Result};
use parley_project::ProjectFile;
use tracing::debug;

use crate::{platforms, reports::BuildReport};

/// Execute the build operation.
///
/// Installs the selected platforms, fires the lifecycle and runs every task.
/// Task failures end up in the report; event errors are returned.
pub fn build(file: ProjectFile, flags: BuildFlags) -> Result<BuildReport> {
    let project_dir = file.project_dir().to_path_buf();
    let config = file.into_config();
    let mut driver = platforms::driver(&config, &flags.platforms)?;

    let reverse = flags.reverse;
    debug!(reverse, locales = ?flags.locales, "starting build");
    let mut ctx = BuildContext::new(config, project_dir, flags);
    let outcome = driver.run(&mut ctx)?;

    Ok(BuildReport {
        reverse,
        build_directory: ctx.build_directory(),
        models_directory: ctx.models_directory(),
        outcome,
    })
}
