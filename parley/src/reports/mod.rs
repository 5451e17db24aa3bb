//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod build;
mod check;
mod output;

pub use build::BuildReport;
pub use check::{CheckReport, LocaleCheck, ModelCheck, PlatformCheck, PlatformSummary};
pub use output::{Report, TerminalOutput};
