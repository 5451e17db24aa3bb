//! Build pipeline for the Parley model compiler.
//!
//! This crate holds everything between the parsed project and the platform
//! backends:
//!
//! - [`hooks`] - lifecycle events and the ordered handler registry
//! - [`task`] - task trees and the runner that executes them
//! - [`locale`] - locale resolution and platform validation
//! - [`merge`] - model and config deep merges
//! - [`files`] - project file trees with non-clobbering merge
//! - [`convert`] - the converter contract, forward and reverse
//! - [`models`] - canonical model files on disk
//! - [`platform`] / [`plugin`] - the backend contract and its lifecycle wiring
//! - [`driver`] - fires the lifecycle and runs the resulting tasks
//! - [`testing`] - an in-memory platform for tests (feature-gated)

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

pub mod context;
pub mod convert;
pub mod driver;
mod error;
pub mod files;
pub mod hooks;
pub mod locale;
pub mod merge;
pub mod models;
pub mod platform;
pub mod plugin;
pub mod task;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::{BuildContext, BuildFlags, PlatformState};
pub use convert::{ActionRegistry, ModelConverter, NativeContent, NativeFileInformation};
pub use driver::{BuildOutcome, Driver};
pub use error::{Error, Result};
pub use files::{FileContent, FileTree, GeneratedFile};
pub use hooks::{Event, Hook, HookRegistry};
pub use models::{ModelOverrides, ModelStore};
pub use platform::{Platform, ProjectFilesInput, SupportedLocales};
pub use plugin::{PlatformPlugin, Plugin, prepare_state};
pub use task::{Task, TaskFailure, TaskReport, TaskRunner, TaskStatus};
