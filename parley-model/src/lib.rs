//! Canonical language model for the Parley model compiler.
//!
//! The canonical model is the platform-agnostic intermediate representation
//! every backend converts from and back into.
//!
//! # Architecture
//!
//! ```text
//! models/<locale>.json → CanonicalModel → backend converter → platform files
//!                              ↑                                  │
//!                              └──────── reverse conversion ──────┘
//! ```
//!
//! Top-level keys the model does not know about (typically one section per
//! platform, e.g. `"alexa"`) are kept in [`CanonicalModel::extensions`] and
//! survive a load/save cycle untouched.

mod issue;
mod model;
mod phrase;

pub use issue::ModelIssue;
pub use model::{
    CanonicalModel, InputTypeDef, InputTypeRef, InputTypeValue, Intent, IntentInput, Invocation,
};
pub use phrase::placeholders;
