//! Core library for pipe-run: lets file-only commands take part in pipelines.
//!
//! Piped stdin is written to a temporary input artifact, the `%in` and `%out`
//! placeholders of a command template are replaced with artifact paths, the
//! command runs through a shell, and the output artifact is relayed to stdout.

pub mod artifacts;
pub mod error;
pub mod runner;
pub mod template;

pub use artifacts::TempFileSet;
pub use error::PipeError;
pub use runner::{PipeRunner, RunOutcome, RunnerConfig};
pub use template::{CommandTemplate, Placeholder, PlaceholderSet};
