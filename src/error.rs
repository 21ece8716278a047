//! Defines custom error types for the application.

use thiserror::Error;

#[derive(Error, Debug)]
/// Error type returned when a pipeline invocation cannot proceed.
pub enum PipeError {
    #[error("No command template was given. Usage: pipe-run '<command using %in and/or %out>'")]
    EmptyTemplate,

    #[error("The command template contains neither %in nor %out. Use %in for piped input and %out for the output file.")]
    NoPlaceholders,

    #[error("The template uses %in but stdin is a terminal. Pipe data in, e.g.: cat data.txt | pipe-run 'sort %in > %out'")]
    InteractiveStdin,

    #[error("Failed to start '{shell}': {source}")]
    Spawn {
        shell: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipeError {
    /// Whether the error stems from how the tool was invoked rather than from the environment.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            PipeError::EmptyTemplate | PipeError::NoPlaceholders | PipeError::InteractiveStdin
        )
    }
}
