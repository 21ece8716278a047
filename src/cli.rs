//! Defines the command-line interface for the application.

use clap::Parser;
use pipe_run::runner::DEFAULT_SHELL;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pipe-run",
    version,
    about = "Run commands that only accept file arguments inside shell pipelines.",
    after_help = "Placeholders:\n  %in   path of a temporary file holding the piped stdin\n  %out  path of a temporary file relayed to stdout afterwards\n\nExample:\n  echo -n hello | pipe-run 'tr a-z A-Z < %in > %out'"
)]
pub struct Cli {
    /// Shell that interprets the command (invoked as `<SHELL> -c <COMMAND>`).
    #[arg(long, env = "PIPE_RUN_SHELL", value_name = "SHELL", default_value = DEFAULT_SHELL)]
    pub shell: String,

    /// Directory for the temporary files. [default: /dev/shm, else the system temp dir]
    #[arg(long, env = "PIPE_RUN_TEMP_DIR", value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// The command to run. All words are joined with single spaces.
    #[arg(value_name = "TEMPLATE", num_args = 0.., trailing_var_arg = true)]
    pub template: Vec<String>,
}
