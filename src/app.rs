use crate::cli::Cli;
use clap::error::ErrorKind;
use clap::Parser;
use log::debug;
use pipe_run::artifacts::default_temp_dir;
use pipe_run::runner::USAGE_EXIT_CODE;
use pipe_run::{CommandTemplate, PipeError, PipeRunner, RunnerConfig};
use std::io::{self, IsTerminal};
use std::process::ExitCode;

pub fn run() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let Cli {
        shell,
        temp_dir,
        template,
    } = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                err.print()?;
                return Ok(to_exit_code(USAGE_EXIT_CODE));
            }
        },
    };

    let template = CommandTemplate::from_args(&template)?;
    let config = RunnerConfig {
        shell,
        temp_dir: temp_dir.unwrap_or_else(default_temp_dir),
    };
    debug!("configuration: {:?}", config);

    let stdin = io::stdin();
    let input_is_terminal = stdin.is_terminal();
    let outcome = PipeRunner::new(config)
        .run(&template, stdin.lock(), input_is_terminal, io::stdout().lock())
        .map_err(map_pipe_error)?;

    Ok(to_exit_code(outcome.exit_code()))
}

fn map_pipe_error(err: PipeError) -> anyhow::Error {
    if err.is_usage() {
        err.into()
    } else {
        anyhow::Error::new(err).context("Failed to run the command template")
    }
}

fn to_exit_code(code: i32) -> ExitCode {
    let fallback = USAGE_EXIT_CODE as u8;
    ExitCode::from(u8::try_from(code).unwrap_or(fallback))
}
