//! The pipe-run command-line executable.

mod app;
mod cli;

fn main() -> anyhow::Result<std::process::ExitCode> {
    app::run()
}
