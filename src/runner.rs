//! Executes a resolved command template and relays its output artifact.

use crate::artifacts::{default_temp_dir, TempFileSet};
use crate::error::PipeError;
use crate::template::{CommandTemplate, Placeholder};
use log::{debug, info};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

pub const DEFAULT_SHELL: &str = "sh";

/// Exit code used when the tool itself is invoked incorrectly.
pub const USAGE_EXIT_CODE: i32 = 1;

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Interpreter that receives the resolved command via `-c`.
    pub shell: String,
    /// Directory that holds the input and output artifacts.
    pub temp_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            temp_dir: default_temp_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The command exited 0 and any output artifact was relayed.
    Completed,
    /// The command exited with the given non-zero code; nothing was relayed.
    Failed(i32),
}

impl RunOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Completed => 0,
            RunOutcome::Failed(code) => code,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipeRunner {
    config: RunnerConfig,
}

impl PipeRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs `template` once.
    ///
    /// `input` is only read when the template uses `%in`; in that case an
    /// interactive `input` is rejected before anything touches the filesystem.
    /// The output artifact, when requested and present, is copied to `output`
    /// only if the command succeeds. Artifacts are removed before returning.
    pub fn run<R, W>(
        &self,
        template: &CommandTemplate,
        input: R,
        input_is_terminal: bool,
        mut output: W,
    ) -> Result<RunOutcome, PipeError>
    where
        R: Read,
        W: Write,
    {
        debug!("template placeholders: {}", template.placeholders());

        if template.uses(Placeholder::In) && input_is_terminal {
            return Err(PipeError::InteractiveStdin);
        }

        let mut artifacts = TempFileSet::new(&self.config.temp_dir);
        debug!("artifact directory: {}", artifacts.dir().display());

        if template.uses(Placeholder::In) {
            artifacts.create_input(input)?;
        }
        if template.uses(Placeholder::Out) {
            artifacts.reserve_output()?;
        }

        let resolved = template.resolve(|placeholder| match placeholder {
            Placeholder::In => artifacts.input_path(),
            Placeholder::Out => artifacts.output_path(),
        });

        let status = self.execute(&resolved)?;
        debug!("command finished with {}", status);

        let code = exit_code(status);
        if code != 0 {
            info!("command exited with code {}; skipping output relay", code);
            return Ok(RunOutcome::Failed(code));
        }

        match relay(artifacts.output_path(), &mut output) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
                debug!("stdout reader went away; stopping relay");
            }
            Err(err) => return Err(err.into()),
        }

        Ok(RunOutcome::Completed)
    }

    fn execute(&self, resolved: &str) -> Result<ExitStatus, PipeError> {
        debug!("running: {} -c {:?}", self.config.shell, resolved);
        Command::new(&self.config.shell)
            .arg("-c")
            .arg(resolved)
            .stdin(Stdio::inherit())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| PipeError::Spawn {
                shell: self.config.shell.clone(),
                source,
            })
    }
}

/// Copies the output artifact, if the command created one, into `output`.
fn relay<W: Write>(path: Option<&Path>, output: &mut W) -> io::Result<()> {
    if let Some(path) = path {
        match File::open(path) {
            Ok(mut file) => {
                let bytes = io::copy(&mut file, output)?;
                debug!("relayed {} bytes from {}", bytes, path.display());
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("command did not create {}; nothing to relay", path.display());
            }
            Err(err) => return Err(err),
        }
    }
    output.flush()
}

/// Maps a finished process to a shell-style exit code. A process killed by
/// signal `n` maps to `128 + n`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    USAGE_EXIT_CODE
}
