//! Temporary files that carry data into and out of the invoked command.
//!
//! A [`TempFileSet`] owns at most one input artifact and one output artifact.
//! Both are removed when the set is dropped, so every exit path of a run,
//! including early returns through `?`, leaves nothing behind. Names are
//! randomized by [`tempfile::Builder`], which retries on collision.

use crate::error::PipeError;
use log::debug;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder as TempFileBuilder, TempPath};

pub const INPUT_PREFIX: &str = "pipe-in-";
pub const OUTPUT_PREFIX: &str = "pipe-out-";
pub const ARTIFACT_SUFFIX: &str = ".tmp";

const SHARED_MEMORY_DIR: &str = "/dev/shm";

/// Returns the memory-backed `/dev/shm` when available, else the system temp directory.
pub fn default_temp_dir() -> PathBuf {
    let shm = Path::new(SHARED_MEMORY_DIR);
    if shm.is_dir() {
        shm.to_path_buf()
    } else {
        std::env::temp_dir()
    }
}

#[derive(Debug)]
pub struct TempFileSet {
    dir: PathBuf,
    input: Option<TempPath>,
    output: Option<TempPath>,
}

impl TempFileSet {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            input: None,
            output: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn input_path(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Streams `reader` to completion into a fresh input artifact.
    pub fn create_input<R: Read>(&mut self, mut reader: R) -> Result<&Path, PipeError> {
        let mut file = Self::builder(INPUT_PREFIX).tempfile_in(&self.dir)?;
        // Track the path before copying so a failed read still cleans up.
        let copied = io::copy(&mut reader, &mut file).and_then(|n| file.flush().map(|_| n));
        let path: &Path = self.input.insert(file.into_temp_path());
        let bytes = copied?;
        debug!("wrote {} bytes of input to {}", bytes, path.display());
        Ok(path)
    }

    /// Reserves a unique output path without leaving a file behind at it.
    pub fn reserve_output(&mut self) -> Result<&Path, PipeError> {
        let path = Self::builder(OUTPUT_PREFIX)
            .tempfile_in(&self.dir)?
            .into_temp_path();
        fs::remove_file(&path)?;
        let path: &Path = self.output.insert(path);
        debug!("reserved output path {}", path.display());
        Ok(path)
    }

    fn builder(prefix: &'static str) -> TempFileBuilder<'static, 'static> {
        let mut builder = TempFileBuilder::new();
        builder.prefix(prefix).suffix(ARTIFACT_SUFFIX);
        builder
    }
}

impl Drop for TempFileSet {
    fn drop(&mut self) {
        for path in [self.input.take(), self.output.take()].into_iter().flatten() {
            let shown = path.display().to_string();
            match path.close() {
                Ok(()) => debug!("removed {}", shown),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => debug!("could not remove {}: {}", shown, err),
            }
        }
    }
}
