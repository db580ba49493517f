//! External converter invocation.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ConvertSettings;
use crate::utils::exec::{Cmd, ExecError, FilterRule};

/// pandoc noise that is not worth a log line
const PANDOC_FILTER: FilterRule =
    FilterRule::new(&["[WARNING] This document format requires a nonempty <title>"]);

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("converter exited successfully but wrote no output to `{0}`")]
    MissingOutput(PathBuf),
}

/// Turns one source file into one HTML file.
///
/// Implementations block until the output is complete or they fail.
pub trait Converter: Send + Sync {
    fn convert(
        &self,
        source: &Path,
        output: &Path,
        settings: &ConvertSettings,
    ) -> Result<(), ConvertError>;
}

/// Runs `<program> <flags..> -o <output> <source>` from the source's directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct PandocConverter;

impl PandocConverter {
    fn command(source: &Path, output: &Path, settings: &ConvertSettings) -> Cmd {
        let mut cmd = Cmd::new(&settings.program)
            .args(&settings.flags)
            .arg("-o")
            .arg(output)
            .arg(source)
            .timeout(settings.timeout())
            .filter(&PANDOC_FILTER);
        if let Some(dir) = source.parent() {
            cmd = cmd.cwd(dir);
        }
        cmd
    }
}

impl Converter for PandocConverter {
    fn convert(
        &self,
        source: &Path,
        output: &Path,
        settings: &ConvertSettings,
    ) -> Result<(), ConvertError> {
        let cmd = Self::command(source, output, settings);
        crate::debug!("render"; "{}", cmd.display());
        cmd.run()?;

        if !output.is_file() {
            return Err(ConvertError::MissingOutput(output.to_path_buf()));
        }
        Ok(())
    }
}
