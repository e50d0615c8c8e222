//! Host-environment surfaces for the backup engine.
//!
//! The engine never touches the terminal or the filesystem directly for
//! user-facing interactions; it goes through these traits so shells can
//! substitute dialogs and tests can substitute mocks.

use std::io::Write;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Errors raised by the file surfaces.
#[derive(Error, Diagnostic, Debug)]
pub enum SurfaceError {
    #[error("IO error: {0}")]
    #[diagnostic(code(mbk::backup::surface::io))]
    Io(#[from] std::io::Error),
}

/// A user-selected file, read fully into memory.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    /// Read a file from disk into a picked-file handle.
    pub fn read(path: &Path) -> Result<Self, SurfaceError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Yes/no gate for destructive operations. Can be mocked in tests.
#[allow(async_fn_in_trait)]
#[cfg_attr(test, automock)]
pub trait ConfirmPrompt {
    /// Ask the operator to confirm; resolves to `true` on approval.
    async fn confirm(&self, message: &str) -> bool;
}

/// Prompt that asks on the controlling terminal.
#[derive(Clone, Copy)]
pub struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    async fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Prompt that approves everything, for non-interactive runs.
#[derive(Clone, Copy)]
pub struct AssumeYes;

impl ConfirmPrompt for AssumeYes {
    async fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// File-save surface. Can be mocked in tests.
#[cfg_attr(test, automock)]
pub trait FileSurface {
    /// Persist bytes under the given filename, returning the saved path.
    fn save_file(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, SurfaceError>;
}

/// File surface writing into a local directory.
pub struct LocalFiles {
    dir: PathBuf,
}

impl LocalFiles {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl FileSurface for LocalFiles {
    fn save_file(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, SurfaceError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}
