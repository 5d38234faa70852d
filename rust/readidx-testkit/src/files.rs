//! Temporary files holding delimited text.

use std::path::{Path, PathBuf};

/// A temporary directory of text files, removed when dropped.
///
/// Paths are returned in the order the files were added, which makes it easy to
/// build a multi-file collection with a known row order.
pub struct TempFiles {
    dir: tempfile::TempDir,
    paths: Vec<PathBuf>,
}

impl TempFiles {
    pub fn new() -> anyhow::Result<TempFiles> {
        Ok(TempFiles {
            dir: tempfile::tempdir()?,
            paths: Vec::new(),
        })
    }

    /// Creates a temporary directory holding one file per entry of `contents`,
    /// named `part_0.csv`, `part_1.csv`, ...
    pub fn with_contents<S: AsRef<str>>(contents: &[S]) -> anyhow::Result<TempFiles> {
        let mut files = TempFiles::new()?;
        for (i, text) in contents.iter().enumerate() {
            files.add(&format!("part_{i}.csv"), text.as_ref())?;
        }
        Ok(files)
    }

    /// Writes `contents` to a new file named `name` and returns its path.
    pub fn add(&mut self, name: &str, contents: impl AsRef<[u8]>) -> anyhow::Result<PathBuf> {
        let path = self.dir.path().join(name);
        if path.exists() {
            anyhow::bail!("{} already exists", path.display());
        }
        std::fs::write(&path, contents)?;
        self.paths.push(path.clone());
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}
