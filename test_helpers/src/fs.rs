//! Temporary directories for configuration documents.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Temporary directory with a UTF-8 path, removed on drop.
///
/// # Examples
///
/// ```
/// use strata_config_test_helpers::fs::ConfigDir;
///
/// let dir = ConfigDir::new()?;
/// let path = dir.write("conf/app.toml", "port = 1\n")?;
/// assert!(path.ends_with("conf/app.toml"));
/// # Ok::<_, anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct ConfigDir {
    path: Utf8PathBuf,
    _dir: TempDir,
}

impl ConfigDir {
    /// Create an empty temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or its path is
    /// not valid UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temporary config dir")?;
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow!("temporary dir is not UTF-8: {}", path.display()))?;
        Ok(Self { path, _dir: dir })
    }

    /// Root of the directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Write `contents` to `name`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error when a directory or the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let target = self.path.join(name);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        std::fs::write(&target, contents).with_context(|| format!("write {target}"))?;
        Ok(target)
    }

    /// Create the directory `name` beneath the root.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn mkdir(&self, name: &str) -> Result<Utf8PathBuf> {
        let target = self.path.join(name);
        std::fs::create_dir_all(&target).with_context(|| format!("create {target}"))?;
        Ok(target)
    }
}
