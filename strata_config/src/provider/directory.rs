//! Provider reading resources beneath a base directory.

use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};

use super::{Resource, ResourceProvider, detect_format};
use crate::StrataResult;
use crate::error::{file_error, invalid_resource_name};

/// Reads resources relative to a base directory through a capability handle,
/// so names cannot reach outside it.
///
/// # Examples
///
/// ```rust,no_run
/// use strata_config::provider::{DirectoryProvider, ResourceProvider};
///
/// let provider = DirectoryProvider::new("config");
/// if let Some(resource) = provider.fetch("application.toml")? {
///     println!("{} is {} bytes of {}", resource.name, resource.contents.len(), resource.format);
/// }
/// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
/// ```
#[derive(Clone, Debug)]
pub struct DirectoryProvider {
    base: Utf8PathBuf,
}

impl DirectoryProvider {
    /// Create a provider rooted at `base`.
    #[must_use]
    pub fn new(base: impl Into<Utf8PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Directory resources are read from.
    #[must_use]
    pub fn base(&self) -> &Utf8Path {
        &self.base
    }

    /// Open the base directory, or `None` when it does not exist.
    fn open_base(&self) -> StrataResult<Option<Dir>> {
        match Dir::open_ambient_dir(&self.base, ambient_authority()) {
            Ok(dir) => Ok(Some(dir)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(file_error(&self.base, err)),
        }
    }
}

impl ResourceProvider for DirectoryProvider {
    fn fetch(&self, name: &str) -> StrataResult<Option<Resource>> {
        let relative = validate_name(name)?;
        let format = detect_format(name)?;
        let Some(dir) = self.open_base()? else {
            return Ok(None);
        };
        match dir.read_to_string(relative) {
            Ok(contents) => Ok(Some(Resource {
                name: name.to_owned(),
                format,
                contents,
            })),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(file_error(&self.base.join(relative), err)),
        }
    }
}

/// Accept only relative names made of plain components.
fn validate_name(name: &str) -> StrataResult<&Utf8Path> {
    let path = Utf8Path::new(name);
    if name.trim().is_empty() {
        return Err(invalid_resource_name(name, "name is empty"));
    }
    for component in path.components() {
        match component {
            Utf8Component::Normal(_) | Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                return Err(invalid_resource_name(
                    name,
                    "parent directory components are not allowed",
                ));
            }
            Utf8Component::RootDir | Utf8Component::Prefix(_) => {
                return Err(invalid_resource_name(name, "absolute paths are not allowed"));
            }
        }
    }
    Ok(path)
}
