//! `figment::Jail` wrapper for tests that rely on the working directory.
//!
//! A jail runs its closure inside a fresh temporary working directory and
//! restores any environment variables set through it afterwards.

use anyhow::{Result, anyhow};

/// Write `files` into a new jail, then run `f` inside it.
///
/// # Errors
///
/// Returns an error when a file cannot be written or `f` fails.
///
/// # Examples
///
/// ```
/// use strata_config_test_helpers::jail;
///
/// let text = jail::with_config_files(&[("application.toml", "a = 1")], |_jail| {
///     std::fs::read_to_string("application.toml").map_err(|err| err.to_string().into())
/// })?;
/// assert_eq!(text, "a = 1");
/// # Ok::<_, anyhow::Error>(())
/// ```
pub fn with_config_files<F, T>(files: &[(&str, &str)], f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        for (name, contents) in files {
            jail.create_file(name, contents)?;
        }
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure produced no value"))
}
