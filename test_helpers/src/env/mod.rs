//! Guards for mutating process environment variables in tests.
//!
//! Every mutation takes a global re-entrant lock for the duration of the
//! write and returns an [`EnvVarGuard`] that puts the previous value back
//! (or removes the variable) when dropped. Guards for the same key stack and
//! unwind in LIFO order.
//!
//! Tests that read a variable across several statements should still run
//! under `serial_test::serial`, or hold [`lock`] for the whole test.
//!
//! # Examples
//!
//! ```
//! use strata_config_test_helpers::env;
//!
//! let _profile = env::set_var("STRATA_PROFILE", "dev");
//! assert_eq!(std::env::var("STRATA_PROFILE").as_deref(), Ok("dev"));
//! ```

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Restores an environment variable to its prior state on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl EnvVarGuard {
    /// Name of the guarded variable.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: writes are serialised by `ENV_MUTEX`.
            Some(value) => unsafe { std::env::set_var(&self.key, value) },
            // SAFETY: writes are serialised by `ENV_MUTEX`.
            None => unsafe { std::env::remove_var(&self.key) },
        }
    }
}

/// Holds the global environment lock until dropped.
///
/// # Examples
///
/// ```
/// use strata_config_test_helpers::env;
///
/// let lock = env::lock();
/// let _a = lock.set_var("STRATA_A", "1");
/// let _b = lock.remove_var("STRATA_B");
/// ```
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvVarLock {
    /// Set `key` while this lock is held.
    pub fn set_var(&self, key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvVarGuard {
        set_var(key, value)
    }

    /// Remove `key` while this lock is held.
    pub fn remove_var(&self, key: impl Into<String>) -> EnvVarGuard {
        remove_var(key)
    }
}

/// Acquire the global environment lock.
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        _guard: ENV_MUTEX.lock(),
    }
}

/// Set `key` to `value`, returning a guard that restores the prior state.
pub fn set_var(key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvVarGuard {
    mutate(key.into(), |key| {
        // SAFETY: called with `ENV_MUTEX` held.
        unsafe { std::env::set_var(key, value.as_ref()) };
    })
}

/// Remove `key`, returning a guard that restores the prior state.
pub fn remove_var(key: impl Into<String>) -> EnvVarGuard {
    mutate(key.into(), |key| {
        // SAFETY: called with `ENV_MUTEX` held.
        unsafe { std::env::remove_var(key) };
    })
}

fn mutate(key: String, apply: impl FnOnce(&str)) -> EnvVarGuard {
    let _lock = ENV_MUTEX.lock();
    let original = std::env::var_os(&key);
    apply(&key);
    EnvVarGuard { key, original }
}
