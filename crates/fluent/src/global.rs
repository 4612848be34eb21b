//! Process-wide loader for the `global-loader` feature.
//!
//! Provides thread-safe access to one shared [`FluentLoader`], so resources
//! can be registered at startup and formatted from anywhere. Reads take a
//! read lock; adding resources takes the write lock.

use std::sync::{OnceLock, PoisonError, RwLock};

use crate::error::{LoadError, LoadWarning};
use crate::loader::FluentLoader;
use crate::resolver::FluentArgs;

static GLOBAL_LOADER: OnceLock<RwLock<FluentLoader>> = OnceLock::new();

/// Install the process-wide loader.
///
/// Fails, handing the loader back, if a loader is already installed.
pub fn init(loader: FluentLoader) -> Result<(), FluentLoader> {
    GLOBAL_LOADER
        .set(RwLock::new(loader))
        .map_err(|lock| lock.into_inner().unwrap_or_else(PoisonError::into_inner))
}

/// Whether a process-wide loader is installed.
pub fn is_initialized() -> bool {
    GLOBAL_LOADER.get().is_some()
}

/// Provides read access to the process-wide loader.
///
/// Returns `None` if no loader is installed.
pub fn with_loader<T>(f: impl FnOnce(&FluentLoader) -> T) -> Option<T> {
    let lock = GLOBAL_LOADER.get()?;
    let guard = lock.read().expect("global loader lock poisoned");
    Some(f(&guard))
}

/// Add a resource to the process-wide loader.
///
/// Installs a default loader first if none is installed yet.
pub fn add_static_resource(locale: &str, text: &str) -> Result<Vec<LoadWarning>, LoadError> {
    let lock = GLOBAL_LOADER.get_or_init(|| RwLock::new(FluentLoader::default()));
    let mut guard = lock.write().expect("global loader lock poisoned");
    guard.add_resource_str(locale, text)
}

/// Format a message from the process-wide loader.
///
/// Returns `None` if no loader is installed, no locale in the chain has the
/// message, or formatting fails because of a missing argument.
pub fn format_static_message(locales: &[&str], id: &str, args: &FluentArgs) -> Option<String> {
    with_loader(|loader| loader.format_message(locales, id, args))
        .and_then(Result::ok)
        .flatten()
}
