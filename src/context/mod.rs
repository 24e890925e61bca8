//! Application context owning the variable store's lifecycle.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigVariable, LoadStats, VarStore};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LifecycleError {
    #[error("the variable store has already been created")]
    AlreadyCreated,

    #[error("the variable store has not been created")]
    NotCreated,
}

/// Central application context holding the single live [`VarStore`].
///
/// The context replaces a process-wide global: it is created once at
/// startup and threaded explicitly through the program, including into
/// extension hooks. At most one store is live per context;
/// [`create_store`](Self::create_store) and
/// [`destroy_store`](Self::destroy_store) gate the lifecycle, and misuse
/// reports a [`LifecycleError`] without corrupting anything.
///
/// ## Example
///
/// ```no_run
/// use proxy_fnd::AppContext;
///
/// let mut ctx = AppContext::new();
/// ctx.create_store()?;
/// ctx.load("proxy.conf")?;
///
/// if let Some(workers) = ctx.get("worker_count") {
///     println!("workers: {}", workers.value);
/// }
///
/// ctx.destroy_store()?;
/// # Ok::<(), proxy_fnd::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct AppContext {
    store: Option<VarStore>,
}

impl AppContext {
    /// Creates a context with no live store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the variable store to life. Exactly one store may be live;
    /// a second call before [`destroy_store`](Self::destroy_store) fails.
    pub fn create_store(&mut self) -> Result<(), LifecycleError> {
        if self.store.is_some() {
            return Err(LifecycleError::AlreadyCreated);
        }
        self.store = Some(VarStore::new());
        info!("variable store created");
        Ok(())
    }

    /// Tears the store down, releasing every variable it owns.
    pub fn destroy_store(&mut self) -> Result<(), LifecycleError> {
        match self.store.take() {
            Some(store) => {
                info!(variables = store.len(), "variable store destroyed");
                Ok(())
            }
            None => Err(LifecycleError::NotCreated),
        }
    }

    /// Returns a reference to the live store.
    pub fn store(&self) -> Result<&VarStore, LifecycleError> {
        self.store.as_ref().ok_or(LifecycleError::NotCreated)
    }

    /// Returns a mutable reference to the live store.
    pub fn store_mut(&mut self) -> Result<&mut VarStore, LifecycleError> {
        self.store.as_mut().ok_or(LifecycleError::NotCreated)
    }

    /// Loads a configuration file into the live store.
    /// See [`VarStore::load`] for the skip-and-continue semantics.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadStats, Error> {
        Ok(self.store_mut()?.load(path)?)
    }

    /// Defines a new variable in the live store.
    pub fn define(&mut self, variable: ConfigVariable) -> Result<(), Error> {
        Ok(self.store_mut()?.define(variable)?)
    }

    /// Installs a value in the live store, defining the variable if absent.
    pub fn set(&mut self, variable: ConfigVariable) -> Result<(), Error> {
        self.store_mut()?.set(variable);
        Ok(())
    }

    /// Borrowed view of a variable, or `None` when it is not defined
    /// (or no store is live).
    pub fn get(&self, name: &str) -> Option<&ConfigVariable> {
        self.store.as_ref().and_then(|store| store.get(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.store
            .as_ref()
            .is_some_and(|store| store.exists(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigValue;

    #[test]
    fn test_create_twice_fails() {
        let mut ctx = AppContext::new();
        ctx.create_store().unwrap();
        assert_eq!(ctx.create_store(), Err(LifecycleError::AlreadyCreated));
    }

    #[test]
    fn test_destroy_before_create_fails() {
        let mut ctx = AppContext::new();
        assert_eq!(ctx.destroy_store(), Err(LifecycleError::NotCreated));
    }

    #[test]
    fn test_create_destroy_create_succeeds() {
        let mut ctx = AppContext::new();
        ctx.create_store().unwrap();
        ctx.destroy_store().unwrap();
        ctx.create_store().unwrap();
    }

    #[test]
    fn test_destroy_releases_all_variables() {
        let mut ctx = AppContext::new();
        ctx.create_store().unwrap();
        ctx.define(ConfigVariable::new("a", "", ConfigValue::Integer(1)))
            .unwrap();

        ctx.destroy_store().unwrap();
        ctx.create_store().unwrap();
        assert!(!ctx.exists("a"));
    }

    #[test]
    fn test_operations_before_create_report_misuse() {
        let mut ctx = AppContext::new();
        let result = ctx.define(ConfigVariable::new("a", "", ConfigValue::Integer(1)));
        assert!(matches!(
            result,
            Err(Error::Lifecycle(LifecycleError::NotCreated))
        ));
        assert!(ctx.get("a").is_none());
        assert!(!ctx.exists("a"));
    }
}
