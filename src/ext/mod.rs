//! Extension lifecycle boundary.
//!
//! Extensions are discovered and loaded by the host (how they arrive —
//! shared library, static registration — is the host's business); this
//! module only fixes the contract they must honor and keeps the bookkeeping
//! of which extensions are live. Init hooks run in registration order,
//! shutdown hooks in reverse, so an extension may rely on everything
//! registered before it still being alive during its own `fini`.

use tracing::{error, info};

use crate::context::AppContext;
use crate::Error;

/// Lifecycle contract for a loaded extension.
///
/// Both hooks receive the application context so extensions can read and
/// define configuration variables.
pub trait Extension {
    fn name(&self) -> &str;

    /// Called once after the extension is registered and the configuration
    /// has been loaded.
    fn init(&mut self, ctx: &mut AppContext) -> Result<(), Error>;

    /// Called once during shutdown, in reverse registration order.
    fn fini(&mut self, ctx: &mut AppContext) -> Result<(), Error>;
}

/// Holds live extensions in registration order.
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Box<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, extension: Box<dyn Extension>) {
        info!(name = extension.name(), "extension registered");
        self.extensions.push(extension);
    }

    /// Number of registered extensions.
    pub fn count(&self) -> usize {
        self.extensions.len()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Extension> {
        self.extensions
            .iter()
            .find(|ext| ext.name() == name)
            .map(|ext| ext.as_ref())
    }

    /// Runs every `init` hook in registration order. A failing hook is
    /// logged and skipped; the remaining extensions still initialize.
    /// Returns how many initialized successfully.
    pub fn init_all(&mut self, ctx: &mut AppContext) -> usize {
        let mut initialized = 0;
        for extension in &mut self.extensions {
            match extension.init(ctx) {
                Ok(()) => initialized += 1,
                Err(e) => {
                    error!(name = extension.name(), error = %e, "extension init failed");
                }
            }
        }
        initialized
    }

    /// Runs every `fini` hook in reverse registration order and drops the
    /// extensions. Failures are logged; the walk never stops early.
    pub fn close_all(&mut self, ctx: &mut AppContext) {
        while let Some(mut extension) = self.extensions.pop() {
            if let Err(e) = extension.fini(ctx) {
                error!(name = extension.name(), error = %e, "extension fini failed");
            }
        }
    }
}
