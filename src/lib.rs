pub mod chain;
pub mod config;
pub mod context;
mod error;
pub mod ext;

pub use chain::ChainMap;
pub use config::{
    Cardinality, ConfigError, ConfigValue, ConfigVariable, LoadStats, ParseError, ValueKind,
    VarStore,
};
pub use context::{AppContext, LifecycleError};
pub use error::Error;
pub use ext::{Extension, ExtensionRegistry};
