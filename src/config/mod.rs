//! Configuration file parsing and the typed variable store.

mod error;
mod parser;
mod reader;
mod store;
mod value;

pub use error::{ConfigError, ParseError};
pub use parser::parse_line;
pub use reader::LineReader;
pub use store::{LoadStats, VarStore};
pub use value::{Cardinality, ConfigValue, ConfigVariable, ValueKind};
