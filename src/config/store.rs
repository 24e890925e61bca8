//! The process-wide variable store: define/get/set over a hash-chained map.

use std::fs::File;
use std::path::Path;

use tracing::{debug, error, info, warn};

use super::error::ConfigError;
use super::parser::parse_line;
use super::reader::LineReader;
use super::value::ConfigVariable;
use crate::chain::ChainMap;

/// Outcome counters for one [`VarStore::load`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Variables inserted from the file.
    pub defined: usize,
    /// Lines whose key was already defined (first definition wins).
    pub skipped_duplicate: usize,
    /// Malformed lines that were logged and skipped.
    pub skipped_invalid: usize,
}

/// Typed store of configuration variables.
///
/// The store owns every [`ConfigVariable`] handed to it; lookups return
/// borrowed views that stay valid until the variable is overwritten with
/// [`set`](Self::set) or the store is dropped. Not thread-safe: intended
/// for a single initialization phase followed by read-mostly access.
#[derive(Debug, Default)]
pub struct VarStore {
    vars: ChainMap<ConfigVariable>,
}

impl VarStore {
    pub fn new() -> Self {
        Self {
            vars: ChainMap::new(),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ConfigVariable> {
        self.vars.get(name)
    }

    /// Inserts a new variable, taking ownership of it.
    ///
    /// Fails with [`ConfigError::AlreadyDefined`] if the name is taken; the
    /// existing entry is left untouched.
    pub fn define(&mut self, variable: ConfigVariable) -> Result<(), ConfigError> {
        if self.vars.contains_key(&variable.name) {
            return Err(ConfigError::AlreadyDefined(variable.name));
        }
        debug!(name = %variable.name, "defining config variable");
        self.vars.insert(variable.name.clone(), variable);
        Ok(())
    }

    /// Installs a value, taking ownership of the supplied variable.
    ///
    /// On a missing name this behaves exactly like [`define`](Self::define).
    /// On an existing name it replaces the value only; the stored name and
    /// description are kept, the old value is dropped.
    pub fn set(&mut self, variable: ConfigVariable) {
        match self.vars.get_mut(&variable.name) {
            Some(existing) => {
                debug!(name = %variable.name, "replacing config variable value");
                existing.value = variable.value;
            }
            None => {
                self.vars.insert(variable.name.clone(), variable);
            }
        }
    }

    /// Number of variables currently defined.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Loads a configuration file, one statement per line.
    ///
    /// Malformed lines are logged and skipped; keys already defined (in
    /// code before the call, or earlier in the file) are silently left as
    /// they are — loading never overwrites. Only failure to open the file
    /// is an error; pre-existing definitions survive it.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadStats, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::CannotOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = LineReader::new(file);
        let mut stats = LoadStats::default();
        let mut line_number = 0usize;

        loop {
            let line = match reader.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    // Mid-file I/O failure ends the load but is not fatal;
                    // everything parsed so far stays defined.
                    error!(path = %path.display(), line = line_number + 1, error = %e,
                        "read error while loading config, stopping");
                    break;
                }
            };
            line_number += 1;

            match parse_line(&line) {
                Ok(Some((key, value))) => {
                    match self.define(ConfigVariable::new(key, String::new(), value)) {
                        Ok(()) => stats.defined += 1,
                        Err(ConfigError::AlreadyDefined(name)) => {
                            debug!(path = %path.display(), line = line_number, name = %name,
                                "already defined, keeping first definition");
                            stats.skipped_duplicate += 1;
                        }
                        Err(e) => return Err(e),
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(path = %path.display(), line = line_number, error = %e,
                        "skipping malformed config line");
                    stats.skipped_invalid += 1;
                }
            }
        }

        info!(path = %path.display(), defined = stats.defined,
            duplicates = stats.skipped_duplicate, invalid = stats.skipped_invalid,
            "config file loaded");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::value::ConfigValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn var(name: &str, value: ConfigValue) -> ConfigVariable {
        ConfigVariable::new(name, format!("{name} description"), value)
    }

    #[test]
    fn test_define_and_get() {
        let mut store = VarStore::new();
        store.define(var("workers", ConfigValue::Integer(4))).unwrap();

        let fetched = store.get("workers").unwrap();
        assert_eq!(fetched.value, ConfigValue::Integer(4));
        assert_eq!(fetched.description, "workers description");
        assert!(store.exists("workers"));
        assert!(!store.exists("missing"));
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_define_twice_keeps_first_value() {
        let mut store = VarStore::new();
        store.define(var("port", ConfigValue::Integer(80))).unwrap();

        let second = store.define(var("port", ConfigValue::Integer(443)));
        assert!(matches!(second, Err(ConfigError::AlreadyDefined(name)) if name == "port"));
        assert_eq!(store.get("port").unwrap().value, ConfigValue::Integer(80));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_on_missing_name_defines() {
        let mut store = VarStore::new();
        store.set(var("mode", ConfigValue::Str("fast".into())));

        assert_eq!(store.get("mode").unwrap().value, ConfigValue::Str("fast".into()));
    }

    #[test]
    fn test_set_replaces_value_but_not_description() {
        let mut store = VarStore::new();
        store.define(var("limit", ConfigValue::Integer(10))).unwrap();

        store.set(ConfigVariable::new(
            "limit",
            "ignored description",
            ConfigValue::Real(2.5),
        ));

        let fetched = store.get("limit").unwrap();
        assert_eq!(fetched.value, ConfigValue::Real(2.5));
        assert_eq!(fetched.description, "limit description");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_end_to_end() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "worker_count = 4\n\
             name = \"edge-proxy\"\n\
             ratios = [0.5, 1.5, 2.0]\n\
             # comment line\n\
             bad line without equals\n"
        )
        .unwrap();

        let mut store = VarStore::new();
        let stats = store.load(file.path()).unwrap();

        assert_eq!(stats.defined, 3);
        assert_eq!(stats.skipped_invalid, 1);
        assert_eq!(stats.skipped_duplicate, 0);
        assert_eq!(store.len(), 3);

        assert_eq!(
            store.get("worker_count").unwrap().value,
            ConfigValue::Integer(4)
        );
        assert_eq!(
            store.get("name").unwrap().value,
            ConfigValue::Str("edge-proxy".into())
        );
        assert_eq!(
            store.get("ratios").unwrap().value,
            ConfigValue::RealArray(vec![0.5, 1.5, 2.0])
        );
    }

    #[test]
    fn test_load_never_overwrites_code_definitions() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080").unwrap();

        let mut store = VarStore::new();
        store.define(var("port", ConfigValue::Integer(443))).unwrap();

        let stats = store.load(file.path()).unwrap();
        assert_eq!(stats.skipped_duplicate, 1);
        assert_eq!(stats.defined, 0);
        assert_eq!(store.get("port").unwrap().value, ConfigValue::Integer(443));
    }

    #[test]
    fn test_load_first_file_definition_wins() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "size = 1\nsize = 2\n").unwrap();

        let mut store = VarStore::new();
        let stats = store.load(file.path()).unwrap();

        assert_eq!(stats.defined, 1);
        assert_eq!(stats.skipped_duplicate, 1);
        assert_eq!(store.get("size").unwrap().value, ConfigValue::Integer(1));
    }

    #[test]
    fn test_load_missing_file_keeps_existing_definitions() {
        let mut store = VarStore::new();
        store.define(var("kept", ConfigValue::Integer(1))).unwrap();

        let result = store.load("/nonexistent/path/proxy.conf");
        assert!(matches!(result, Err(ConfigError::CannotOpen { .. })));
        assert!(store.exists("kept"));
    }

    #[test]
    fn test_load_final_line_without_newline() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a = 1\nb = 2").unwrap();

        let mut store = VarStore::new();
        let stats = store.load(file.path()).unwrap();
        assert_eq!(stats.defined, 2);
        assert_eq!(store.get("b").unwrap().value, ConfigValue::Integer(2));
    }
}
