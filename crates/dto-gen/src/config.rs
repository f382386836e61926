use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Named connections, loaded from a JSON file:
/// `{ "connections": { "main": "path/to/db.sqlite" } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connections: BTreeMap<String, PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Looks up a connection by name (case sensitive). The error lists the
    /// available names to ease fixing a typo.
    pub fn resolve(&self, name: &str) -> AppResult<&Path> {
        self.connections
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| AppError::UnknownConnection {
                name: name.to_string(),
                available: self.connections.keys().cloned().collect(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_and_resolves() {
        let f = write_config(r#"{ "connections": { "main": "/tmp/app.db" } }"#);
        let config = Config::load(f.path()).unwrap();
        assert_eq!(config.resolve("main").unwrap(), Path::new("/tmp/app.db"));
    }

    #[test]
    fn unknown_name_lists_available_connections() {
        let f = write_config(r#"{ "connections": { "a": "x.db", "b": "y.db" } }"#);
        let config = Config::load(f.path()).unwrap();
        let err = config.resolve("Main").unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_CONNECTION");
        assert!(err.to_string().contains("a, b"));
    }

    #[test]
    fn missing_file_is_config_read() {
        let err = Config::load(Path::new("/no/such/config.json")).unwrap_err();
        assert_eq!(err.code(), "CONFIG_READ");
    }

    #[test]
    fn invalid_json_is_config_parse() {
        let f = write_config("{ not json");
        let err = Config::load(f.path()).unwrap_err();
        assert_eq!(err.code(), "CONFIG_PARSE");
    }
}
