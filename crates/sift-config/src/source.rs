//! Configuration sources.
//!
//! Loading goes through the [`ConfigSource`] trait instead of reading the
//! process environment directly, so tests can hand the loader a plain map.
//!
//! - [`EnvSource`]: the process environment, optionally layered over an env file
//! - [`EnvFile`]: the parsed contents of a `.env`-style file
//! - `HashMap<String, String>`: an in-memory source

use std::collections::HashMap;
use std::env;
use std::path::Path;

use tracing::{debug, warn};

/// A read-only lookup of named settings.
pub trait ConfigSource {
    /// Returns the raw value for `key`, or `None` if it is not set.
    fn get(&self, key: &str) -> Option<String>;
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Key/value pairs parsed from a `.env`-style file.
///
/// The file is read into memory; the process environment is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    vars: HashMap<String, String>,
}

impl EnvFile {
    /// Finds and parses `.env` in the current directory or one of its parents.
    ///
    /// # Errors
    ///
    /// Returns the `dotenvy` error if no file is found or it cannot be parsed.
    /// Use [`dotenvy::Error::not_found`] to tell the two apart.
    pub fn discover() -> Result<Self, dotenvy::Error> {
        let vars = dotenvy::dotenv_iter()?.collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self { vars })
    }

    /// Parses the env file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the `dotenvy` error if the file is missing or malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, dotenvy::Error> {
        let vars = dotenvy::from_path_iter(path)?.collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self { vars })
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl ConfigSource for EnvFile {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// The process environment, optionally backed by an env file.
///
/// Variables set in the process environment take precedence over values
/// from the file.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    file: Option<EnvFile>,
}

impl EnvSource {
    /// The bare process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process environment layered over `.env`, if one can be found.
    ///
    /// A missing or unreadable `.env` is logged and otherwise ignored.
    pub fn with_dotenv() -> Self {
        Self::layered(EnvFile::discover(), ".env")
    }

    /// The process environment layered over the env file at `path`.
    ///
    /// A missing or unreadable file is logged and otherwise ignored.
    pub fn with_env_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::layered(EnvFile::from_path(path), &path.display().to_string())
    }

    fn layered(file: Result<EnvFile, dotenvy::Error>, name: &str) -> Self {
        match file {
            Ok(file) => {
                debug!(env_file = %name, vars = file.len(), "Loaded env file");
                Self { file: Some(file) }
            }
            Err(e) if e.not_found() => {
                warn!(env_file = %name, "Env file not found, using process environment only");
                Self::new()
            }
            Err(e) => {
                warn!(env_file = %name, error = %e, "Failed to read env file, using process environment only");
                Self::new()
            }
        }
    }
}

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key)
            .ok()
            .or_else(|| self.file.as_ref().and_then(|file| file.get(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_env_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("sift-config-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_map_source_lookup() {
        let mut map = HashMap::new();
        map.insert("DB_USER".to_string(), "sift".to_string());

        assert_eq!(ConfigSource::get(&map, "DB_USER"), Some("sift".to_string()));
        assert_eq!(ConfigSource::get(&map, "DB_NAME"), None);
    }

    #[test]
    fn test_env_file_from_path() {
        let path = write_env_file(
            "parse.env",
            "SIFT_TEST_FILE_ONLY_HOST=db.internal\n# comment\nSIFT_TEST_FILE_ONLY_PORT=6543\n",
        );

        let file = EnvFile::from_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(file.len(), 2);
        assert_eq!(file.get("SIFT_TEST_FILE_ONLY_HOST"), Some("db.internal".to_string()));
        assert_eq!(file.get("SIFT_TEST_FILE_ONLY_PORT"), Some("6543".to_string()));
    }

    #[test]
    fn test_env_file_missing_is_not_found() {
        let err = EnvFile::from_path("/definitely/not/here/.env").unwrap_err();
        assert!(err.not_found());
    }

    #[test]
    fn test_env_source_missing_file_falls_back_to_environment() {
        let source = EnvSource::with_env_file("/definitely/not/here/.env");
        assert!(source.file.is_none());
        assert_eq!(source.get("SIFT_TEST_UNSET_VARIABLE_XYZ"), None);
    }

    #[test]
    fn test_env_source_reads_file_values() {
        let path = write_env_file("layered.env", "SIFT_TEST_LAYERED_ONLY_IN_FILE=from-file\n");

        let source = EnvSource::with_env_file(&path);
        fs::remove_file(&path).ok();

        assert_eq!(
            source.get("SIFT_TEST_LAYERED_ONLY_IN_FILE"),
            Some("from-file".to_string())
        );
    }

    #[test]
    fn test_env_source_prefers_process_environment() {
        // PATH is set in every test environment
        let path = write_env_file("precedence.env", "PATH=from-file\n");

        let source = EnvSource::with_env_file(&path);
        fs::remove_file(&path).ok();

        assert_ne!(source.get("PATH"), Some("from-file".to_string()));
    }
}
