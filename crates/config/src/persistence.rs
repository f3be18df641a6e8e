//! Settings document lookup and reading.
//!
//! This module handles locating settings documents and turning them into
//! generic TOML tables for the schema and merge steps.
//!
//! # Settings Root
//!
//! Relative document paths are resolved against a [`SettingsRoot`]:
//!
//! 1. `READMEAI_SETTINGS_DIR` if set and non-empty
//! 2. The `settings/` directory packaged with this crate
//!
//! Absolute paths are used as-is.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, Result};

/// Environment variable overriding the settings directory.
pub const SETTINGS_DIR_ENV: &str = "READMEAI_SETTINGS_DIR";

/// Default name of the primary settings document.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Directory that relative settings paths resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRoot {
    dir: PathBuf,
}

impl SettingsRoot {
    /// Creates a settings root at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the settings directory packaged with this crate.
    #[must_use]
    pub fn packaged() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("settings"))
    }

    /// Returns the root from `READMEAI_SETTINGS_DIR`, falling back to the
    /// packaged directory.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_var(std::env::var_os(SETTINGS_DIR_ENV))
    }

    /// Returns the root named by an override value, falling back to the
    /// packaged directory when it is unset or empty.
    #[must_use]
    pub fn from_var(value: Option<OsString>) -> Self {
        match value {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::packaged(),
        }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolves a document path against this root.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use readmeai_config::persistence::SettingsRoot;
    ///
    /// let root = SettingsRoot::new("/etc/readmeai");
    /// assert_eq!(root.resolve("config.toml"), Path::new("/etc/readmeai/config.toml"));
    /// assert_eq!(root.resolve("/tmp/other.toml"), Path::new("/tmp/other.toml"));
    /// ```
    #[must_use]
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        };
        debug!(path = %path.display(), resolved = %resolved.display(), "resolved settings path");
        resolved
    }

    /// Resolves a document path and checks that it exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigFileNotFound`] if nothing exists at the
    /// resolved location.
    pub fn locate(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let resolved = self.resolve(path);
        if resolved.exists() {
            Ok(resolved)
        } else {
            Err(ConfigError::ConfigFileNotFound { path: resolved })
        }
    }
}

impl Default for SettingsRoot {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Reads a structured document into a generic table.
pub trait DocumentReader {
    /// Reads the document at `path`.
    ///
    /// # Errors
    ///
    /// Implementations return [`ConfigError::ConfigFileNotFound`] for
    /// missing documents.
    fn read(&self, path: &Path) -> Result<toml::Table>;
}

/// Reads TOML documents from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlReader;

impl DocumentReader for TomlReader {
    fn read(&self, path: &Path) -> Result<toml::Table> {
        read_config_file(path)
    }
}

/// Reads and parses a TOML document.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The file cannot be read
/// - The file content is not valid TOML
///
/// # Examples
///
/// ```no_run
/// use readmeai_config::persistence::read_config_file;
///
/// # fn main() -> readmeai_config::Result<()> {
/// let table = read_config_file("settings/config.toml")?;
/// assert!(table.contains_key("git"));
/// # Ok(())
/// # }
/// ```
pub fn read_config_file(path: impl AsRef<Path>) -> Result<toml::Table> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.toml");
        std::fs::write(&path, "name = \"test\"\n[section]\nvalue = 42\n").unwrap();

        let table = read_config_file(&path).unwrap();
        assert_eq!(table["name"].as_str(), Some("test"));
        assert_eq!(table["section"]["value"].as_integer(), Some(42));
    }

    #[test]
    fn read_nonexistent_file() {
        let err = read_config_file("/nonexistent/path.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFileNotFound { .. }));
    }

    #[test]
    fn read_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn resolve_relative_and_absolute() {
        let dir = TempDir::new().unwrap();
        let root = SettingsRoot::new(dir.path());
        assert_eq!(root.resolve("a.toml"), dir.path().join("a.toml"));

        let absolute = dir.path().join("b.toml");
        assert_eq!(root.resolve(&absolute), absolute);
    }

    #[test]
    fn locate_missing_file() {
        let dir = TempDir::new().unwrap();
        let root = SettingsRoot::new(dir.path());
        let err = root.locate("missing.toml").unwrap_err();
        match err {
            ConfigError::ConfigFileNotFound { path } => {
                assert_eq!(path, dir.path().join("missing.toml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn override_value_wins() {
        let root = SettingsRoot::from_var(Some(OsString::from("/srv/readmeai")));
        assert_eq!(root.dir(), Path::new("/srv/readmeai"));
    }

    #[test]
    fn empty_or_unset_override_uses_packaged() {
        assert_eq!(SettingsRoot::from_var(None), SettingsRoot::packaged());
        assert_eq!(
            SettingsRoot::from_var(Some(OsString::new())),
            SettingsRoot::packaged()
        );
    }

    #[test]
    fn env_root_matches_override_lookup() {
        let expected = SettingsRoot::from_var(std::env::var_os(SETTINGS_DIR_ENV));
        assert_eq!(SettingsRoot::from_env(), expected);
        assert_eq!(SettingsRoot::default(), expected);
    }

    #[test]
    fn packaged_root_contains_default_config() {
        let root = SettingsRoot::packaged();
        assert!(root.locate(DEFAULT_CONFIG_FILE).is_ok());
    }

    #[test]
    fn toml_reader_reads_packaged_config() {
        let path = SettingsRoot::packaged().resolve(DEFAULT_CONFIG_FILE);
        let table = TomlReader.read(&path).unwrap();
        assert!(table.contains_key("git"));
        assert!(table.contains_key("llm"));
    }
}
