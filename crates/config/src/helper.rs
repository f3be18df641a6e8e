//! Merging of the auxiliary lookup tables.
//!
//! The primary document names four auxiliary documents (see
//! [`FileSettings::helper_paths`](crate::config::FileSettings::helper_paths)).
//! Each may define any subset of these keys:
//!
//! | Key                | Shape                   | Merge       |
//! |--------------------|-------------------------|-------------|
//! | `dependency_files` | array of strings        | appended    |
//! | `ignore_files`     | table of string arrays  | key replace |
//! | `language_names`   | table of strings        | key replace |
//! | `language_setup`   | table of string arrays  | key replace |
//!
//! Documents are folded in order, so later documents win on conflicting
//! keys. Paths are not deduplicated: a path listed twice is applied twice.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};
use tracing::{debug, instrument};

use crate::config::AppConfig;
use crate::error::{ConfigError, FieldError, Result};
use crate::persistence::{DocumentReader, SettingsRoot, TomlReader};

const DEPENDENCY_FILES: &str = "dependency_files";
const IGNORE_FILES: &str = "ignore_files";
const LANGUAGE_NAMES: &str = "language_names";
const LANGUAGE_SETUP: &str = "language_setup";

/// The four lookup tables accumulated from auxiliary documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryConfig {
    /// File names that mark a dependency manifest, in document order.
    #[serde(default)]
    pub dependency_files: Vec<String>,
    /// Ignore patterns by category (`directories`, `extensions`, `files`).
    #[serde(default)]
    pub ignore_files: BTreeMap<String, Vec<String>>,
    /// Display language names by file extension.
    #[serde(default)]
    pub language_names: BTreeMap<String, String>,
    /// Install/run/test commands by language.
    #[serde(default)]
    pub language_setup: BTreeMap<String, Vec<String>>,
}

impl AuxiliaryConfig {
    /// Reads and folds every document in `paths`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigFileNotFound`] for the first path that
    /// does not resolve, or [`ConfigError::ConfigValidation`] if a
    /// recognized key has the wrong shape. No partial result is returned.
    #[instrument(skip_all)]
    pub fn merge_all<P: AsRef<Path>>(
        reader: &dyn DocumentReader,
        root: &SettingsRoot,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Self> {
        paths.into_iter().try_fold(Self::default(), |mut merged, path| {
            let location = root.locate(path)?;
            let document = reader.read(&location)?;
            merged.merge_document(&location.display().to_string(), document)?;
            Ok(merged)
        })
    }

    /// Folds one parsed document into the tables.
    ///
    /// `origin` names the document in error messages. Keys other than the
    /// four recognized ones are ignored. The document is checked in full
    /// before anything is applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigValidation`] naming every recognized key
    /// whose value has the wrong shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use readmeai_config::AuxiliaryConfig;
    ///
    /// let mut tables = AuxiliaryConfig::default();
    /// tables.merge_document("a", toml::from_str("[language_names]\npy = \"Python\"").unwrap()).unwrap();
    /// tables.merge_document("b", toml::from_str("[language_names]\npy = \"Python 3\"").unwrap()).unwrap();
    /// assert_eq!(tables.language_name("py"), Some("Python 3"));
    /// ```
    pub fn merge_document(&mut self, origin: &str, mut document: Table) -> Result<()> {
        let mut errors = Vec::new();
        let dependency_files: Option<Vec<String>> =
            take_key(&mut document, origin, DEPENDENCY_FILES, &mut errors);
        let ignore_files: Option<BTreeMap<String, Vec<String>>> =
            take_key(&mut document, origin, IGNORE_FILES, &mut errors);
        let language_names: Option<BTreeMap<String, String>> =
            take_key(&mut document, origin, LANGUAGE_NAMES, &mut errors);
        let language_setup: Option<BTreeMap<String, Vec<String>>> =
            take_key(&mut document, origin, LANGUAGE_SETUP, &mut errors);

        if !errors.is_empty() {
            return Err(ConfigError::ConfigValidation { errors });
        }

        debug!(
            origin,
            dependency_files = dependency_files.as_ref().map_or(0, Vec::len),
            ignore_files = ignore_files.as_ref().map_or(0, BTreeMap::len),
            language_names = language_names.as_ref().map_or(0, BTreeMap::len),
            language_setup = language_setup.as_ref().map_or(0, BTreeMap::len),
            "merging auxiliary document"
        );

        if let Some(files) = dependency_files {
            self.dependency_files.extend(files);
        }
        if let Some(table) = ignore_files {
            self.ignore_files.extend(table);
        }
        if let Some(table) = language_names {
            self.language_names.extend(table);
        }
        if let Some(table) = language_setup {
            self.language_setup.extend(table);
        }
        Ok(())
    }

    /// Returns the display name for a file extension, e.g. `py` → `Python`.
    #[must_use]
    pub fn language_name(&self, extension: &str) -> Option<&str> {
        self.language_names.get(extension).map(String::as_str)
    }

    /// Returns the setup commands configured for `language`.
    #[must_use]
    pub fn setup_commands(&self, language: &str) -> Option<&[String]> {
        self.language_setup.get(language).map(Vec::as_slice)
    }

    /// Returns the ignore patterns of a category, empty if undefined.
    #[must_use]
    pub fn ignore_patterns(&self, category: &str) -> &[String] {
        self.ignore_files
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns whether `file_name` is a known dependency manifest.
    #[must_use]
    pub fn is_dependency_file(&self, file_name: &str) -> bool {
        self.dependency_files.iter().any(|f| f == file_name)
    }
}

/// Removes `key` from `document` and deserializes it, recording a field
/// error on a shape mismatch.
fn take_key<T: DeserializeOwned>(
    document: &mut Table,
    origin: &str,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let value: Value = document.remove(key)?;
    let found = value.type_str();
    match value.try_into::<T>() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            errors.push(FieldError::new(
                format!("{origin}:{key}"),
                format!("unexpected {found} value: {}", e.message()),
            ));
            None
        }
    }
}

/// The primary configuration together with the merged lookup tables.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigHelper {
    /// The primary settings document.
    pub conf: AppConfig,
    /// Tables merged from the documents named in `conf.files`.
    #[serde(flatten)]
    pub tables: AuxiliaryConfig,
}

impl ConfigHelper {
    /// Merges the auxiliary documents named by `conf`, resolving them
    /// against the settings root from the environment.
    ///
    /// # Errors
    ///
    /// See [`AuxiliaryConfig::merge_all`].
    pub fn load(conf: AppConfig) -> Result<Self> {
        Self::load_with(conf, &TomlReader, &SettingsRoot::from_env())
    }

    /// Merges the auxiliary documents named by `conf` through `reader`.
    ///
    /// # Errors
    ///
    /// See [`AuxiliaryConfig::merge_all`].
    pub fn load_with(
        conf: AppConfig,
        reader: &dyn DocumentReader,
        root: &SettingsRoot,
    ) -> Result<Self> {
        let tables = AuxiliaryConfig::merge_all(reader, root, conf.files.helper_paths())?;
        Ok(Self { conf, tables })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::CONFIG_TOML;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    fn merge(dir: &TempDir, paths: &[&str]) -> Result<AuxiliaryConfig> {
        AuxiliaryConfig::merge_all(&TomlReader, &SettingsRoot::new(dir.path()), paths)
    }

    #[test]
    fn language_names_last_write_wins() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.toml", "[language_names]\npy = \"Python\"\nrs = \"Rust\"\n");
        write(&dir, "b.toml", "[language_names]\npy = \"CPython\"\ngo = \"Go\"\n");

        let merged = merge(&dir, &["a.toml", "b.toml"]).unwrap();
        assert_eq!(merged.language_name("py"), Some("CPython"));
        assert_eq!(merged.language_name("rs"), Some("Rust"));
        assert_eq!(merged.language_name("go"), Some("Go"));
        assert_eq!(merged.language_names.len(), 3);
    }

    #[test]
    fn dependency_files_append_in_order_with_duplicates() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.toml", "dependency_files = [\"Cargo.toml\", \"go.mod\"]\n");
        write(&dir, "b.toml", "dependency_files = [\"package.json\", \"Cargo.toml\"]\n");

        let merged = merge(&dir, &["a.toml", "b.toml"]).unwrap();
        assert_eq!(
            merged.dependency_files,
            vec!["Cargo.toml", "go.mod", "package.json", "Cargo.toml"]
        );
        assert!(merged.is_dependency_file("go.mod"));
        assert!(!merged.is_dependency_file("setup.py"));
    }

    #[test]
    fn duplicate_path_is_applied_twice() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "all.toml",
            "dependency_files = [\"requirements.txt\"]\n[language_setup]\nPython = [\"pip install\", \"python main.py\"]\n",
        );

        let merged = merge(&dir, &["all.toml", "all.toml"]).unwrap();
        assert_eq!(merged.dependency_files, vec!["requirements.txt", "requirements.txt"]);
        assert_eq!(merged.language_setup.len(), 1);
        assert_eq!(
            merged.setup_commands("Python"),
            Some(&["pip install".to_string(), "python main.py".to_string()][..])
        );
    }

    #[test]
    fn document_without_recognized_keys_is_noop() {
        let dir = TempDir::new().unwrap();
        write(&dir, "other.toml", "[unrelated]\nkey = \"value\"\n");
        write(&dir, "empty.toml", "");

        let merged = merge(&dir, &["other.toml", "empty.toml"]).unwrap();
        assert_eq!(merged, AuxiliaryConfig::default());
    }

    #[test]
    fn ignore_files_replace_by_category() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "a.toml",
            "[ignore_files]\ndirectories = [\".git\"]\nextensions = [\"png\"]\n",
        );
        write(&dir, "b.toml", "[ignore_files]\ndirectories = [\"node_modules\"]\n");

        let merged = merge(&dir, &["a.toml", "b.toml"]).unwrap();
        assert_eq!(merged.ignore_patterns("directories"), ["node_modules"]);
        assert_eq!(merged.ignore_patterns("extensions"), ["png"]);
        assert!(merged.ignore_patterns("files").is_empty());
    }

    #[test]
    fn missing_document_fails_fast() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.toml", "dependency_files = [\"Cargo.toml\"]\n");

        let err = merge(&dir, &["a.toml", "missing.toml"]).unwrap_err();
        match err {
            ConfigError::ConfigFileNotFound { path } => {
                assert_eq!(path, dir.path().join("missing.toml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wrong_shape_names_document_and_key() {
        let mut merged = AuxiliaryConfig::default();
        let document: Table =
            toml::from_str("dependency_files = \"Cargo.toml\"\nlanguage_names = [1, 2]\n").unwrap();

        let err = merged.merge_document("helpers.toml", document).unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["helpers.toml:dependency_files", "helpers.toml:language_names"]
        );
        assert_eq!(merged, AuxiliaryConfig::default());
    }

    #[test]
    fn empty_path_list_yields_empty_tables() {
        let dir = TempDir::new().unwrap();
        let merged = merge(&dir, &[]).unwrap();
        assert_eq!(merged, AuxiliaryConfig::default());
    }

    #[test]
    fn config_helper_merges_named_documents() {
        let dir = TempDir::new().unwrap();
        write(&dir, "dependency_files.toml", "dependency_files = [\"Cargo.toml\"]\n");
        write(&dir, "ignore_files.toml", "[ignore_files]\nfiles = [\"LICENSE\"]\n");
        write(&dir, "language_names.toml", "[language_names]\nrs = \"Rust\"\n");
        write(
            &dir,
            "language_setup.toml",
            "[language_setup]\nRust = [\"cargo build\", \"cargo run\", \"cargo test\"]\n",
        );

        let conf = AppConfig::from_table(toml::from_str(CONFIG_TOML).unwrap()).unwrap();
        let helper =
            ConfigHelper::load_with(conf, &TomlReader, &SettingsRoot::new(dir.path())).unwrap();

        assert_eq!(helper.conf.git.name(), "readme-ai");
        assert!(helper.tables.is_dependency_file("Cargo.toml"));
        assert_eq!(helper.tables.ignore_patterns("files"), ["LICENSE"]);
        assert_eq!(helper.tables.language_name("rs"), Some("Rust"));
        assert_eq!(helper.tables.setup_commands("Rust").map(<[String]>::len), Some(3));
    }
}
