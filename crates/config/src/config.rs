//! Core configuration structs and loading logic.
//!
//! This module provides [`AppConfig`], the typed form of the primary settings
//! document, and its six sections.

use std::path::Path;

use serde::{Deserialize, Serialize};
use toml::{Table, Value};
use tracing::{debug, info, instrument};

use crate::error::{ConfigError, FieldError, Result};
use crate::persistence::{DEFAULT_CONFIG_FILE, DocumentReader, SettingsRoot, TomlReader};
use crate::repository::RepositoryReference;
use crate::schema::check_document;
use crate::service::GitService;

/// CLI options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliSettings {
    /// Whether section headers get emoji prefixes.
    pub emojis: bool,
    /// Whether to skip all LLM API calls.
    pub offline: bool,
}

/// Paths of the auxiliary settings documents.
///
/// Relative paths resolve against the [`SettingsRoot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Document listing dependency manifest file names.
    pub dependency_files: String,
    /// Document of identifier lookups.
    pub identifiers: String,
    /// Document of ignore patterns by category.
    pub ignore_files: String,
    /// Document mapping file extensions to language names.
    pub language_names: String,
    /// Document of setup commands by language.
    pub language_setup: String,
    /// Where the generated README is written.
    pub output: String,
    /// Document of shields.io badge icons.
    pub shieldsio_icons: String,
    /// Document of skill badge icons.
    pub skill_icons: String,
}

impl FileSettings {
    /// Returns the documents merged into the helper tables, in merge order.
    #[must_use]
    pub fn helper_paths(&self) -> [&str; 4] {
        [
            &self.dependency_files,
            &self.ignore_files,
            &self.language_names,
            &self.language_setup,
        ]
    }
}

/// The repository being documented.
///
/// Only `repository` is read from the document; the source service and the
/// name are derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawGitSettings")]
pub struct GitSettings {
    reference: RepositoryReference,
}

#[derive(Deserialize)]
struct RawGitSettings {
    repository: String,
}

impl TryFrom<RawGitSettings> for GitSettings {
    type Error = ConfigError;

    fn try_from(raw: RawGitSettings) -> Result<Self> {
        Self::new(&raw.repository)
    }
}

impl GitSettings {
    /// Resolves `repository` into git settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be resolved.
    pub fn new(repository: &str) -> Result<Self> {
        RepositoryReference::resolve(repository).map(Self::from)
    }

    /// Returns the repository string as configured.
    #[must_use]
    pub fn repository(&self) -> &str {
        self.reference.repository()
    }

    /// Returns the hosting service.
    #[must_use]
    pub fn source(&self) -> GitService {
        self.reference.source()
    }

    /// Returns the repository name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.reference.name()
    }

    /// Returns the resolved reference.
    #[must_use]
    pub fn reference(&self) -> &RepositoryReference {
        &self.reference
    }
}

impl Serialize for GitSettings {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.reference.serialize(serializer)
    }
}

impl From<RepositoryReference> for GitSettings {
    fn from(reference: RepositoryReference) -> Self {
        Self { reference }
    }
}

/// LLM API parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmApiSettings {
    /// Completion endpoint URL.
    pub endpoint: String,
    /// Tokenizer encoding name.
    pub encoding: String,
    /// Model identifier.
    pub model: String,
    /// Maximum concurrent requests.
    pub rate_limit: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Token budget per request.
    pub tokens: u32,
    /// Token budget for the whole run.
    pub tokens_max: u32,
}

/// Markdown templates for the generated README.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownSettings {
    /// Alignment of the header block.
    pub align: String,
    /// Badge template used in offline mode.
    pub badges_offline: String,
    /// shields.io badge template.
    pub badges_shieldsio: String,
    /// Skill icon badge template.
    pub badges_skills: String,
    /// Badge style name.
    pub badges_style: String,
    /// Contributing section.
    pub contribute: String,
    /// Fallback text for empty sections.
    pub default: String,
    /// Collapsible block template.
    pub dropdown: String,
    /// Getting started section.
    pub getting_started: String,
    /// Centered header template.
    pub header: String,
    /// Left-aligned header template.
    pub header_left: String,
    /// Header image URL.
    pub image: String,
    /// Per-module summary section.
    pub modules: String,
    /// Overview section.
    pub overview: String,
    /// Summary table template.
    pub tables: String,
    /// Table of contents.
    pub toc: String,
    /// Directory tree section.
    pub tree: String,
}

/// LLM prompt templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSettings {
    /// Prompt for the feature table.
    pub features: String,
    /// Prompt for the project overview.
    pub overview: String,
    /// Prompt for the one-line slogan.
    pub slogan: String,
    /// Prompt for per-file summaries.
    pub summaries: String,
}

/// The primary settings document.
///
/// Every field of every section is required; see [`crate::schema::SCHEMA`].
///
/// # Examples
///
/// ```no_run
/// use readmeai_config::AppConfig;
///
/// # fn example() -> readmeai_config::Result<()> {
/// let config = AppConfig::load("config.toml")?;
/// println!("Documenting {} from {}", config.git.name(), config.git.source());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// CLI options.
    pub cli: CliSettings,
    /// Auxiliary document paths.
    pub files: FileSettings,
    /// The repository being documented.
    pub git: GitSettings,
    /// LLM API parameters.
    pub llm: LlmApiSettings,
    /// Markdown templates.
    pub md: MarkdownSettings,
    /// Prompt templates.
    pub prompts: PromptSettings,
}

impl AppConfig {
    /// Loads the packaged default settings document.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load_with`].
    pub fn load_default() -> Result<Self> {
        Self::load(DEFAULT_CONFIG_FILE)
    }

    /// Loads a settings document, resolving `path` against the settings
    /// root from the environment.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load_with`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(&TomlReader, &SettingsRoot::from_env(), path)
    }

    /// Loads a settings document through `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigFileNotFound`] if the document does not
    /// exist, and [`ConfigError::ConfigValidation`] listing every missing
    /// or malformed field, including an unresolvable `git.repository`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_with(
        reader: &dyn DocumentReader,
        root: &SettingsRoot,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let location = root.locate(path)?;
        let document = reader.read(&location)?;
        let config = Self::from_table(document)?;
        info!(
            location = %location.display(),
            repository = config.git.repository(),
            source = %config.git.source(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Validates and converts a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigValidation`] listing every offending
    /// field.
    pub fn from_table(mut document: Table) -> Result<Self> {
        let mut errors = check_document(&document);

        // The repository is resolved exactly once, here.
        let git = match document
            .get("git")
            .and_then(|git| git.get("repository"))
            .and_then(Value::as_str)
        {
            Some(repository) => match GitSettings::new(repository) {
                Ok(git) => Some(git),
                Err(e) => {
                    errors.push(FieldError::new("git.repository", e.to_string()));
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            debug!(count = errors.len(), "configuration failed validation");
            return Err(ConfigError::ConfigValidation { errors });
        }
        let Some(git) = git else {
            return Err(validation_error("git.repository", "missing required field"));
        };

        Ok(Self {
            cli: take_section(&mut document, "cli")?,
            files: take_section(&mut document, "files")?,
            git,
            llm: take_section(&mut document, "llm")?,
            md: take_section(&mut document, "md")?,
            prompts: take_section(&mut document, "prompts")?,
        })
    }

    /// Replaces the repository, re-running resolution.
    ///
    /// On error the current git settings are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if `repository` cannot be resolved.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use readmeai_config::AppConfig;
    ///
    /// # fn example() -> readmeai_config::Result<()> {
    /// let mut config = AppConfig::load_default()?;
    /// config.set_repository("https://gitlab.com/group/project")?;
    /// assert_eq!(config.git.name(), "project");
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_repository(&mut self, repository: &str) -> Result<()> {
        self.git = GitSettings::new(repository)?;
        debug!(repository, source = %self.git.source(), "repository updated");
        Ok(())
    }
}

fn take_section<T: serde::de::DeserializeOwned>(document: &mut Table, name: &str) -> Result<T> {
    let section = document
        .remove(name)
        .ok_or_else(|| validation_error(name, "missing required section"))?;
    section
        .try_into()
        .map_err(|e: toml::de::Error| validation_error(name, &e.to_string()))
}

fn validation_error(field: &str, problem: &str) -> ConfigError {
    ConfigError::ConfigValidation {
        errors: vec![FieldError::new(field, problem)],
    }
}
