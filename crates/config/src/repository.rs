//! Repository reference resolution.
//!
//! This module provides the [`RepositoryReference`] type, built from a raw
//! repository string that is either:
//!
//! - An existing local directory, classified as [`GitService::Local`]
//! - An `https` URL whose host contains a registered service host
//!
//! Resolution runs as an ordered pipeline. The repository string is validated
//! once, and the source and name are then derived from the validated form
//! rather than by re-parsing the raw input.
//!
//! # Examples
//!
//! ```
//! use readmeai_config::{GitService, RepositoryReference};
//!
//! let repo = RepositoryReference::resolve("https://github.com/eli64s/readme-ai.git").unwrap();
//! assert_eq!(repo.source(), GitService::GitHub);
//! assert_eq!(repo.name(), "readme-ai");
//! assert_eq!(repo.full_name(), Some("eli64s/readme-ai"));
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use url::{Position, Url};

use crate::error::{ConfigError, Result};
use crate::service::GitService;

/// Suffix stripped from repository names.
const GIT_SUFFIX: &str = ".git";

/// A validated repository reference with its derived metadata.
///
/// Only obtainable through [`RepositoryReference::resolve`], so the source
/// is always a registered [`GitService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryReference {
    repository: String,
    source: GitService,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
}

/// The repository string after validation.
#[derive(Debug)]
enum Validated<'a> {
    Local(&'a Path),
    Remote(Url),
}

impl RepositoryReference {
    /// Resolves a repository string into a reference.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRepositoryReference`] if the string is
    /// not an existing directory and not an `https` URL on a registered
    /// host, or if the URL has no repository name in its path.
    ///
    /// # Examples
    ///
    /// ```
    /// use readmeai_config::RepositoryReference;
    ///
    /// assert!(RepositoryReference::resolve("https://gitlab.com/group/project").is_ok());
    /// assert!(RepositoryReference::resolve("http://github.com/owner/repo").is_err());
    /// assert!(RepositoryReference::resolve("https://example.com/owner/repo").is_err());
    /// ```
    pub fn resolve(repository: &str) -> Result<Self> {
        let validated = validate_repository(repository)?;
        let source = derive_source(repository, &validated)?;
        let name = derive_name(repository, &validated)?;
        let full_name = derive_full_name(&validated);

        debug!(repository, source = %source, name = %name, "resolved repository reference");

        Ok(Self {
            repository: repository.to_string(),
            source,
            name,
            full_name,
        })
    }

    /// Returns the repository string as supplied.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the Git service hosting the repository.
    #[must_use]
    pub fn source(&self) -> GitService {
        self.source
    }

    /// Returns the repository name, without any `.git` suffix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `owner/name` for remote repositories.
    ///
    /// `None` for local repositories and URLs with a single path segment.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// Returns whether the repository lives on the local filesystem.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.source.is_local()
    }

    /// Builds the browsable URL of a file in this repository.
    #[must_use]
    pub fn file_url(&self, full_name: &str, file_path: &str) -> String {
        self.source.file_url(full_name, file_path)
    }
}

impl<'de> Deserialize<'de> for RepositoryReference {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repository = String::deserialize(deserializer)?;
        Self::resolve(&repository).map_err(serde::de::Error::custom)
    }
}

fn validate_repository(repository: &str) -> Result<Validated<'_>> {
    let path = Path::new(repository);
    if path.is_dir() {
        return Ok(Validated::Local(path));
    }

    let url = Url::parse(repository)
        .map_err(|e| ConfigError::invalid_repository(repository, e.to_string()))?;

    if url.scheme() != "https" {
        return Err(ConfigError::invalid_repository(
            repository,
            format!("expected an https URL, got scheme '{}'", url.scheme()),
        ));
    }

    if GitService::match_netloc(netloc(&url)).is_none() {
        return Err(ConfigError::invalid_repository(
            repository,
            "host is not a supported Git service",
        ));
    }

    Ok(Validated::Remote(url))
}

fn derive_source(repository: &str, validated: &Validated<'_>) -> Result<GitService> {
    match validated {
        Validated::Local(_) => Ok(GitService::Local),
        Validated::Remote(url) => GitService::match_netloc(netloc(url)).ok_or_else(|| {
            ConfigError::UnsupportedGitService {
                repository: repository.to_string(),
            }
        }),
    }
}

fn derive_name(repository: &str, validated: &Validated<'_>) -> Result<String> {
    match validated {
        Validated::Local(path) => Ok(local_name(path)),
        Validated::Remote(url) => path_segments(url)
            .last()
            .map(|segment| strip_git_suffix(segment).to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                ConfigError::invalid_repository(repository, "URL has no repository name")
            }),
    }
}

fn derive_full_name(validated: &Validated<'_>) -> Option<String> {
    let Validated::Remote(url) = validated else {
        return None;
    };
    let segments = path_segments(url);
    match segments.as_slice() {
        [.., owner, name] => Some(format!("{owner}/{}", strip_git_suffix(name))),
        _ => None,
    }
}

/// Final component of a local directory, canonicalizing for `.` and `..`.
///
/// Empty for the filesystem root.
fn local_name(path: &Path) -> String {
    let name = match path.file_name() {
        Some(name) => Some(name.to_os_string()),
        None => std::fs::canonicalize(path)
            .ok()
            .and_then(|canonical| canonical.file_name().map(ToOwned::to_owned)),
    };
    name.map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}

/// The URL's network location: userinfo, host and port.
fn netloc(url: &Url) -> &str {
    &url[Position::BeforeUsername..Position::AfterPort]
}

fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// Strips exactly one trailing `.git`.
fn strip_git_suffix(name: &str) -> &str {
    name.strip_suffix(GIT_SUFFIX).unwrap_or(name)
}
