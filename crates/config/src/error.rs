//! Error types for configuration operations.
//!
//! This module defines the error types that can occur while resolving
//! repository references, locating settings documents, and validating or
//! merging their contents.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The repository is neither an existing directory nor a supported
    /// HTTPS URL.
    #[error("invalid repository URL or path '{repository}': {reason}")]
    InvalidRepositoryReference {
        /// The repository string as supplied by the user.
        repository: String,
        /// Why the reference was rejected.
        reason: String,
    },

    /// The repository passed URL validation but matched no registered
    /// Git service.
    #[error("unsupported Git service for repository '{repository}'")]
    UnsupportedGitService {
        /// The repository string as supplied by the user.
        repository: String,
    },

    /// A settings document does not exist at its resolved location.
    #[error("config file not found: {}", .path.display())]
    ConfigFileNotFound {
        /// The resolved location that was checked.
        path: PathBuf,
    },

    /// A document does not match the expected schema.
    ///
    /// Every offending field is reported, not just the first one.
    #[error("invalid configuration ({} error(s)): {}", .errors.len(), FieldErrors(.errors))]
    ConfigValidation {
        /// All fields that failed validation.
        errors: Vec<FieldError>,
    },

    /// Failed to read a settings document.
    #[error("failed to read config file at {}: {source}", .path.display())]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A settings document is not valid TOML.
    #[error("failed to parse config file at {}: {source}", .path.display())]
    ParseToml {
        /// The path of the malformed document.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// Builds an [`ConfigError::InvalidRepositoryReference`].
    pub(crate) fn invalid_repository(repository: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRepositoryReference {
            repository: repository.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the field errors if this is a validation failure.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::ConfigValidation { errors } => errors.as_slice(),
            _ => &[],
        }
    }
}

/// A single field that failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted location of the field, e.g. `llm.rate_limit`.
    pub field: String,
    /// What is wrong with it.
    pub problem: String,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(field: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            problem: problem.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

/// Joins field errors for the validation error message.
struct FieldErrors<'a>(&'a [FieldError]);

impl fmt::Display for FieldErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
