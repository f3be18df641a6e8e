//! Configuration core for readme-ai.
//!
//! This crate loads the primary settings document, classifies the configured
//! repository against the supported Git hosting services, and merges the
//! auxiliary lookup tables the rest of the application relies on.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`service`]: Registry of supported Git hosting services
//! - [`repository`]: Repository reference resolution (local path or URL)
//! - [`remote`]: Browsable URLs for files in a repository
//! - [`config`]: The typed primary settings document and its loader
//! - [`schema`]: Required sections and fields of the primary document
//! - [`helper`]: Merging of the auxiliary lookup tables
//! - [`persistence`]: Settings root lookup and TOML document reading
//! - [`error`]: Error types for configuration operations
//!
//! # Settings Documents
//!
//! Relative document paths resolve against the settings root, which is
//! `READMEAI_SETTINGS_DIR` if set and the `settings/` directory shipped with
//! this crate otherwise. The primary document (`config.toml`) names four
//! auxiliary documents which are merged in order:
//!
//! ```toml
//! [files]
//! dependency_files = "dependency_files.toml"
//! ignore_files = "ignore_files.toml"
//! language_names = "language_names.toml"
//! language_setup = "language_setup.toml"
//! ```
//!
//! # Repository Format
//!
//! `git.repository` is either an existing local directory or an `https` URL
//! on GitHub, GitLab or Bitbucket. The service and the repository name are
//! derived from it and never read from the document.
//!
//! # Examples
//!
//! Loading configuration:
//!
//! ```no_run
//! use readmeai_config::{AppConfig, ConfigHelper};
//!
//! # fn example() -> readmeai_config::Result<()> {
//! let config = AppConfig::load_default()?;
//! let helper = ConfigHelper::load(config)?;
//!
//! println!("Repository: {}", helper.conf.git.name());
//! println!("Known manifests: {}", helper.tables.dependency_files.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod helper;
pub mod persistence;
pub mod remote;
pub mod repository;
pub mod schema;
pub mod service;

// Re-export primary types at crate root for convenience
pub use config::{
    AppConfig, CliSettings, FileSettings, GitSettings, LlmApiSettings, MarkdownSettings,
    PromptSettings,
};
pub use error::{ConfigError, FieldError, Result};
pub use helper::{AuxiliaryConfig, ConfigHelper};
pub use persistence::{DocumentReader, SettingsRoot, TomlReader};
pub use remote::remote_file_url;
pub use repository::RepositoryReference;
pub use service::GitService;
