//! Registry of supported Git hosting services.
//!
//! This module provides the [`GitService`] type, a fixed and ordered set of
//! hosting services. Each service carries its host string, an optional API
//! base URL, and the template used to build browsable file URLs.
//!
//! # Matching
//!
//! Network locations are matched by substring containment, so any host that
//! contains `github.com` (for example `api.github.com`) classifies as
//! [`GitService::GitHub`]. The first service in [`GitService::ALL`] order
//! wins; more specific hosts must come before more general ones.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Host sentinel used for repositories on the local filesystem.
///
/// Contains no dot, so it can never collide with a network host.
pub const LOCAL_HOST: &str = "local";

/// A supported Git hosting service.
///
/// # Examples
///
/// ```
/// use readmeai_config::GitService;
///
/// let service = GitService::match_netloc("github.com").unwrap();
/// assert_eq!(service, GitService::GitHub);
/// assert_eq!(service.host(), "github.com");
/// assert_eq!(service.branch(), Some("main"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitService {
    /// A repository on the local filesystem.
    Local,
    /// GitHub (`github.com`).
    GitHub,
    /// GitLab (`gitlab.com`).
    GitLab,
    /// Bitbucket (`bitbucket.org`).
    Bitbucket,
}

impl GitService {
    /// Every registered service, in matching order.
    pub const ALL: [GitService; 4] = [
        GitService::Local,
        GitService::GitHub,
        GitService::GitLab,
        GitService::Bitbucket,
    ];

    /// Returns the host string identifying this service.
    #[must_use]
    pub const fn host(self) -> &'static str {
        match self {
            Self::Local => LOCAL_HOST,
            Self::GitHub => "github.com",
            Self::GitLab => "gitlab.com",
            Self::Bitbucket => "bitbucket.org",
        }
    }

    /// Returns the base URL of the service's repository API, if any.
    #[must_use]
    pub const fn api_url(self) -> Option<&'static str> {
        match self {
            Self::Local => None,
            Self::GitHub => Some("https://api.github.com/repos/"),
            Self::GitLab => Some("https://api.gitlab.com/v4/projects/"),
            Self::Bitbucket => Some("https://api.bitbucket.org/2.0/repositories/"),
        }
    }

    /// Returns the file URL template.
    ///
    /// Templates contain `{full_name}` and `{file_path}` placeholders; the
    /// local template only contains `{file_path}`.
    #[must_use]
    pub const fn file_url_template(self) -> &'static str {
        match self {
            Self::Local => "{file_path}",
            Self::GitHub => "https://github.com/{full_name}/blob/main/{file_path}",
            Self::GitLab => "https://gitlab.com/{full_name}/-/blob/master/{file_path}",
            Self::Bitbucket => "https://bitbucket.org/{full_name}/src/master/{file_path}",
        }
    }

    /// Returns the default branch used in file URLs.
    #[must_use]
    pub const fn branch(self) -> Option<&'static str> {
        match self {
            Self::Local => None,
            Self::GitHub => Some("main"),
            Self::GitLab | Self::Bitbucket => Some("master"),
        }
    }

    /// Returns the host without its domain suffix, e.g. `github`.
    ///
    /// # Examples
    ///
    /// ```
    /// use readmeai_config::GitService;
    ///
    /// assert_eq!(GitService::Bitbucket.clean_hostname(), "bitbucket");
    /// assert_eq!(GitService::Local.clean_hostname(), "local");
    /// ```
    #[must_use]
    pub fn clean_hostname(self) -> &'static str {
        let host = self.host();
        host.split('.').next().unwrap_or(host)
    }

    /// Returns whether this is the local filesystem pseudo-service.
    #[must_use]
    pub const fn is_local(self) -> bool {
        matches!(self, Self::Local)
    }

    /// Finds the first network service whose host is contained in `netloc`.
    ///
    /// [`GitService::Local`] is never returned; local repositories are only
    /// recognised by the directory check in the resolver.
    ///
    /// # Examples
    ///
    /// ```
    /// use readmeai_config::GitService;
    ///
    /// assert_eq!(GitService::match_netloc("api.github.com"), Some(GitService::GitHub));
    /// assert_eq!(GitService::match_netloc("example.com"), None);
    /// ```
    #[must_use]
    pub fn match_netloc(netloc: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|service| !service.is_local())
            .find(|service| netloc.contains(service.host()))
    }

    /// Looks up a service by its exact host string.
    #[must_use]
    pub fn from_host(host: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|service| service.host() == host)
    }

    /// Returns the API URL for a repository, e.g.
    /// `https://api.github.com/repos/owner/repo`.
    #[must_use]
    pub fn api_repo_url(self, full_name: &str) -> Option<String> {
        self.api_url().map(|base| format!("{base}{full_name}"))
    }

    /// Renders the file URL template.
    ///
    /// # Examples
    ///
    /// ```
    /// use readmeai_config::GitService;
    ///
    /// assert_eq!(
    ///     GitService::GitLab.file_url("group/project", "src/lib.rs"),
    ///     "https://gitlab.com/group/project/-/blob/master/src/lib.rs",
    /// );
    /// assert_eq!(GitService::Local.file_url("ignored/name", "src/lib.rs"), "src/lib.rs");
    /// ```
    #[must_use]
    pub fn file_url(self, full_name: &str, file_path: &str) -> String {
        self.file_url_template()
            .replace("{full_name}", full_name)
            .replace("{file_path}", file_path)
    }
}

impl fmt::Display for GitService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host())
    }
}

impl Serialize for GitService {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.host())
    }
}

impl<'de> Deserialize<'de> for GitService {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let host = String::deserialize(deserializer)?;
        Self::from_host(&host)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown Git service host '{host}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosts_are_unique_and_non_empty() {
        for (i, a) in GitService::ALL.iter().enumerate() {
            assert!(!a.host().is_empty());
            for b in &GitService::ALL[i + 1..] {
                assert_ne!(a.host(), b.host());
            }
        }
    }

    #[test]
    fn local_sentinel_is_not_a_network_host() {
        assert!(!LOCAL_HOST.contains('.'));
        assert!(GitService::Local.api_url().is_none());
        assert!(GitService::Local.branch().is_none());
    }

    #[test]
    fn match_netloc_uses_substring_containment() {
        assert_eq!(GitService::match_netloc("github.com"), Some(GitService::GitHub));
        assert_eq!(GitService::match_netloc("www.github.com"), Some(GitService::GitHub));
        assert_eq!(GitService::match_netloc("gitlab.com"), Some(GitService::GitLab));
        assert_eq!(
            GitService::match_netloc("bitbucket.org"),
            Some(GitService::Bitbucket)
        );
        assert_eq!(GitService::match_netloc("codeberg.org"), None);
    }

    #[test]
    fn match_netloc_never_returns_local() {
        assert_eq!(GitService::match_netloc("local"), None);
        assert_eq!(GitService::match_netloc("localhost"), None);
        assert_eq!(
            GitService::match_netloc("gitlab.com.local"),
            Some(GitService::GitLab)
        );
    }

    #[test]
    fn match_netloc_first_match_wins() {
        // Contains both hosts; registry order puts GitHub first.
        assert_eq!(
            GitService::match_netloc("github.com.gitlab.com"),
            Some(GitService::GitHub)
        );
    }

    #[test]
    fn from_host_is_exact() {
        assert_eq!(GitService::from_host("gitlab.com"), Some(GitService::GitLab));
        assert_eq!(GitService::from_host("local"), Some(GitService::Local));
        assert_eq!(GitService::from_host("api.gitlab.com"), None);
    }

    #[test]
    fn branch_conventions() {
        assert_eq!(GitService::GitHub.branch(), Some("main"));
        assert_eq!(GitService::GitLab.branch(), Some("master"));
        assert_eq!(GitService::Bitbucket.branch(), Some("master"));
    }

    #[test]
    fn file_url_templates() {
        assert_eq!(
            GitService::GitHub.file_url("eli64s/readme-ai", "readmeai/main.py"),
            "https://github.com/eli64s/readme-ai/blob/main/readmeai/main.py"
        );
        assert_eq!(
            GitService::Bitbucket.file_url("team/repo", "README.md"),
            "https://bitbucket.org/team/repo/src/master/README.md"
        );
    }

    #[test]
    fn api_repo_url() {
        assert_eq!(
            GitService::GitHub.api_repo_url("eli64s/readme-ai").as_deref(),
            Some("https://api.github.com/repos/eli64s/readme-ai")
        );
        assert!(GitService::Local.api_repo_url("a/b").is_none());
    }

    #[test]
    fn clean_hostname() {
        assert_eq!(GitService::GitHub.clean_hostname(), "github");
        assert_eq!(GitService::GitLab.clean_hostname(), "gitlab");
    }

    #[test]
    fn serialize_as_host() {
        let json = serde_json::to_string(&GitService::GitLab).unwrap();
        assert_eq!(json, r#""gitlab.com""#);

        let parsed: GitService = serde_json::from_str(r#""bitbucket.org""#).unwrap();
        assert_eq!(parsed, GitService::Bitbucket);

        assert!(serde_json::from_str::<GitService>(r#""example.com""#).is_err());
    }
}
