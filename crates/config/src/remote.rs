//! Browsable URLs for files in a repository.

use crate::error::Result;
use crate::repository::RepositoryReference;

/// Returns the URL where `file_path` can be viewed on the repository's host.
///
/// `repository` is resolved first, so the same errors as
/// [`RepositoryReference::resolve`] apply. Local repositories return
/// `file_path` unchanged.
///
/// # Errors
///
/// Returns an error if `repository` cannot be resolved.
///
/// # Examples
///
/// ```
/// use readmeai_config::remote::remote_file_url;
///
/// let url = remote_file_url(
///     "readmeai/main.py",
///     "eli64s/readme-ai",
///     "https://github.com/eli64s/readme-ai",
/// )
/// .unwrap();
/// assert_eq!(url, "https://github.com/eli64s/readme-ai/blob/main/readmeai/main.py");
/// ```
pub fn remote_file_url(file_path: &str, full_name: &str, repository: &str) -> Result<String> {
    let reference = RepositoryReference::resolve(repository)?;
    Ok(reference.file_url(full_name, file_path))
}
