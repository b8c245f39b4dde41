use crate::{UrlError, UrlResult};

/// Removes a leading `http://` or `https://` from `url`, if present
pub fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Derives the run's target name from the operator's input URL
///
/// The scheme prefix is stripped and everything from the first `/` on is
/// dropped, so the name is the host segment (including any port). No other
/// format checks are applied.
///
/// # Examples
///
/// ```
/// use webclone::url::target_name;
///
/// assert_eq!(target_name("https://example.com/path").unwrap(), "example.com");
/// assert_eq!(target_name("example.com").unwrap(), "example.com");
/// assert_eq!(target_name("http://127.0.0.1:8080/").unwrap(), "127.0.0.1:8080");
/// ```
pub fn target_name(url: &str) -> UrlResult<String> {
    let host = strip_scheme(url).split('/').next().unwrap_or_default();

    if host.is_empty() {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    Ok(host.to_string())
}
