use super::domain::strip_scheme;

/// Characters that are not allowed in a snapshot file name
const RESERVED: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Extension given to every downloaded link
const LINK_EXTENSION: &str = ".html";

/// Turns a URL into a filesystem-safe name
///
/// A leading `http://`/`https://` is removed, then every character in
/// `/ \ : * ? " < > |` is replaced by `_`.
///
/// # Examples
///
/// ```
/// use webclone::url::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("https://a.com/x:y?z"), "a.com_x_y_z");
/// ```
pub fn sanitize_file_name(url: &str) -> String {
    strip_scheme(url)
        .chars()
        .map(|c| if RESERVED.contains(&c) { '_' } else { c })
        .collect()
}

/// File name a downloaded link is stored under inside the run directory
pub fn link_file_name(url: &str) -> String {
    format!("{}{}", sanitize_file_name(url), LINK_EXTENSION)
}
