//! Small text helpers shared by the page renderer and notification bodies.

/// Escapes text for use in HTML bodies and quoted attributes.
///
/// # Example
///
/// ```
/// use shopdesk::core::utils::html_escape;
///
/// assert_eq!(html_escape("Tom & Jerry <3"), "Tom &amp; Jerry &lt;3");
/// ```
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
