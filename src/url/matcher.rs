/// Checks if a host equals a base domain or is one of its subdomains
///
/// Matching is on whole labels, so `notexample.com` does not match
/// `example.com`.
///
/// # Examples
///
/// ```
/// use sitemapper::url::matches_domain;
///
/// assert!(matches_domain("example.com", "example.com"));
/// assert!(matches_domain("example.com", "blog.example.com"));
/// assert!(!matches_domain("example.com", "myexample.com"));
/// assert!(!matches_domain("blog.example.com", "example.com"));
/// ```
pub fn matches_domain(base: &str, candidate: &str) -> bool {
    if base.is_empty() {
        return false;
    }
    candidate == base || candidate.ends_with(&format!(".{}", base))
}
