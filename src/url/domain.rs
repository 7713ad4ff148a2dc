/// Returns the site domain for a seed host
///
/// A leading `www.` is dropped so that a crawl seeded at `www.example.com`
/// still treats `example.com` and `docs.example.com` as part of the site.
///
/// # Examples
///
/// ```
/// use sitemapper::url::site_domain;
///
/// assert_eq!(site_domain("www.example.com"), "example.com");
/// assert_eq!(site_domain("docs.example.com"), "docs.example.com");
/// ```
pub fn site_domain(host: &str) -> &str {
    match host.strip_prefix("www.") {
        Some(rest) if rest.contains('.') => rest,
        _ => host,
    }
}
