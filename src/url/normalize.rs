use crate::UrlError;
use std::fmt;
use std::hash::{Hash, Hasher};
use url::{Position, Url};

/// Schemes a canonical URL may carry
const CRAWLABLE_SCHEMES: &[&str] = &["http", "https"];

/// A URL in canonical form
///
/// The canonical string is the identity used for deduplication: two
/// `CanonicalUrl`s are equal exactly when their strings are equal. The parsed
/// form is kept alongside it for host checks and for resolving relative links
/// found on the page.
#[derive(Debug, Clone)]
pub struct CanonicalUrl {
    canonical: String,
    parsed: Url,
}

impl CanonicalUrl {
    /// The canonical string form
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// The parsed URL (re-parsed from the canonical string)
    pub fn url(&self) -> &Url {
        &self.parsed
    }

    /// Lowercase host of this URL
    pub fn host(&self) -> &str {
        // Canonicalization rejects host-less URLs
        self.parsed.host_str().unwrap_or_default()
    }

    pub fn into_string(self) -> String {
        self.canonical
    }
}

impl PartialEq for CanonicalUrl {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for CanonicalUrl {}

impl Hash for CanonicalUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

/// Canonicalizes an absolute URL
///
/// # Canonicalization Steps
///
/// 1. Reject schemes other than http and https
/// 2. Reject URLs without a host
/// 3. Remove the fragment
/// 4. Remove every trailing slash from the path (`https://example.com/`
///    becomes `https://example.com`)
/// 5. Keep the query verbatim
///
/// Canonicalizing an already-canonical URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemapper::url::canonicalize;
///
/// let url = Url::parse("https://example.com/docs/#intro").unwrap();
/// assert_eq!(canonicalize(&url).unwrap().as_str(), "https://example.com/docs");
/// ```
pub fn canonicalize(url: &Url) -> Result<CanonicalUrl, UrlError> {
    if !CRAWLABLE_SCHEMES.contains(&url.scheme()) {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    let mut canonical = String::with_capacity(url.as_str().len());
    canonical.push_str(&url[..Position::BeforePath]);
    canonical.push_str(url.path().trim_end_matches('/'));
    if let Some(query) = url.query() {
        canonical.push('?');
        canonical.push_str(query);
    }

    let parsed = Url::parse(&canonical).map_err(|e| UrlError::Malformed(e.to_string()))?;

    Ok(CanonicalUrl { canonical, parsed })
}

/// Resolves a raw href found on `base` and canonicalizes the result
///
/// A missing scheme or host is taken from the referring page, following
/// standard reference resolution (`/a`, `a`, `//host/a`, `?q` all work).
///
/// # Errors
///
/// * `UrlError::Parse` - the href cannot be resolved against the base
/// * `UrlError::InvalidScheme` - the link points at a non-HTTP resource
///   (`mailto:`, `javascript:`, ...)
pub fn resolve_link(base: &CanonicalUrl, href: &str) -> Result<CanonicalUrl, UrlError> {
    let joined = base
        .url()
        .join(href.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;
    canonicalize(&joined)
}

/// Parses the seed URL given on the command line or in the config file
///
/// A seed without a scheme (`example.com/docs`) gets `default_scheme`.
///
/// # Examples
///
/// ```
/// use sitemapper::url::parse_seed;
///
/// let seed = parse_seed("example.com", "https").unwrap();
/// assert_eq!(seed.as_str(), "https://example.com");
/// ```
pub fn parse_seed(raw: &str, default_scheme: &str) -> Result<CanonicalUrl, UrlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Parse("seed URL is empty".to_string()));
    }

    if !CRAWLABLE_SCHEMES.contains(&default_scheme) {
        return Err(UrlError::InvalidScheme(default_scheme.to_string()));
    }

    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("{}://{}", default_scheme, raw)
    };

    let url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;
    canonicalize(&url)
}
