//! URL handling module for sitemapper
//!
//! This module provides seed parsing, link resolution, canonicalization, and
//! the host scope policy applied when a crawl is restricted to its root site.

mod domain;
mod matcher;
mod normalize;

use serde::Deserialize;

// Re-export main functions
pub use domain::site_domain;
pub use matcher::matches_domain;
pub use normalize::{canonicalize, parse_seed, resolve_link, CanonicalUrl};

/// Policy deciding which hosts belong to the seed's site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScopePolicy {
    /// Only the seed's exact host
    SameHost,
    /// The seed's domain and all of its subdomains
    #[default]
    SameDomain,
    /// Any URL whose full string contains the seed host
    ///
    /// Legacy behavior: it lets `https://other.com/example.com` through and
    /// is kept only for parity with older crawl outputs.
    Contains,
}

impl ScopePolicy {
    /// Returns true if `candidate` is inside the crawl scope of `seed`
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemapper::url::{parse_seed, ScopePolicy};
    ///
    /// let seed = parse_seed("https://example.com", "https").unwrap();
    /// let docs = parse_seed("https://docs.example.com/a", "https").unwrap();
    ///
    /// assert!(ScopePolicy::SameDomain.allows(&seed, &docs));
    /// assert!(!ScopePolicy::SameHost.allows(&seed, &docs));
    /// ```
    pub fn allows(&self, seed: &CanonicalUrl, candidate: &CanonicalUrl) -> bool {
        match self {
            Self::SameHost => candidate.host() == seed.host(),
            Self::SameDomain => matches_domain(site_domain(seed.host()), candidate.host()),
            Self::Contains => candidate.as_str().contains(seed.host()),
        }
    }
}
