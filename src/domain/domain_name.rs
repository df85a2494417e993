//! DomainName value object.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)*$",
    )
    .expect("static domain pattern compiles")
});

/// A company web domain in canonical form (`example.com`).
///
/// # Example
///
/// ```
/// use twenty_sync::domain::DomainName;
///
/// let domain = DomainName::normalize("https://www.Example.com/path").unwrap();
/// assert_eq!(domain.as_str(), "example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName(String);

impl DomainName {
    /// Normalize a domain or URL.
    ///
    /// Trims, lowercases, strips an `http://`/`https://` scheme and a leading
    /// `www.`, then drops everything from the first `/`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDomain` when what remains is not a
    /// syntactically valid host name.
    pub fn normalize(raw: &str) -> Result<Self, ValidationError> {
        let lowered = raw.trim().to_lowercase();
        let without_scheme = lowered
            .strip_prefix("https://")
            .or_else(|| lowered.strip_prefix("http://"))
            .unwrap_or(&lowered);
        let without_www = without_scheme
            .strip_prefix("www.")
            .unwrap_or(without_scheme);
        let host = without_www.split('/').next().unwrap_or_default();

        if !DOMAIN_PATTERN.is_match(host) {
            return Err(ValidationError::InvalidDomain(raw.to_string()));
        }

        Ok(Self(host.to_string()))
    }

    /// Get the domain as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a stored link (any form) normalizes to this domain.
    pub fn matches(&self, stored: &str) -> bool {
        Self::normalize(stored).map(|d| d == *self).unwrap_or(false)
    }
}

/// Turn a user-supplied domain into the URL form stored on companies.
pub fn to_link_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_url() {
        let domain = DomainName::normalize("https://www.Example.com/path").unwrap();
        assert_eq!(domain.as_str(), "example.com");
    }

    #[test]
    fn test_normalize_variants() {
        assert_eq!(DomainName::normalize("acme.com").unwrap().as_str(), "acme.com");
        assert_eq!(
            DomainName::normalize("http://acme.com/").unwrap().as_str(),
            "acme.com"
        );
        assert_eq!(
            DomainName::normalize(" WWW.Sub.Acme.io ").unwrap().as_str(),
            "sub.acme.io"
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(DomainName::normalize("").is_err());
        assert!(DomainName::normalize("https://").is_err());
        assert!(DomainName::normalize("not a domain").is_err());
        assert!(DomainName::normalize("-acme.com").is_err());
    }

    #[test]
    fn test_matches_stored_link() {
        let domain = DomainName::normalize("acme.com").unwrap();
        assert!(domain.matches("https://www.acme.com"));
        assert!(!domain.matches("https://acme.co"));
        assert!(!domain.matches(""));
    }

    #[test]
    fn test_to_link_url() {
        assert_eq!(to_link_url("acme.com"), "https://acme.com");
        assert_eq!(to_link_url("http://acme.com"), "http://acme.com");
    }
}
