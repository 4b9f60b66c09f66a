//! URL helpers and platform classification.

use brandlens_core::Platform;
use reqwest::Url;

use crate::error::ScraperError;

/// Path segments that identify share or intent endpoints rather than profiles.
const SHARE_INTENT_SEGMENTS: &[&str] = &[
    "sharer",
    "sharer.php",
    "share",
    "share.php",
    "sharing",
    "sharearticle",
    "intent",
    "dialog",
    "plugins",
];

fn parse_lenient(url: &str) -> Option<Url> {
    let trimmed = url.trim();
    match Url::parse(trimmed) {
        Ok(parsed) if parsed.host_str().is_some() => Some(parsed),
        _ if !trimmed.contains("://") => Url::parse(&format!("https://{trimmed}")).ok(),
        _ => None,
    }
}

/// Lowercased hostname of `url`, without scheme, port, or path.
///
/// Scheme-less input such as `www.example.com/about` is accepted.
#[must_use]
pub fn extract_domain(url: &str) -> Option<String> {
    parse_lenient(url)
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .filter(|h| !h.is_empty())
}

/// `host[:port]` of `url`, lowercased. The orchestrator uses this as its
/// one-profile-per-domain key.
#[must_use]
pub fn authority(url: &str) -> Option<String> {
    let parsed = parse_lenient(url)?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}

fn host_matches_domain(host: &str, domain: &str) -> bool {
    host == domain || host.strip_suffix(domain).is_some_and(|rest| rest.ends_with('.'))
}

/// Identify the platform serving `url`.
///
/// Checks run in a fixed order across [`Platform::ALL`]: exact host match
/// against the domain table, then subdomain suffix match
/// (`business.facebook.com`), then a substring match on the platform id.
#[must_use]
pub fn detect_platform(url: &str) -> Option<Platform> {
    let host = extract_domain(url)?;
    let bare = host.strip_prefix("www.").unwrap_or(&host);

    if let Some(p) = Platform::ALL
        .into_iter()
        .find(|p| p.domains().contains(&bare))
    {
        return Some(p);
    }

    if let Some(p) = Platform::ALL
        .into_iter()
        .find(|p| p.domains().iter().any(|d| host_matches_domain(&host, d)))
    {
        return Some(p);
    }

    Platform::ALL.into_iter().find(|p| host.contains(p.id()))
}

/// Stricter classification used for links found on a page.
///
/// Accepts exact or subdomain matches, or a host label equal to the
/// platform id (`pinterest.co.uk`). Share and intent endpoints are rejected
/// because they point at a sharing dialog, not an account.
#[must_use]
pub fn classify_social_link(url: &str) -> Option<Platform> {
    let parsed = parse_lenient(url)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?.to_ascii_lowercase();
    if is_share_intent(&parsed) {
        return None;
    }

    Platform::ALL.into_iter().find(|p| {
        p.domains().iter().any(|d| host_matches_domain(&host, d))
            || host.split('.').any(|label| label == p.id())
    })
}

fn is_share_intent(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    path.starts_with("/pin/create")
        || path
            .split('/')
            .any(|segment| SHARE_INTENT_SEGMENTS.contains(&segment))
}

/// Resolve `href` against `base`, rejecting non-navigational links.
///
/// Returns `None` for `javascript:`, `mailto:`, `tel:`, `data:` and
/// fragment-only hrefs, and for anything that does not resolve to http(s).
#[must_use]
pub fn normalize_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let resolved = base.join(href).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// Strip query string, fragment and trailing slash. Used as a dedup key.
#[must_use]
pub fn clean_url(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(parsed) if parsed.host_str().is_some() => {
            let host = parsed.host_str().unwrap_or_default();
            let port = parsed.port().map(|p| format!(":{p}")).unwrap_or_default();
            let path = parsed.path().trim_end_matches('/');
            format!("{}://{host}{port}{path}", parsed.scheme())
        }
        _ => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string(),
    }
}

/// Normalise user input into an absolute http(s) URL, prefixing `https://`
/// when no scheme is given.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] for empty input, unparseable input,
/// non-http(s) schemes, or URLs without a host.
pub fn normalize_input_url(raw: &str) -> Result<Url, ScraperError> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| ScraperError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("URL is empty"));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("only http and https URLs are supported"));
    }
    match parsed.host_str() {
        Some(host) if host.contains('.') || host == "localhost" || parsed.port().is_some() => {
            Ok(parsed)
        }
        _ => Err(invalid("URL has no usable host")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_domain_lowercases_and_drops_path() {
        assert_eq!(
            extract_domain("https://WWW.Example.com/about?x=1").as_deref(),
            Some("www.example.com")
        );
        assert_eq!(
            extract_domain("example.com/path").as_deref(),
            Some("example.com")
        );
        assert_eq!(extract_domain(""), None);
    }

    #[test]
    fn detect_platform_known_hosts() {
        let cases = [
            ("https://www.instagram.com/acme", Platform::Instagram),
            ("https://business.facebook.com/acme", Platform::Facebook),
            ("https://m.twitter.com/acme", Platform::Twitter),
            ("https://youtu.be/xyz", Platform::Youtube),
            ("https://x.com/acme", Platform::Twitter),
            ("https://www.linkedin.com/company/acme", Platform::Linkedin),
            ("https://pinterest.co.uk/acme", Platform::Pinterest),
        ];
        for (url, expected) in cases {
            assert_eq!(detect_platform(url), Some(expected), "{url}");
        }
    }

    #[test]
    fn detect_platform_unknown_host() {
        assert_eq!(detect_platform("https://example.com"), None);
        assert_eq!(detect_platform("not a url at all"), None);
    }

    #[test]
    fn detect_platform_does_not_confuse_suffix_lookalikes() {
        // "notx.com" ends with "x.com" but is not a subdomain of it.
        assert_eq!(detect_platform("https://notx.com/acme"), None);
    }

    #[test]
    fn classify_rejects_share_intents() {
        assert_eq!(
            classify_social_link("https://www.facebook.com/sharer/sharer.php?u=x"),
            None
        );
        assert_eq!(
            classify_social_link("https://twitter.com/intent/tweet?text=hi"),
            None
        );
        assert_eq!(
            classify_social_link("https://www.linkedin.com/shareArticle?mini=true"),
            None
        );
        assert_eq!(
            classify_social_link("https://pinterest.com/pin/create/button/?url=x"),
            None
        );
        assert_eq!(
            classify_social_link("https://twitter.com/acme"),
            Some(Platform::Twitter)
        );
        assert_eq!(
            classify_social_link("https://instagram.com/sharewell"),
            Some(Platform::Instagram)
        );
    }

    #[test]
    fn classify_requires_label_match_not_substring() {
        assert_eq!(classify_social_link("https://mediumrare.example/"), None);
        assert_eq!(
            classify_social_link("https://acme.medium.com/"),
            Some(Platform::Medium)
        );
    }

    #[test]
    fn normalize_url_resolves_relative_and_rejects_pseudo_schemes() {
        let base = Url::parse("https://acme.com/shop/").unwrap();
        assert_eq!(
            normalize_url(&base, "/about").as_deref(),
            Some("https://acme.com/about")
        );
        assert_eq!(
            normalize_url(&base, "'https://facebook.com/acme'").as_deref(),
            Some("https://facebook.com/acme")
        );
        for href in ["javascript:void(0)", "mailto:a@b.c", "tel:123", "#top", "data:text/plain,x", ""] {
            assert_eq!(normalize_url(&base, href), None, "{href}");
        }
    }

    #[test]
    fn clean_url_strips_query_and_fragment() {
        assert_eq!(
            clean_url("https://facebook.com/acme/?utm=1#posts"),
            "https://facebook.com/acme"
        );
        assert_eq!(clean_url("https://acme.com"), "https://acme.com");
        assert_eq!(clean_url("not a url?x"), "not a url");
    }

    #[test]
    fn authority_includes_explicit_port() {
        assert_eq!(authority("http://127.0.0.1:8080/a").as_deref(), Some("127.0.0.1:8080"));
        assert_eq!(authority("https://Facebook.com/a").as_deref(), Some("facebook.com"));
    }

    #[test]
    fn normalize_input_url_prefixes_scheme() {
        assert_eq!(
            normalize_input_url("acme.com").unwrap().as_str(),
            "https://acme.com/"
        );
        assert_eq!(
            normalize_input_url("  http://acme.com/x ").unwrap().as_str(),
            "http://acme.com/x"
        );
    }

    #[test]
    fn normalize_input_url_rejects_bad_input() {
        for raw in ["", "   ", "ftp://acme.com", "https://", "nohost"] {
            assert!(
                matches!(normalize_input_url(raw), Err(ScraperError::InvalidUrl { .. })),
                "{raw:?}"
            );
        }
    }
}
