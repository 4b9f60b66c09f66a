//! Social-profile link discovery on a brand's homepage.
//!
//! Several independent strategies run in a fixed order over the parsed page.
//! The first strategy to find a platform wins; later finds for the same
//! platform are ignored. A strategy that finds nothing simply contributes
//! nothing.

use std::collections::HashSet;
use std::sync::LazyLock;

use brandlens_core::{Platform, SocialLink};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::client::PageClient;
use crate::error::ScraperError;
use crate::page::Page;
use crate::urls::{
    classify_social_link, clean_url, detect_platform, extract_domain, normalize_input_url,
    normalize_url,
};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid discovery selector")
}

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static META: LazyLock<Selector> = LazyLock::new(|| selector("meta[content]"));
static CONTAINER_ANCHORS: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        r#"footer a[href], header a[href], nav a[href], [class*="social"] a[href], [id*="social"] a[href], [class*="follow"] a[href]"#,
    )
});
static ICONS: LazyLock<Selector> = LazyLock::new(|| selector("i[class], svg[class], span[class], img[class], img[alt]"));
static ICON_CONTENT: LazyLock<Selector> = LazyLock::new(|| selector("i, svg, img"));
static SHARE_WIDGETS: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"[data-share], [data-network], [data-platform], [class*="share"] a[href]"#)
});

/// Class-name parts used by icon fonts and social widgets (`fa-youtube`,
/// `bi-instagram`, `social-icon--twitter`).
const ICON_MARKERS: &[&str] = &[
    "fa", "fab", "fas", "icon", "icons", "ico", "social", "svg", "bi", "logo", "brand", "brands",
];

/// Words that make a short label read as a link to a profile.
const LABEL_CUES: &[&str] = &[
    "follow", "visit", "find", "join", "like", "subscribe", "on", "us", "icon", "logo",
];

/// Meta tags that may carry a profile URL or handle.
const PROFILE_META_KEYS: &[&str] = &[
    "og:url",
    "fb:page_id",
    "twitter:site",
    "twitter:creator",
    "instapp:owner_url",
];

/// Accumulates links across strategies, first-found-wins per platform.
struct Discovery<'a> {
    base: &'a Url,
    site_host: Option<String>,
    platforms: HashSet<Platform>,
    links: Vec<SocialLink>,
}

impl<'a> Discovery<'a> {
    fn new(base: &'a Url) -> Self {
        Self {
            base,
            site_host: base.host_str().map(str::to_ascii_lowercase),
            platforms: HashSet::new(),
            links: Vec::new(),
        }
    }

    /// Resolve and classify `href`; record it if its platform is new.
    fn offer(&mut self, href: &str, strategy: &'static str) -> bool {
        let Some(url) = normalize_url(self.base, href) else {
            return false;
        };
        let Some(platform) = classify_social_link(&url) else {
            return false;
        };
        self.record(platform, &url, strategy)
    }

    /// Record `url` under a platform inferred from markup rather than from
    /// the URL itself. Only external profile-looking URLs are accepted.
    fn offer_hinted(&mut self, href: &str, hint: Platform, strategy: &'static str) -> bool {
        if self.offer(href, strategy) {
            return true;
        }
        let Some(url) = normalize_url(self.base, href) else {
            return false;
        };
        let external = extract_domain(&url).is_some_and(|h| Some(&h) != self.site_host.as_ref());
        if !external || classify_social_link(&url).is_some() {
            return false;
        }
        self.record(hint, &url, strategy)
    }

    fn record(&mut self, platform: Platform, url: &str, strategy: &'static str) -> bool {
        if !has_profile_path(url) || !self.platforms.insert(platform) {
            return false;
        }
        let url = url.split('#').next().unwrap_or(url).to_string();
        tracing::debug!(%platform, %url, strategy, "discovered social link");
        self.links.push(SocialLink::new(platform, url));
        true
    }

    fn finish(self) -> Vec<SocialLink> {
        let mut seen = HashSet::new();
        self.links
            .into_iter()
            .filter(|l| seen.insert(clean_url(&l.url)))
            .collect()
    }
}

/// A bare platform homepage (`https://twitter.com/`) is not an account.
fn has_profile_path(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| {
        let path = u.path().trim_matches('/');
        !path.is_empty() || u.query().is_some() || u.host_str().is_some_and(|h| h.contains(".medium.com"))
    })
}

fn platform_for_word(word: &str) -> Option<Platform> {
    Platform::ALL.into_iter().find(|p| p.id() == word)
}

fn is_icon_marker(part: &str) -> bool {
    ICON_MARKERS.contains(&part) || part.starts_with("icon")
}

fn class_parts(class: &str) -> impl Iterator<Item = &str> {
    class
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|p| !p.is_empty())
}

/// Whether any class in the list carries an icon-font or widget marker.
fn has_icon_class(classes: &str) -> bool {
    let lower = classes.to_ascii_lowercase();
    let found = lower.split_whitespace().flat_map(class_parts).any(is_icon_marker);
    found
}

/// Platform named by an icon class: `fa-youtube`, `icon-instagram` and
/// `medium-icon` count, as does a bare `youtube` next to an icon class.
/// Utility classes such as `font-medium` do not.
fn platform_in_classes(classes: &str) -> Option<Platform> {
    let lower = classes.to_ascii_lowercase();
    let iconic_list = has_icon_class(&lower);
    lower.split_whitespace().find_map(|class| {
        let parts: Vec<&str> = class_parts(class).collect();
        let platform = parts.iter().find_map(|p| platform_for_word(p))?;
        let iconic = parts.iter().any(|p| is_icon_marker(p));
        let bare = parts.len() == 1;
        (iconic || (bare && iconic_list)).then_some(platform)
    })
}

/// Platform named by an `aria-label`, `title`, `alt` or `data-*` value. The
/// label must be short (`"Instagram"`, `"X"`) or phrased like a profile link
/// (`"Follow us on Instagram"`), so prose such as `"our medium roast"` is
/// ignored.
fn platform_in_label(label: &str) -> Option<Platform> {
    let lower = label.to_ascii_lowercase();
    let words: Vec<&str> = class_parts(&lower).collect();
    let platform = words.iter().find_map(|w| match *w {
        "x" => Some(Platform::Twitter),
        w => platform_for_word(w),
    })?;
    (words.len() <= 2 || words.iter().any(|w| LABEL_CUES.contains(w))).then_some(platform)
}

fn enclosing_anchor(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "a" && a.value().attr("href").is_some())
}

fn strategy_self(d: &mut Discovery<'_>) {
    let url = d.base.to_string();
    if let Some(platform) = detect_platform(&url) {
        d.record(platform, &url, "self");
    }
}

fn strategy_anchors(d: &mut Discovery<'_>, doc: &Html) {
    for a in doc.select(&ANCHOR) {
        if let Some(href) = a.value().attr("href") {
            d.offer(href, "anchor");
        }
    }
}

fn strategy_meta(d: &mut Discovery<'_>, doc: &Html) {
    for meta in doc.select(&META) {
        let el = meta.value();
        let Some(key) = el.attr("property").or_else(|| el.attr("name")) else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        if !PROFILE_META_KEYS.contains(&key.as_str()) {
            continue;
        }
        let Some(content) = el.attr("content").map(str::trim).filter(|c| !c.is_empty()) else {
            continue;
        };

        match key.as_str() {
            "twitter:site" | "twitter:creator" => {
                if let Some(handle) = content.strip_prefix('@') {
                    if !handle.is_empty() {
                        d.record(Platform::Twitter, &format!("https://twitter.com/{handle}"), "meta");
                    }
                } else {
                    d.offer(content, "meta");
                }
            }
            "fb:page_id" if content.chars().all(|c| c.is_ascii_digit()) => {
                d.record(Platform::Facebook, &format!("https://facebook.com/{content}"), "meta");
            }
            _ => {
                d.offer(content, "meta");
            }
        }
    }
}

fn strategy_containers(d: &mut Discovery<'_>, doc: &Html) {
    for a in doc.select(&CONTAINER_ANCHORS) {
        if let Some(href) = a.value().attr("href") {
            d.offer(href, "container");
        }
    }
}

/// Anchors that look like icon links, labelled either on the anchor itself
/// or on an icon element inside it.
fn strategy_icons(d: &mut Discovery<'_>, doc: &Html) {
    for a in doc.select(&ANCHOR) {
        let el = a.value();
        let class = el.attr("class").unwrap_or_default();
        let looks_like_icon = has_icon_class(class) || a.select(&ICON_CONTENT).next().is_some();
        if !looks_like_icon {
            continue;
        }
        let platform = platform_in_classes(class).or_else(|| {
            [el.attr("aria-label"), el.attr("title")]
                .into_iter()
                .flatten()
                .find_map(platform_in_label)
        });
        if let (Some(platform), Some(href)) = (platform, el.attr("href")) {
            d.offer_hinted(href, platform, "icon");
        }
    }

    for icon in doc.select(&ICONS) {
        let el = icon.value();
        let class = el.attr("class").unwrap_or_default();
        let alt = el.attr("alt").unwrap_or_default();
        let Some(platform) = platform_in_classes(class).or_else(|| platform_in_label(alt)) else {
            continue;
        };
        if let Some(href) = enclosing_anchor(icon).and_then(|a| a.value().attr("href")) {
            d.offer_hinted(href, platform, "icon");
        }
    }
}

fn strategy_share_widgets(d: &mut Discovery<'_>, doc: &Html) {
    for widget in doc.select(&SHARE_WIDGETS) {
        let el = widget.value();
        let hint = ["data-share", "data-network", "data-platform"]
            .into_iter()
            .filter_map(|attr| el.attr(attr))
            .find_map(platform_in_label);
        let href = ["href", "data-url", "data-href"]
            .into_iter()
            .find_map(|attr| el.attr(attr));
        match (href, hint) {
            (Some(href), Some(platform)) => {
                d.offer_hinted(href, platform, "share-widget");
            }
            (Some(href), None) => {
                d.offer(href, "share-widget");
            }
            _ => {}
        }
    }
}

/// Guess profile URLs from "follow us on ..." phrases, using the site's own
/// domain label as the handle. Lowest confidence; runs last.
fn strategy_phrases(d: &mut Discovery<'_>, page_text: &str) {
    let Some(handle) = d.site_host.as_deref().and_then(site_handle) else {
        return;
    };
    let text = page_text.to_lowercase();

    let templates: [(Platform, &str, String); 5] = [
        (Platform::Facebook, "facebook", format!("https://facebook.com/{handle}")),
        (Platform::Twitter, "twitter", format!("https://twitter.com/{handle}")),
        (Platform::Instagram, "instagram", format!("https://instagram.com/{handle}")),
        (
            Platform::Linkedin,
            "linkedin",
            format!("https://linkedin.com/company/{handle}"),
        ),
        (Platform::Youtube, "youtube", format!("https://youtube.com/@{handle}")),
    ];

    for (platform, name, url) in templates {
        if d.platforms.contains(&platform) {
            continue;
        }
        let mentioned = ["follow us on", "find us on", "like us on", "join us on", "subscribe on"]
            .iter()
            .any(|lead| text.contains(&format!("{lead} {name}")));
        if mentioned {
            d.record(platform, &url, "phrase");
        }
    }
}

/// First label of the site's host without `www.`: `www.acme.com` → `acme`.
fn site_handle(host: &str) -> Option<String> {
    let host = host.strip_prefix("www.").unwrap_or(host);
    let label = host.split('.').next()?;
    let valid = !label.is_empty()
        && host.contains('.')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| label.to_string())
}

/// Run every discovery strategy over `html` fetched from `base`.
#[must_use]
pub fn discover_links_in_html(base: &Url, html: &str) -> Vec<SocialLink> {
    let page = Page::parse(html);
    let doc = page.document();
    let mut d = Discovery::new(base);

    strategy_self(&mut d);
    strategy_anchors(&mut d, doc);
    strategy_meta(&mut d, doc);
    strategy_containers(&mut d, doc);
    strategy_icons(&mut d, doc);
    strategy_share_widgets(&mut d, doc);
    strategy_phrases(&mut d, page.text());

    let links = d.finish();
    tracing::info!(base = %base, found = links.len(), "social link discovery complete");
    links
}

/// Fetch `website_url` and discover its social-profile links.
///
/// A failed fetch is logged and leaves only the self-classification
/// strategy, so a platform URL still yields itself.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `website_url` cannot be normalised.
pub async fn discover_social_links(
    client: &PageClient,
    website_url: &str,
) -> Result<Vec<SocialLink>, ScraperError> {
    let base = normalize_input_url(website_url)?;
    let html = match client.fetch_page(base.as_str()).await {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!(url = %base, error = %err, "homepage fetch failed during discovery");
            String::new()
        }
    };
    Ok(discover_links_in_html(&base, &html))
}
