//! Brand name, description and main body text of a company homepage.

use std::sync::LazyLock;

use brandlens_core::{Platform, WebsiteContent};
use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::client::PageClient;
use crate::page::{text_skipping, Page};
use crate::urls::{detect_platform, extract_domain, normalize_url};

/// Page chrome that never carries brand copy.
const CHROME_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "svg", "nav", "footer",
];

const GENERIC_TITLES: &[&str] = &["home", "welcome", "index"];

const MAIN_SELECTORS: &[&str] = &[
    "main",
    "article",
    "section",
    "#content",
    ".content",
    "#main",
    ".main",
    r#"[role="main"]"#,
    ".post-content",
    ".entry-content",
];

const LOGO_SELECTORS: &[&str] = &[
    "a.logo img",
    ".logo img",
    "#logo img",
    "header img",
    ".header img",
    ".brand img",
    r#"img[alt*="logo"]"#,
    r#"img[src*="logo"]"#,
];

const ABOUT_PATH_MARKERS: &[&str] = &[
    "/about",
    "/company",
    "/who-we-are",
    "/mission",
    "/values",
    "/our-story",
    "/story",
    "/team",
    "/history",
];

const ORGANIZATION_TYPES: &[&str] = &["Organization", "Corporation", "LocalBusiness"];

const MAIN_CONTENT_MIN_CHARS: usize = 200;
const MAIN_CONTENT_MIN_WORDS: usize = 10;
const PARAGRAPH_MIN_CHARS: usize = 10;
const ABOUT_MIN_CHARS: usize = 100;
const CONTENT_MIN_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 200;
const SHORT_SENTENCE_CHARS: usize = 50;

static TITLE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[-|].*$").expect("valid title suffix regex"));
static LOGO_FILE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(logo-?|header-?|brand[-_]?)").expect("valid logo prefix regex")
});

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid website selector")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META: LazyLock<Selector> = LazyLock::new(|| selector("meta[content]"));
static JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static MAIN: LazyLock<Vec<Selector>> =
    LazyLock::new(|| MAIN_SELECTORS.iter().map(|css| selector(css)).collect());
static LOGO: LazyLock<Vec<Selector>> =
    LazyLock::new(|| LOGO_SELECTORS.iter().map(|css| selector(css)).collect());

/// Homepage fields before the optional about-page merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomepageContent {
    pub brand_name: String,
    pub description: String,
    pub main_content: String,
    pub about_url: Option<String>,
    pub platform: Option<Platform>,
}

impl HomepageContent {
    /// Append about-page text, then apply platform and minimum-length
    /// fallbacks.
    #[must_use]
    pub fn finish(self, about_text: Option<&str>) -> WebsiteContent {
        let Self {
            brand_name,
            mut description,
            mut main_content,
            platform,
            ..
        } = self;

        if let Some(about) = about_text.filter(|a| !a.is_empty()) {
            if main_content.is_empty() {
                main_content = about.to_string();
            } else {
                main_content = format!("{main_content} {about}");
            }
        }

        if let Some(platform) = platform {
            if char_len(&main_content) < MAIN_CONTENT_MIN_CHARS {
                if let Some(blurb) = platform_blurb(platform, &brand_name) {
                    if description.is_empty() {
                        description = first_sentence(&blurb);
                    }
                    main_content = blurb;
                }
            }
        }

        if char_len(&main_content) < CONTENT_MIN_CHARS {
            main_content = generic_content(&brand_name, &description);
        }

        WebsiteContent {
            brand_name,
            description,
            content: main_content,
        }
    }
}

/// Content used when the homepage cannot be fetched at all.
#[must_use]
pub fn fallback_website_content(base: &Url) -> WebsiteContent {
    let brand_name = default_brand_name(base);
    WebsiteContent {
        description: format!("Website for {brand_name}"),
        content: format!(
            "{brand_name} is a professional organization providing high-quality services and solutions to customers. Our focus is on quality, innovation, and excellence in everything we do."
        ),
        brand_name,
    }
}

/// Parse homepage fields from `html` without fetching anything else.
#[must_use]
pub fn parse_homepage(base: &Url, html: &str) -> HomepageContent {
    let page = Page::parse(html);
    let doc = page.document();
    let platform = detect_platform(base.as_str());

    let brand_name = match platform {
        Some(p) => p.display_name().to_string(),
        None => brand_name_from_title(doc)
            .or_else(|| brand_name_from_meta(doc))
            .or_else(|| brand_name_from_logo(doc))
            .or_else(|| brand_name_from_json_ld(doc))
            .unwrap_or_else(|| default_brand_name(base)),
    };

    let mut main_content = main_content(doc);
    if main_content.split_whitespace().count() < MAIN_CONTENT_MIN_WORDS {
        main_content = format!("Website for {brand_name} focused on providing services.");
    }

    let description = meta_description(doc).unwrap_or_else(|| {
        if main_content.is_empty() {
            format!("Official website for {brand_name}")
        } else {
            description_from_content(&main_content)
        }
    });

    let about_url = find_about_link(base, doc);
    tracing::debug!(%base, %brand_name, about = ?about_url, "parsed homepage");

    HomepageContent {
        brand_name,
        description,
        main_content,
        about_url,
        platform,
    }
}

/// Homepage content without the about-page merge.
#[must_use]
pub fn extract_website_content(base: &Url, html: &str) -> WebsiteContent {
    parse_homepage(base, html).finish(None)
}

/// Homepage content, with the first about page fetched once and appended.
/// An about-page failure is logged and ignored.
pub async fn fetch_website_content(client: &PageClient, base: &Url, html: &str) -> WebsiteContent {
    let homepage = parse_homepage(base, html);
    let about_text = match homepage.about_url.as_deref() {
        Some(about_url) => match client.fetch_page(about_url).await {
            Ok(about_html) => about_page_text(&about_html),
            Err(err) => {
                tracing::warn!(url = about_url, error = %err, "about page fetch failed");
                None
            }
        },
        None => None,
    };
    homepage.finish(about_text.as_deref())
}

/// Joined paragraph text of an about page, if there is enough of it.
#[must_use]
pub fn about_page_text(html: &str) -> Option<String> {
    let page = Page::parse(html);
    let paragraphs = paragraphs(page.document());
    let total: usize = paragraphs.iter().map(|p| char_len(p)).sum();
    (total > ABOUT_MIN_CHARS).then(|| paragraphs.join(" "))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn is_generic(name: &str) -> bool {
    GENERIC_TITLES.contains(&name.to_lowercase().as_str())
}

fn accept_name(raw: &str) -> Option<String> {
    let name = TITLE_SUFFIX_RE.replace(raw.trim(), "").trim().to_string();
    (!name.is_empty() && !is_generic(&name)).then_some(name)
}

fn brand_name_from_title(doc: &Html) -> Option<String> {
    let title = doc.select(&TITLE).next()?.text().collect::<String>();
    accept_name(&title)
}

fn meta_content<'a>(doc: &'a Html, key: &str) -> Option<&'a str> {
    doc.select(&META).find_map(|meta| {
        let el = meta.value();
        let matches = [el.attr("property"), el.attr("name")]
            .into_iter()
            .flatten()
            .any(|k| k.trim().eq_ignore_ascii_case(key));
        matches
            .then(|| el.attr("content").map(str::trim))
            .flatten()
            .filter(|c| !c.is_empty())
    })
}

fn brand_name_from_meta(doc: &Html) -> Option<String> {
    ["og:title", "twitter:title", "title"]
        .into_iter()
        .filter_map(|key| meta_content(doc, key))
        .find_map(accept_name)
}

fn brand_name_from_logo(doc: &Html) -> Option<String> {
    for sel in LOGO.iter() {
        let Some(img) = doc.select(sel).next() else {
            continue;
        };
        if let Some(alt) = img.value().attr("alt").map(str::trim).filter(|a| !a.is_empty()) {
            return (!is_generic(alt)).then(|| alt.to_string());
        }
        if let Some(name) = img.value().attr("src").and_then(name_from_logo_file) {
            return Some(name);
        }
    }
    None
}

/// `/img/logo-acme_coffee.png` → `Acme Coffee`.
fn name_from_logo_file(src: &str) -> Option<String> {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    let file = path.rsplit('/').next()?;
    if !file.to_lowercase().contains("logo") {
        return None;
    }
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    let stem = LOGO_FILE_PREFIX_RE.replace(stem, "");
    if stem.is_empty() {
        return None;
    }
    if !stem.contains(['-', '_']) {
        return Some(stem.into_owned());
    }
    let words: Vec<String> = stem
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

fn brand_name_from_json_ld(doc: &Html) -> Option<String> {
    doc.select(&JSON_LD).find_map(|script| {
        let raw = script.text().collect::<String>();
        let value: serde_json::Value = serde_json::from_str(&raw).ok()?;
        let candidates = match value {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut obj) => match obj.remove("@graph") {
                Some(serde_json::Value::Array(items)) => items,
                _ => vec![serde_json::Value::Object(obj)],
            },
            _ => return None,
        };
        candidates.iter().find_map(|item| {
            let is_org = item
                .get("@type")
                .and_then(serde_json::Value::as_str)
                .is_some_and(|t| ORGANIZATION_TYPES.contains(&t));
            let name = item.get("name").and_then(serde_json::Value::as_str)?.trim();
            (is_org && !name.is_empty()).then(|| name.to_string())
        })
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Platform name for platform URLs, else the capitalised first label of the
/// host without `www.`.
fn default_brand_name(base: &Url) -> String {
    if let Some(platform) = detect_platform(base.as_str()) {
        return platform.display_name().to_string();
    }
    let host = extract_domain(base.as_str()).unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let label = host.split('.').next().unwrap_or_default();
    if label.is_empty() {
        "Unknown".to_string()
    } else {
        capitalize(label)
    }
}

fn meta_description(doc: &Html) -> Option<String> {
    ["description", "og:description", "twitter:description"]
        .into_iter()
        .find_map(|key| meta_content(doc, key))
        .map(str::to_string)
}

fn element_text(element: ElementRef<'_>) -> String {
    text_skipping(element, CHROME_ELEMENTS)
}

fn paragraphs(doc: &Html) -> Vec<String> {
    doc.select(&PARAGRAPH)
        .map(element_text)
        .filter(|p| char_len(p) > PARAGRAPH_MIN_CHARS)
        .collect()
}

/// Longest content container, else the middle half of the paragraphs, else
/// the whole body.
fn main_content(doc: &Html) -> String {
    let mut content = MAIN
        .iter()
        .flat_map(|sel| doc.select(sel).map(element_text))
        .max_by_key(|text| char_len(text))
        .unwrap_or_default();

    if char_len(&content) < MAIN_CONTENT_MIN_CHARS {
        let paras = paragraphs(doc);
        if !paras.is_empty() {
            content = if paras.len() > 4 {
                paras[paras.len() / 4..paras.len() * 3 / 4].join(" ")
            } else {
                paras.join(" ")
            };
        }
    }

    if char_len(&content) < MAIN_CONTENT_MIN_CHARS {
        if let Some(body) = doc.select(&BODY).next() {
            content = element_text(body);
        }
    }

    content.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split after `.`, `!` or `?` followed by whitespace.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev_terminal = false;
    for (i, c) in text.char_indices() {
        if prev_terminal && c.is_whitespace() {
            let sentence = text[start..i].trim();
            if !sentence.is_empty() {
                out.push(sentence);
            }
            start = i;
        }
        prev_terminal = matches!(c, '.' | '!' | '?');
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

fn first_sentence(text: &str) -> String {
    sentences(text).first().map_or_else(String::new, |s| (*s).to_string())
}

fn description_from_content(content: &str) -> String {
    let parts = sentences(content);
    let mut description = parts.first().map_or_else(String::new, |s| (*s).to_string());
    if char_len(&description) < SHORT_SENTENCE_CHARS {
        if let Some(next) = parts.get(1) {
            description = format!("{description} {next}");
        }
    }
    if char_len(&description) > DESCRIPTION_MAX_CHARS {
        let cut: String = description.chars().take(DESCRIPTION_MAX_CHARS - 3).collect();
        description = format!("{cut}...");
    }
    description
}

/// First same-site link whose path looks like an about page.
fn find_about_link(base: &Url, doc: &Html) -> Option<String> {
    let site = extract_domain(base.as_str())?;
    let site = site.strip_prefix("www.").unwrap_or(&site).to_string();
    doc.select(&ANCHOR).find_map(|a| {
        let href = normalize_url(base, a.value().attr("href")?)?;
        let url = Url::parse(&href).ok()?;
        let host = url.host_str()?.to_ascii_lowercase();
        let same_site = host.strip_prefix("www.").unwrap_or(&host) == site;
        let path = url.path().to_ascii_lowercase();
        let about = ABOUT_PATH_MARKERS.iter().any(|m| path.contains(m));
        (same_site && about && url.as_str() != base.as_str()).then_some(href)
    })
}

fn platform_blurb(platform: Platform, name: &str) -> Option<String> {
    let body = match platform {
        Platform::Facebook => "is a social network where people, businesses and organisations share updates, photos and videos and react to each other through likes, comments and shares.",
        Platform::Twitter => "is a microblogging network built around short public posts, used for real-time news, announcements and open conversation.",
        Platform::Instagram => "is a photo and video sharing network where accounts publish visual posts, stories and reels organised by hashtags.",
        Platform::Linkedin => "is a professional network used by companies and individuals for hiring, career development and business updates.",
        Platform::Youtube => "is a video platform where channels upload videos that viewers watch, rate, comment on and subscribe to.",
        Platform::Pinterest => "is a visual discovery service where people save and organise images and ideas on boards.",
        Platform::Tiktok => "is a short-form video network known for music, trends and entertainment clips.",
        _ => return None,
    };
    Some(format!("{name} {body}"))
}

fn generic_content(brand_name: &str, description: &str) -> String {
    format!(
        "{brand_name} is a professional organization that provides services and solutions to customers. {description} Our focus is on quality, innovation, and excellence in everything we do."
    )
}
