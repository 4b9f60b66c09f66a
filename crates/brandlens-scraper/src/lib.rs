pub mod client;
pub mod collect;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod normalize;
pub mod page;
mod rate_limit;
pub mod urls;
pub mod website;

pub use client::{FetchPolicy, PageClient};
pub use collect::SocialCollector;
pub use discovery::{discover_links_in_html, discover_social_links};
pub use error::{ExtractionError, ScraperError};
pub use extract::{AudienceCount, ExtractorRegistry, PartialProfile};
pub use fallback::FallbackPolicy;
pub use normalize::{clean_text_content, normalize_follower_count};
pub use page::Page;
pub use urls::{classify_social_link, clean_url, detect_platform, extract_domain, normalize_input_url, normalize_url};
pub use website::{
    extract_website_content, fallback_website_content, fetch_website_content, parse_homepage,
    HomepageContent,
};
