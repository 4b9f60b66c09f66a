//! Brand analysis for BrandLens.
//!
//! Turns a homepage URL into an [`AnalysisResult`]: social links and
//! profiles from `brandlens-scraper`, then lexicon sentiment, keywords and
//! tone, a Markdown brand story, a visual profile and a consistency score.

pub mod analysis;
pub mod consistency;
pub mod error;
pub mod lexicon;
pub mod pipeline;
pub mod story;
pub mod types;
pub mod visual;

pub use analysis::{ContentAnalysis, ContentAnalyzer, Tone, ToneMap};
pub use consistency::consistency_score;
pub use error::AnalyzeError;
pub use lexicon::{Lexicon, Sentiment};
pub use pipeline::Analyzer;
pub use story::{generate_brand_story, StoryInput};
pub use types::AnalysisResult;
pub use visual::{generate_visual_profile, VisualProfile};
