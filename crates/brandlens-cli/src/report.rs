//! Markdown rendering of an [`AnalysisResult`] for `analyze --format markdown`.

use std::fmt::Write as _;

use brandlens_analyzer::AnalysisResult;

/// The brand story followed by a summary of the scored analysis.
pub(crate) fn render_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(result.brand_story.trim_end());
    out.push_str("\n\n## Analysis Summary\n\n");

    let _ = writeln!(out, "- **Consistency score:** {}/100", result.consistency_score);
    let _ = writeln!(out, "- **Keywords:** {}", result.keywords.join(", "));
    let _ = writeln!(out, "- **Key values:** {}", result.key_values.join(", "));

    out.push_str("\n### Tone\n\n| Tone | Weight |\n|---|---|\n");
    for (tone, weight) in &result.tone_analysis {
        let _ = writeln!(out, "| {} | {weight:.2} |", tone.name());
    }

    if !result.social_analytics.is_empty() {
        out.push_str(
            "\n### Social Analytics\n\n| Platform | Followers | Engagement | Frequency |\n|---|---|---|---|\n",
        );
        for row in &result.social_analytics {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                row.platform, row.followers, row.engagement, row.frequency
            );
        }
    }

    let visual = &result.visual_profile;
    let palette = &visual.color_palette;
    out.push_str("\n### Visual Profile\n\n");
    let _ = writeln!(
        out,
        "- **Palette:** {} primary, {} secondary, {} accent, {} neutral, {} highlight",
        palette.primary, palette.secondary, palette.accent, palette.neutral, palette.highlight
    );
    let _ = writeln!(
        out,
        "- **Fonts:** {} headings, {} body ({})",
        visual.font_style.heading, visual.font_style.body, visual.font_style.style
    );
    let _ = writeln!(out, "- **Imagery:** {}", visual.image_style);

    if let Some(error) = &result.error {
        let _ = write!(out, "\n> Partial result: {error}\n");
    }

    out
}
