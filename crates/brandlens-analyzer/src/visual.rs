//! Visual style suggestions keyed by the dominant tone.

use serde::Serialize;

use crate::analysis::{dominant_tone, Tone, ToneMap};

const TONE_INDICATOR_MIN: f64 = 0.3;
const TONE_INDICATOR_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorPalette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub neutral: &'static str,
    pub highlight: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontStyle {
    pub heading: &'static str,
    pub body: &'static str,
    pub style: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToneIndicator {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualProfile {
    pub color_palette: ColorPalette,
    pub font_style: FontStyle,
    pub image_style: &'static str,
    pub tone_indicators: Vec<ToneIndicator>,
}

fn palette(tone: Tone) -> ColorPalette {
    match tone {
        Tone::Professional => ColorPalette {
            primary: "#0A3D62",
            secondary: "#3E92CC",
            accent: "#D8D8D8",
            neutral: "#F5F5F5",
            highlight: "#2E86AB",
        },
        Tone::Friendly => ColorPalette {
            primary: "#5E8C61",
            secondary: "#98B06F",
            accent: "#F9C846",
            neutral: "#F8F4E3",
            highlight: "#FF9B42",
        },
        Tone::Informative => ColorPalette {
            primary: "#3A6EA5",
            secondary: "#004E98",
            accent: "#FF6700",
            neutral: "#F0F0F0",
            highlight: "#C0C0C0",
        },
        Tone::Enthusiastic => ColorPalette {
            primary: "#E63946",
            secondary: "#F85A3E",
            accent: "#FFD166",
            neutral: "#F1FAEE",
            highlight: "#06D6A0",
        },
        Tone::Formal => ColorPalette {
            primary: "#2D3142",
            secondary: "#4F5D75",
            accent: "#7A6C5D",
            neutral: "#EAE8DC",
            highlight: "#7A9E7E",
        },
    }
}

fn fonts(tone: Tone) -> FontStyle {
    match tone {
        Tone::Professional => FontStyle {
            heading: "Montserrat or Georgia",
            body: "Open Sans or Roboto",
            style: "Clean, structured typography with a clear hierarchy",
        },
        Tone::Friendly => FontStyle {
            heading: "Quicksand or Nunito",
            body: "Lato or Source Sans Pro",
            style: "Rounded, approachable fonts with open spacing",
        },
        Tone::Informative => FontStyle {
            heading: "Roboto Slab or Merriweather",
            body: "Roboto or Noto Sans",
            style: "Readable typography with strong contrast",
        },
        Tone::Enthusiastic => FontStyle {
            heading: "Poppins or Futura",
            body: "Montserrat or Avenir",
            style: "Bold, dynamic typography with playful accents",
        },
        Tone::Formal => FontStyle {
            heading: "Playfair Display or Garamond",
            body: "EB Garamond or Libre Baskerville",
            style: "Classic, refined typography with elegant details",
        },
    }
}

fn image_style(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => "Polished photography with clean compositions and professional settings.",
        Tone::Friendly => "Candid imagery of real people in warm light.",
        Tone::Informative => "Explanatory visuals such as diagrams and data graphics.",
        Tone::Enthusiastic => "Vibrant, high-energy images with bold colours and movement.",
        Tone::Formal => "Elegant imagery with restrained compositions and subdued colours.",
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Palette, fonts and imagery for the dominant tone, plus the three
/// strongest tones above the significance threshold.
#[must_use]
pub fn generate_visual_profile(tones: &ToneMap) -> VisualProfile {
    let tone = dominant_tone(tones);

    let mut ranked: Vec<(Tone, f64)> = tones
        .iter()
        .filter(|(_, w)| **w > TONE_INDICATOR_MIN)
        .map(|(t, w)| (*t, *w))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    VisualProfile {
        color_palette: palette(tone),
        font_style: fonts(tone),
        image_style: image_style(tone),
        tone_indicators: ranked
            .into_iter()
            .take(TONE_INDICATOR_COUNT)
            .map(|(t, w)| ToneIndicator {
                name: t.name().to_string(),
                value: round2(w),
            })
            .collect(),
    }
}
