//! Explicit compositor configuration: branding, palette, limits and page geometry.
//!
//! Every field has a default, so partial TOML/JSON documents deserialize.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Severity;

/// 24-bit RGB colour, serialized as `#rrggbb`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let digits = s.trim().trim_start_matches('#');
        let bytes = hex::decode(digits).map_err(|e| format!("invalid colour {s:?}: {e}"))?;
        match bytes.as_slice() {
            [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
            _ => Err(format!("invalid colour {s:?}: expected 6 hex digits")),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// Report palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary: Color,
    pub text: Color,
    pub muted: Color,
    pub panel: Color,
    pub rule: Color,
    pub on_accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub hint: Color,
    pub neutral: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::rgb(0x1f, 0x3a, 0x5f),
            text: Color::rgb(0x22, 0x22, 0x22),
            muted: Color::rgb(0x6b, 0x72, 0x80),
            panel: Color::rgb(0xf3, 0xf4, 0xf6),
            rule: Color::rgb(0xd1, 0xd5, 0xdb),
            on_accent: Color::rgb(0xff, 0xff, 0xff),
            success: Color::rgb(0x16, 0xa3, 0x4a),
            warning: Color::rgb(0xd9, 0x77, 0x06),
            error: Color::rgb(0xdc, 0x26, 0x26),
            info: Color::rgb(0x25, 0x63, 0xeb),
            hint: Color::rgb(0x7c, 0x3a, 0xed),
            neutral: Color::rgb(0x6b, 0x72, 0x80),
        }
    }
}

/// Page size and margins in points. Coordinates grow downward from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for PageGeometry {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margin_top: 50.0,
            margin_bottom: 60.0,
            margin_left: 50.0,
            margin_right: 50.0,
        }
    }
}

impl PageGeometry {
    pub fn content_top(&self) -> f32 {
        self.margin_top
    }

    /// Lowest y a content block may reach; the footer band lies below it.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn usable_height(&self) -> f32 {
        self.content_bottom() - self.content_top()
    }
}

/// Compositor configuration, passed explicitly to [`render`](super::render).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Cover title.
    pub title: String,
    /// Product name used on the cover and in the footer.
    pub brand: String,
    /// Extra footer text, left-aligned next to the brand.
    pub footer_text: String,
    /// Resolved/new issues listed in the diff section before an overflow line.
    pub diff_preview_limit: usize,
    /// Sample issues listed under each category bar.
    pub category_sample_limit: usize,
    /// Width of the bar for the largest category.
    pub max_bar_width: f32,
    pub show_recommendations: bool,
    pub theme: Theme,
    pub page: PageGeometry,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "API Quality Report".to_string(),
            brand: "SpecWatch".to_string(),
            footer_text: "Generated automatically from the latest lint run".to_string(),
            diff_preview_limit: 15,
            category_sample_limit: 5,
            max_bar_width: 300.0,
            show_recommendations: true,
            theme: Theme::default(),
            page: PageGeometry::default(),
        }
    }
}

impl RenderConfig {
    /// Score colour: `>= 80` success, `>= 50` warning, else error.
    pub fn score_color(&self, score: u8) -> Color {
        match score {
            80..=u8::MAX => self.theme.success,
            50..=79 => self.theme.warning,
            _ => self.theme.error,
        }
    }

    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Error => self.theme.error,
            Severity::Warning => self.theme.warning,
            Severity::Information => self.theme.info,
            Severity::Hint => self.theme.hint,
        }
    }

    /// Delta colour: improvement success, regression error, no change neutral.
    pub fn delta_color(&self, change: i64) -> Color {
        match change.signum() {
            1 => self.theme.success,
            -1 => self.theme.error,
            _ => self.theme.neutral,
        }
    }
}
