/*!
 * Caption style options.
 *
 * A style arrives as a loosely-typed mapping (JSON object from a request or
 * a config file). It is turned into a [`StyleSpec`] exactly once, through
 * [`StyleSpecBuilder`], which resolves every missing or malformed option to
 * its default. The compiler only ever sees the resolved form.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::color::AssColor;

const DEFAULT_FONT_FAMILY: &str = "Arial";
const DEFAULT_FONT_SIZE: f64 = 24.0;
const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";
const DEFAULT_BACKGROUND_OPACITY: f64 = 0.8;
const DEFAULT_HIGHLIGHT_COLOR: &str = "#000000";
const DEFAULT_POSITION_Y: f64 = 15.0;

/// How the area behind the glyphs is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Opaque box behind the text in the background colour
    Box,
    /// Bordered text with a soft shadow
    Outline,
}

impl RenderMode {
    /// `BorderStyle` value of the style table
    pub fn border_style(&self) -> u8 {
        match self {
            Self::Box => 3,
            Self::Outline => 1,
        }
    }

    /// Border thickness in script pixels
    pub fn border(&self) -> u8 {
        match self {
            Self::Box => 8,
            Self::Outline => 3,
        }
    }

    /// Shadow depth in script pixels
    pub fn shadow(&self) -> u8 {
        match self {
            Self::Box => 0,
            Self::Outline => 2,
        }
    }
}

/// Fully resolved caption style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct StyleSpec {
    font_family: String,
    font_size: f64,
    text_color: String,
    has_background: bool,
    background_opacity: f64,
    highlight_color: String,
    position_y: f64,
    has_animation: bool,
}

impl Default for StyleSpec {
    fn default() -> Self {
        StyleSpecBuilder::default().build()
    }
}

impl From<Value> for StyleSpec {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl StyleSpec {
    pub fn builder() -> StyleSpecBuilder {
        StyleSpecBuilder::default()
    }

    /// Resolve a loosely-typed mapping. Unknown keys are ignored; values of
    /// the wrong type are treated as absent. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            if !value.is_null() {
                debug!("Style is not an object, using defaults");
            }
            return Self::default();
        };

        let mut builder = StyleSpecBuilder::default();
        if let Some(v) = map.get("font_family").and_then(loose_string) {
            builder = builder.font_family(v);
        }
        if let Some(v) = map.get("font_size").and_then(loose_number) {
            builder = builder.font_size(v);
        }
        if let Some(v) = map.get("text_color").and_then(loose_string) {
            builder = builder.text_color(v);
        }
        if let Some(v) = map.get("has_background").and_then(loose_bool) {
            builder = builder.has_background(v);
        }
        if let Some(v) = map.get("background_opacity").and_then(loose_number) {
            builder = builder.background_opacity(v);
        }
        if let Some(v) = map.get("highlight_color").and_then(loose_string) {
            builder = builder.highlight_color(v);
        }
        if let Some(v) = map.get("position_y").and_then(loose_number) {
            builder = builder.position_y(v);
        }
        if let Some(v) = map.get("has_animation").and_then(loose_bool) {
            builder = builder.has_animation(v);
        }
        builder.build()
    }

    /// Parse a JSON style document, falling back to defaults if it is not JSON
    pub fn from_json_str(content: &str) -> Self {
        match serde_json::from_str::<Value>(content) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                debug!("Style is not valid JSON ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn text_color(&self) -> &str {
        &self.text_color
    }

    pub fn has_background(&self) -> bool {
        self.has_background
    }

    pub fn background_opacity(&self) -> f64 {
        self.background_opacity
    }

    pub fn highlight_color(&self) -> &str {
        &self.highlight_color
    }

    pub fn position_y(&self) -> f64 {
        self.position_y
    }

    pub fn has_animation(&self) -> bool {
        self.has_animation
    }

    pub fn render_mode(&self) -> RenderMode {
        if self.has_background {
            RenderMode::Box
        } else {
            RenderMode::Outline
        }
    }

    /// Opaque glyph colour
    pub fn primary_colour(&self) -> AssColor {
        AssColor::from_hex(&self.text_color, 1.0)
    }

    /// Highlight colour at the background opacity
    pub fn background_colour(&self) -> AssColor {
        AssColor::from_hex(&self.highlight_color, self.background_opacity)
    }

    /// Colour of the outline and shadow channels for the active render mode
    pub fn edge_colour(&self) -> AssColor {
        match self.render_mode() {
            RenderMode::Box => self.background_colour(),
            RenderMode::Outline => AssColor::OUTLINE_BLACK,
        }
    }
}

/// Collects raw style options and validates them into a [`StyleSpec`]
#[derive(Debug, Clone, Default)]
pub struct StyleSpecBuilder {
    font_family: Option<String>,
    font_size: Option<f64>,
    text_color: Option<String>,
    has_background: Option<bool>,
    background_opacity: Option<f64>,
    highlight_color: Option<String>,
    position_y: Option<f64>,
    has_animation: Option<bool>,
}

impl StyleSpecBuilder {
    pub fn font_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = Some(font_family.into());
        self
    }

    pub fn font_size(mut self, font_size: f64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn text_color(mut self, text_color: impl Into<String>) -> Self {
        self.text_color = Some(text_color.into());
        self
    }

    pub fn has_background(mut self, has_background: bool) -> Self {
        self.has_background = Some(has_background);
        self
    }

    pub fn background_opacity(mut self, background_opacity: f64) -> Self {
        self.background_opacity = Some(background_opacity);
        self
    }

    pub fn highlight_color(mut self, highlight_color: impl Into<String>) -> Self {
        self.highlight_color = Some(highlight_color.into());
        self
    }

    pub fn position_y(mut self, position_y: f64) -> Self {
        self.position_y = Some(position_y);
        self
    }

    pub fn has_animation(mut self, has_animation: bool) -> Self {
        self.has_animation = Some(has_animation);
        self
    }

    /// Resolve every option. Colours are kept as given; an unparseable
    /// colour turns into white when it is converted.
    pub fn build(self) -> StyleSpec {
        let font_family = self.font_family
            .map(|f| sanitize_font_family(&f))
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string());

        let font_size = self.font_size
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(DEFAULT_FONT_SIZE);

        let background_opacity = self.background_opacity
            .filter(|o| o.is_finite())
            .map_or(DEFAULT_BACKGROUND_OPACITY, |o| o.clamp(0.0, 1.0));

        let position_y = self.position_y
            .filter(|p| p.is_finite())
            .map_or(DEFAULT_POSITION_Y, |p| p.clamp(0.0, 100.0));

        StyleSpec {
            font_family,
            font_size,
            text_color: self.text_color.unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            has_background: self.has_background.unwrap_or(false),
            background_opacity,
            highlight_color: self.highlight_color
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_HIGHLIGHT_COLOR.to_string()),
            position_y,
            has_animation: self.has_animation.unwrap_or(false),
        }
    }
}

/// Drop characters that would break the style table or an override block
fn sanitize_font_family(font_family: &str) -> String {
    font_family
        .chars()
        .filter(|c| !matches!(c, ',' | '{' | '}' | '\\' | '\n' | '\r'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn loose_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn loose_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
