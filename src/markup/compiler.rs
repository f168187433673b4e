/*!
 * Compiles a caption style and a cue sequence into an ASS (v4.00+) script.
 *
 * Every cue line repeats the full style as an inline override plus an
 * absolute `\pos`, so the result renders the same whatever defaults the
 * renderer would otherwise apply. `PlayResX`/`PlayResY` are set to the
 * target geometry, which makes all of those pixel values mean what they say.
 *
 * Compilation is a pure function of (style, geometry, cues).
 */

use std::fmt;
use std::fs;
use std::path::Path;
use anyhow::{Result, Context};
use log::{debug, warn};

use crate::segmenter::CaptionCue;
use super::geometry::{resolve_geometry, VideoGeometry};
use super::style::StyleSpec;

/// Base font sizes are authored for a small preview; burned-in text is drawn larger
const FONT_SIZE_BOOST: f64 = 1.5;

/// Name of the single style row every cue refers to
const STYLE_NAME: &str = "Default";

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

const EVENT_FORMAT: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Pop-in: grow to 110% over 150ms, settle back to 100% over the next 150ms
const POP_IN_ANIMATION: &str = r"\t(0,150,\fscx110\fscy110)\t(150,300,\fscx100\fscy100)";

/// Zero-width character that stops a backslash from starting an escape
const WORD_JOINER: char = '\u{2060}';

/// A compiled subtitle script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupDocument {
    header: String,
    events: Vec<String>,
}

impl MarkupDocument {
    /// Script info, style table and event format line
    pub fn header(&self) -> &str {
        &self.header
    }

    /// One `Dialogue:` line per cue with displayable text, in input order
    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// True when the document carries no cue lines
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Write the document to disk, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(path, self.to_string())
            .with_context(|| format!("Failed to write subtitle script: {}", path.display()))?;

        Ok(())
    }
}

impl fmt::Display for MarkupDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.header)?;
        for line in &self.events {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Values shared by the header and every cue line
struct ResolvedLayout<'a> {
    style: &'a StyleSpec,
    geometry: VideoGeometry,
    font_size: u32,
    x: u32,
    y: u32,
}

impl<'a> ResolvedLayout<'a> {
    fn new(style: &'a StyleSpec, geometry: VideoGeometry) -> Self {
        let font_size = (style.font_size() * geometry.scale_factor() * FONT_SIZE_BOOST).round().max(1.0) as u32;
        let y = (f64::from(geometry.height) * (1.0 - style.position_y() / 100.0)).round() as u32;

        Self {
            style,
            geometry,
            font_size,
            x: geometry.width / 2,
            y,
        }
    }

    fn header(&self) -> String {
        let mode = self.style.render_mode();
        let primary = self.style.primary_colour();
        let edge = self.style.edge_colour();
        let margin_v = self.geometry.height.saturating_sub(self.y);

        let mut header = String::new();
        header.push_str("[Script Info]\n");
        header.push_str("ScriptType: v4.00+\n");
        header.push_str(&format!("PlayResX: {}\n", self.geometry.width));
        header.push_str(&format!("PlayResY: {}\n", self.geometry.height));
        header.push_str("WrapStyle: 0\n");
        header.push_str("ScaledBorderAndShadow: yes\n");
        header.push('\n');
        header.push_str("[V4+ Styles]\n");
        header.push_str(STYLE_FORMAT);
        header.push('\n');
        header.push_str(&format!(
            "Style: {},{},{},{},{},{},{},0,0,0,0,100,100,0,0,{},{},{},2,10,10,{},1\n",
            STYLE_NAME,
            self.style.font_family(),
            self.font_size,
            primary,
            primary,
            edge,
            edge,
            mode.border_style(),
            mode.border(),
            mode.shadow(),
            margin_v,
        ));
        header.push('\n');
        header.push_str("[Events]\n");
        header.push_str(EVENT_FORMAT);
        header.push('\n');
        header
    }

    fn override_block(&self) -> String {
        let mode = self.style.render_mode();
        let primary = self.style.primary_colour();
        let edge = self.style.edge_colour();

        let mut block = format!(
            r"{{\fn{}\fs{}\1c{}\1a{}\3c{}\3a{}\4c{}\4a{}\bord{}\shad{}\pos({},{})",
            self.style.font_family(),
            self.font_size,
            primary.colour_tag(),
            primary.alpha_tag(),
            edge.colour_tag(),
            edge.alpha_tag(),
            edge.colour_tag(),
            edge.alpha_tag(),
            mode.border(),
            mode.shadow(),
            self.x,
            self.y,
        );
        if self.style.has_animation() {
            block.push_str(POP_IN_ANIMATION);
        }
        block.push('}');
        block
    }
}

/// Turns styles and cues into subtitle scripts
#[derive(Debug, Clone, Default)]
pub struct MarkupCompiler {
    fallback_geometry: Option<VideoGeometry>,
}

impl MarkupCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `fallback` instead of [`VideoGeometry::FALLBACK`] for missing geometry
    pub fn with_fallback_geometry(fallback: VideoGeometry) -> Self {
        Self {
            fallback_geometry: Some(fallback).filter(VideoGeometry::is_valid),
        }
    }

    /// Compile a script. Missing or non-positive geometry is replaced by the
    /// fallback geometry; an empty cue list yields a header-only script.
    pub fn compile(&self, style: &StyleSpec, geometry: Option<VideoGeometry>, cues: &[CaptionCue]) -> MarkupDocument {
        let geometry = match self.fallback_geometry {
            Some(fallback) => geometry.unwrap_or(fallback).or_fallback(fallback),
            None => resolve_geometry(geometry),
        };
        let layout = ResolvedLayout::new(style, geometry);
        let override_block = layout.override_block();

        if cues.is_empty() {
            warn!("No captions to compile, producing a header-only script");
        }

        let events = cues
            .iter()
            .filter_map(|cue| {
                let text = sanitize_cue_text(&cue.text);
                if text.trim().is_empty() {
                    debug!("Cue {} has no displayable text, skipping", cue.id);
                    return None;
                }
                Some(format!(
                    "Dialogue: 0,{},{},{},,0,0,0,,{}{}",
                    format_timestamp(cue.start),
                    format_timestamp(cue.end),
                    STYLE_NAME,
                    override_block,
                    text,
                ))
            })
            .collect();

        debug!(
            "Compiled {} cues for {}x{} (font {}px, anchor {},{})",
            cues.len(), geometry.width, geometry.height, layout.font_size, layout.x, layout.y
        );

        MarkupDocument {
            header: layout.header(),
            events,
        }
    }
}

/// Compile with the default fallback geometry
pub fn compile(style: &StyleSpec, geometry: Option<VideoGeometry>, cues: &[CaptionCue]) -> MarkupDocument {
    MarkupCompiler::new().compile(style, geometry, cues)
}

/// Format seconds as `H:MM:SS.cc`. Rounds to the nearest centisecond;
/// negative and non-finite input count as zero.
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let total_cs = (seconds * 100.0).round() as u64;

    let hours = total_cs / 360_000;
    let minutes = (total_cs % 360_000) / 6_000;
    let secs = (total_cs % 6_000) / 100;
    let cs = total_cs % 100;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, cs)
}

/// Make cue text safe for a single event line: line breaks and pipes become
/// a single space, override braces are removed, and the `\N`, `\n`, `\h`
/// escapes are broken up so they render literally.
pub fn sanitize_cue_text(text: &str) -> String {
    let text = text.replace("\r\n", " ");
    let mut chars = text.chars().filter(|c| !matches!(c, '{' | '}')).peekable();
    let mut sanitized = String::with_capacity(text.len());

    while let Some(c) = chars.next() {
        match c {
            '\n' | '\r' | '|' => sanitized.push(' '),
            '\\' => {
                sanitized.push(c);
                if matches!(chars.peek(), Some('N' | 'n' | 'h')) {
                    sanitized.push(WORD_JOINER);
                }
            }
            _ => sanitized.push(c),
        }
    }

    sanitized
}
