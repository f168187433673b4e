use std::fs;
use std::path::Path;
use anyhow::{Result, Context};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

// @module: Time-stamped transcript model (whisper verbose_json shaped)

// @const: Span used when only the plain transcript text is available
const TEXT_ONLY_SPAN_SECS: f64 = 10.0;

// @struct: One detected speech span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    // @field: Spoken text
    #[serde(default)]
    pub text: String,

    // @field: Start in seconds
    #[serde(default)]
    pub start: f64,

    // @field: End in seconds
    #[serde(default)]
    pub end: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Length of the span in seconds, never negative
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Word-level timing as reported by the transcription capability.
///
/// Carried through for callers that want finer alignment; chunking works
/// on segment spans only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub word: String,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
}

/// A full transcription result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Whole transcript text
    #[serde(default)]
    pub text: Option<String>,

    /// Detected language, as reported by the transcriber
    #[serde(default)]
    pub language: Option<String>,

    /// Ordered speech segments
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,

    /// Optional word-level timing
    #[serde(default)]
    pub words: Option<Vec<WordTiming>>,
}

impl Transcript {
    /// Build a transcript from already-known segments
    pub fn from_segments(segments: Vec<TranscriptSegment>) -> Self {
        Self {
            segments,
            ..Self::default()
        }
    }

    /// Parse a whisper-style JSON document.
    ///
    /// Segment text is trimmed. A document without segments but with a
    /// non-empty `text` yields a single segment covering the first ten
    /// seconds.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let mut transcript: Transcript = serde_json::from_str(content)
            .context("Failed to parse transcript JSON")?;

        for segment in &mut transcript.segments {
            let trimmed = segment.text.trim();
            if trimmed.len() != segment.text.len() {
                segment.text = trimmed.to_string();
            }
        }

        if transcript.segments.is_empty() {
            if let Some(text) = transcript.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                warn!("Transcript has no segments, using full text as a single {}s segment", TEXT_ONLY_SPAN_SECS);
                transcript.segments.push(TranscriptSegment::new(text, 0.0, TEXT_ONLY_SPAN_SECS));
            }
        }

        debug!("Loaded transcript with {} segments", transcript.segments.len());
        Ok(transcript)
    }

    /// Load a whisper-style JSON document from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
        Self::from_json_str(&content)
    }

    /// True when no segment carries any text
    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(|s| s.text.trim().is_empty())
    }
}
