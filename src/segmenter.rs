/*!
 * Re-segmentation of translated speech segments into display-ready cues.
 *
 * Each transcript segment is chunked on its own: a cue never crosses the
 * boundary of the segment it came from, and the segment's end time caps
 * every cue derived from it. Chunking is a pure per-segment step; cue ids
 * are handed out afterwards by a single pass over the segments in
 * transcript order so that they stay monotonic however the per-segment work
 * was scheduled.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::transcript::TranscriptSegment;

/// Thresholds deciding how many words go into one cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPolicy {
    /// Above this speaking rate, segments are split into larger chunks
    #[serde(default = "default_fast_words_per_minute")]
    pub fast_words_per_minute: f64,

    /// Below this speaking rate, a single word keeps its own cue
    #[serde(default = "default_slow_words_per_minute")]
    pub slow_words_per_minute: f64,

    /// Segments with more words than this are split into larger chunks
    #[serde(default = "default_long_segment_words")]
    pub long_segment_words: usize,

    /// Lower bound for the chunk size of fast or long segments
    #[serde(default = "default_min_chunk_words")]
    pub min_chunk_words: usize,

    /// Upper bound for the chunk size of fast or long segments
    #[serde(default = "default_max_chunk_words")]
    pub max_chunk_words: usize,

    /// Chunk size used for everything else
    #[serde(default = "default_chunk_words")]
    pub default_chunk_words: usize,
}

fn default_fast_words_per_minute() -> f64 {
    180.0
}

fn default_slow_words_per_minute() -> f64 {
    60.0
}

fn default_long_segment_words() -> usize {
    5
}

fn default_min_chunk_words() -> usize {
    3
}

fn default_max_chunk_words() -> usize {
    5
}

fn default_chunk_words() -> usize {
    3
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            fast_words_per_minute: default_fast_words_per_minute(),
            slow_words_per_minute: default_slow_words_per_minute(),
            long_segment_words: default_long_segment_words(),
            min_chunk_words: default_min_chunk_words(),
            max_chunk_words: default_max_chunk_words(),
            default_chunk_words: default_chunk_words(),
        }
    }
}

impl ChunkPolicy {
    /// Words per cue for a segment with `word_count` words spoken at
    /// `words_per_minute`. Always at least one.
    pub fn chunk_size(&self, word_count: usize, words_per_minute: f64) -> usize {
        let size = if words_per_minute > self.fast_words_per_minute || word_count > self.long_segment_words {
            (word_count / 2).max(self.min_chunk_words).min(self.max_chunk_words)
        } else if words_per_minute < self.slow_words_per_minute && word_count == 1 {
            1
        } else {
            self.default_chunk_words.min(word_count)
        };

        size.max(1)
    }
}

/// Speaking rate of a segment; zero when the span has no length
pub fn words_per_minute(word_count: usize, duration_secs: f64) -> f64 {
    if duration_secs > 0.0 {
        (word_count as f64 / duration_secs) * 60.0
    } else {
        0.0
    }
}

/// Text of one segment after the translation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum SegmentText {
    /// Successfully translated text
    Translated(String),
    /// Source text used as-is because no translation was needed
    Original(String),
    /// Source text used because the translation failed
    Degraded(String),
}

impl SegmentText {
    pub fn text(&self) -> &str {
        match self {
            Self::Translated(text) | Self::Original(text) | Self::Degraded(text) => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

/// One on-screen subtitle unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionCue {
    /// Unique within a job, increasing in display order
    pub id: String,

    /// Single line of text
    pub text: String,

    /// Start in seconds
    #[serde(rename = "start_time", alias = "start")]
    pub start: f64,

    /// End in seconds
    #[serde(rename = "end_time", alias = "end")]
    pub end: f64,
}

impl CaptionCue {
    pub fn new(id: impl Into<String>, text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            start,
            end,
        }
    }
}

/// A cue before it has been given its id
#[derive(Debug, Clone, PartialEq)]
pub struct CueDraft {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// Splits translated segments into caption cues
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    policy: ChunkPolicy,
}

impl Segmenter {
    pub fn new(policy: ChunkPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ChunkPolicy {
        &self.policy
    }

    /// Turn transcript segments and their per-segment texts into cues.
    ///
    /// `texts[i]` belongs to `segments[i]`. A segment without a matching
    /// entry falls back to its own transcript text.
    pub fn segment(&self, segments: &[TranscriptSegment], texts: &[SegmentText]) -> Vec<CaptionCue> {
        let chunks: Vec<Vec<CueDraft>> = segments
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                let text = texts.get(index).map_or(segment.text.as_str(), SegmentText::text);
                self.chunk_segment(segment, text)
            })
            .collect();

        let cues = assign_ids(chunks);
        debug!("Segmented {} transcript segments into {} cues", segments.len(), cues.len());
        cues
    }

    /// Chunk the text of a single segment, bounded by that segment's span
    pub fn chunk_segment(&self, segment: &TranscriptSegment, text: &str) -> Vec<CueDraft> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let start = segment.start;
        let end = segment.end.max(segment.start);
        let duration = end - start;
        let word_count = words.len();
        let chunk_size = self.policy.chunk_size(word_count, words_per_minute(word_count, duration));

        if word_count <= chunk_size {
            return vec![CueDraft {
                text: words.join(" "),
                start,
                end,
            }];
        }

        let time_per_word = duration / word_count as f64;
        words
            .chunks(chunk_size)
            .enumerate()
            .map(|(chunk_index, chunk)| {
                let first_word = chunk_index * chunk_size;
                let chunk_start = start + first_word as f64 * time_per_word;
                let chunk_end = (start + (first_word + chunk.len()) as f64 * time_per_word).min(end);
                CueDraft {
                    text: chunk.join(" "),
                    start: chunk_start,
                    end: chunk_end,
                }
            })
            .collect()
    }
}

/// Give every draft a job-wide sequential id, starting at 1, in the order
/// the per-segment chunk lists are supplied.
pub fn assign_ids(chunks: Vec<Vec<CueDraft>>) -> Vec<CaptionCue> {
    chunks
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(index, draft)| CaptionCue {
            id: (index + 1).to_string(),
            text: draft.text,
            start: draft.start,
            end: draft.end,
        })
        .collect()
}
