/*!
 * Translation pass: one translation per transcript segment.
 *
 * Segments are independent, so they are translated concurrently. Results
 * are tagged with their segment index and re-sorted once everything has
 * finished; completion order never leaks into the output. A segment whose
 * translation fails or comes back empty keeps its source text, marked as
 * degraded, and the rest of the job continues.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::Semaphore;

use crate::language_utils;
use crate::providers::{TranslationRequest, Translator};
use crate::segmenter::SegmentText;
use crate::transcript::TranscriptSegment;

// @const: Leading list numbering some models add ("1. ", "12.")
static NUMBERING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\.\s*").unwrap()
});

/// Configuration for the translation pass
#[derive(Debug, Clone)]
pub struct TranslationPassConfig {
    /// Language of the transcript
    pub source_language: String,

    /// Language to translate into
    pub target_language: String,

    /// Maximum number of segments in flight
    pub max_concurrent_requests: usize,

    /// Remove leading list numbering from translations
    pub strip_numbering: bool,
}

impl TranslationPassConfig {
    pub fn new(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            ..Default::default()
        }
    }

    pub fn with_max_concurrent_requests(mut self, max_concurrent_requests: usize) -> Self {
        self.max_concurrent_requests = max_concurrent_requests.max(1);
        self
    }

    pub fn with_strip_numbering(mut self, strip_numbering: bool) -> Self {
        self.strip_numbering = strip_numbering;
        self
    }

    /// Source and target name the same language
    pub fn is_same_language(&self) -> bool {
        language_utils::language_codes_match(&self.source_language, &self.target_language)
    }
}

impl Default for TranslationPassConfig {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "hi".to_string(),
            max_concurrent_requests: 4,
            strip_numbering: true,
        }
    }
}

/// Outcome counts of a translation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationStats {
    /// Segments translated successfully
    pub translated: usize,

    /// Segments that fell back to their source text
    pub degraded: usize,

    /// Segments passed through without translation
    pub untranslated: usize,
}

/// Translates transcript segments with bounded concurrency
#[derive(Debug, Clone)]
pub struct TranslationPass {
    translator: Arc<dyn Translator>,
    config: TranslationPassConfig,
    semaphore: Arc<Semaphore>,
}

impl TranslationPass {
    pub fn new(translator: Arc<dyn Translator>, config: TranslationPassConfig) -> Self {
        let permits = config.max_concurrent_requests.max(1);
        Self {
            translator,
            config,
            semaphore: Arc::new(Semaphore::new(permits)),
        }
    }

    pub fn config(&self) -> &TranslationPassConfig {
        &self.config
    }

    /// Translate every segment. The result has one entry per input segment,
    /// in input order.
    pub async fn run(
        &self,
        segments: &[TranscriptSegment],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> (Vec<SegmentText>, TranslationStats) {
        if self.config.is_same_language() {
            info!(
                "Source and target language match ({}), skipping translation",
                self.config.target_language
            );
            let texts: Vec<SegmentText> = segments
                .iter()
                .map(|s| SegmentText::Original(s.text.clone()))
                .collect();
            let stats = TranslationStats {
                untranslated: texts.len(),
                ..Default::default()
            };
            progress_callback(segments.len(), segments.len());
            return (texts, stats);
        }

        let total = segments.len();
        let processed = Arc::new(AtomicUsize::new(0));

        let mut results = stream::iter(segments.iter().enumerate())
            .map(|(index, segment)| {
                let translator = self.translator.clone();
                let semaphore = self.semaphore.clone();
                let processed = processed.clone();
                let progress_callback = progress_callback.clone();
                let strip_numbering = self.config.strip_numbering;
                let request = TranslationRequest {
                    index,
                    text: segment.text.clone(),
                    source_language: self.config.source_language.clone(),
                    target_language: self.config.target_language.clone(),
                };

                async move {
                    let text = if request.text.trim().is_empty() {
                        SegmentText::Original(request.text)
                    } else {
                        match semaphore.acquire().await {
                            Ok(_permit) => translate_one(translator.as_ref(), request, strip_numbering).await,
                            Err(e) => {
                                warn!("Segment {}: translation slot unavailable ({}), keeping source text", index + 1, e);
                                SegmentText::Degraded(request.text)
                            }
                        }
                    };

                    let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total);

                    (index, text)
                }
            })
            .buffer_unordered(self.config.max_concurrent_requests.max(1))
            .collect::<Vec<_>>()
            .await;

        // Join on segment order, not completion order
        results.sort_by_key(|(index, _)| *index);

        let mut stats = TranslationStats::default();
        let texts: Vec<SegmentText> = results
            .into_iter()
            .map(|(_, text)| {
                match &text {
                    SegmentText::Translated(_) => stats.translated += 1,
                    SegmentText::Degraded(_) => stats.degraded += 1,
                    SegmentText::Original(_) => stats.untranslated += 1,
                }
                text
            })
            .collect();

        if stats.degraded > 0 {
            warn!(
                "{} of {} segments kept their source text after translation failures",
                stats.degraded, total
            );
        }
        debug!("Translation pass finished: {:?}", stats);

        (texts, stats)
    }
}

async fn translate_one(translator: &dyn Translator, request: TranslationRequest, strip_numbering: bool) -> SegmentText {
    match translator.translate(&request).await {
        Ok(raw) => {
            let cleaned = clean_translation(&raw, strip_numbering);
            if cleaned.is_empty() {
                warn!("Segment {}: {} returned an empty translation, keeping source text", request.index + 1, translator.name());
                SegmentText::Degraded(request.text)
            } else {
                SegmentText::Translated(cleaned)
            }
        }
        Err(e) => {
            warn!("Segment {}: {} failed ({}), keeping source text", request.index + 1, translator.name(), e);
            SegmentText::Degraded(request.text)
        }
    }
}

/// Trim a raw translation and remove one pair of wrapping quotes and,
/// optionally, leading list numbering.
pub fn clean_translation(raw: &str, strip_numbering: bool) -> String {
    let mut text = raw.trim();

    if strip_numbering {
        if let Some(m) = NUMBERING_REGEX.find(text) {
            text = &text[m.end()..];
        }
    }

    let text = text.strip_prefix(['"', '\'']).unwrap_or(text);
    let text = text.strip_suffix(['"', '\'']).unwrap_or(text);
    text.trim().to_string()
}
