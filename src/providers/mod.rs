/*!
 * External collaborators consumed by the caption pipeline.
 *
 * The speech-to-text and translation models themselves live outside this
 * crate; they are reached through the two traits below. This module ships
 * data-backed implementations:
 * - `transcript_file`: a transcript previously produced by a transcriber
 * - `table`: translations supplied as a JSON table, and a pass-through
 * - `mock`: scriptable translator for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use crate::errors::ProviderError;
use crate::transcript::Transcript;

/// One segment's worth of text to translate
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    /// Position of the segment in the transcript
    pub index: usize,
    /// Source text
    pub text: String,
    /// Source language
    pub source_language: String,
    /// Target language
    pub target_language: String,
}

/// Produces time-stamped speech segments for a media source
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    /// Transcribe the given source
    async fn transcribe(&self, source: &Path) -> Result<Transcript, ProviderError>;
}

/// Translates the text of a single segment
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate one segment's text
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error;
    ///   callers degrade errors to the source text
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;

    /// Short name used in log lines
    fn name(&self) -> &str;
}

pub mod mock;
pub mod table;
pub mod transcript_file;

pub use self::table::{PassthroughTranslator, TranslationTable};
pub use self::transcript_file::TranscriptFile;
