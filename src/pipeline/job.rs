use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use log::{debug, info};

use crate::app_config::Config;
use crate::errors::{AppError, CaptionError};
use crate::markup::geometry::probe_or_fallback;
use crate::markup::{MarkupCompiler, MarkupDocument, StyleSpec, VideoGeometry};
use crate::providers::{Transcriber, Translator};
use crate::segmenter::{CaptionCue, Segmenter};
use crate::transcript::Transcript;

use super::translation_pass::{TranslationPass, TranslationPassConfig, TranslationStats};

/// Extension of exported subtitle scripts
pub const SCRIPT_EXTENSION: &str = "ass";

/// One caption job: transcript in, subtitle script out.
///
/// A job owns its cues; nothing is shared between jobs, so unrelated jobs
/// can run side by side.
#[derive(Debug, Clone)]
pub struct CaptionJob {
    id: String,
    config: Config,
}

/// Captions of a job together with how the translation went
#[derive(Debug, Clone)]
pub struct CaptionOutput {
    pub cues: Vec<CaptionCue>,
    pub stats: TranslationStats,
}

impl CaptionJob {
    /// Create a job with a fresh random id
    pub fn new(config: Config) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), config)
    }

    /// Create a job with a caller-supplied id
    pub fn with_id(id: impl Into<String>, config: Config) -> Self {
        Self { id: id.into(), config }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn segmenter(&self) -> Segmenter {
        Segmenter::new(self.config.segmentation.clone())
    }

    fn translation_pass(&self, translator: Arc<dyn Translator>) -> TranslationPass {
        let config = TranslationPassConfig::new(&self.config.source_language, &self.config.target_language)
            .with_max_concurrent_requests(self.config.translation.concurrent_requests)
            .with_strip_numbering(self.config.translation.strip_numbering);
        TranslationPass::new(translator, config)
    }

    /// Translate and chunk a transcript into cues
    pub async fn generate_captions(
        &self,
        transcript: &Transcript,
        translator: Arc<dyn Translator>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> CaptionOutput {
        let (texts, stats) = self.translation_pass(translator)
            .run(&transcript.segments, progress_callback)
            .await;

        let cues = self.segmenter().segment(&transcript.segments, &texts);
        info!(
            "Job {}: {} segments -> {} captions ({} translated, {} degraded)",
            self.id, transcript.segments.len(), cues.len(), stats.translated, stats.degraded
        );

        CaptionOutput { cues, stats }
    }

    /// Transcribe a media source, then translate and chunk it.
    ///
    /// Only a failing transcriber fails the job.
    pub async fn caption_source(
        &self,
        source: &Path,
        transcriber: &dyn Transcriber,
        translator: Arc<dyn Translator>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<CaptionOutput, AppError> {
        let transcript = transcriber.transcribe(source).await?;
        debug!("Job {}: transcript has {} segments", self.id, transcript.segments.len());
        Ok(self.generate_captions(&transcript, translator, progress_callback).await)
    }

    /// Dimensions of the video, or the configured fallback when it cannot be probed
    pub async fn video_geometry(&self, video: &Path) -> VideoGeometry {
        let timeout = Duration::from_secs(self.config.render.probe_timeout_secs);
        probe_or_fallback(video, timeout, self.config.render.fallback_geometry()).await
    }

    /// Compile cues into a subtitle script
    pub fn render(&self, style: &StyleSpec, geometry: Option<VideoGeometry>, cues: &[CaptionCue]) -> MarkupDocument {
        MarkupCompiler::with_fallback_geometry(self.config.render.fallback_geometry())
            .compile(style, geometry, cues)
    }

    /// Path of this job's script inside `output_dir`
    pub fn script_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.{}", self.id, SCRIPT_EXTENSION))
    }

    /// Write the script as `<job id>.ass` into `output_dir`
    pub fn export(&self, document: &MarkupDocument, output_dir: &Path) -> Result<PathBuf, CaptionError> {
        let path = self.script_path(output_dir);
        document.write_to_file(&path).map_err(|e| CaptionError::Export {
            path: path.display().to_string(),
            message: format!("{:#}", e),
        })?;
        info!("Job {}: wrote {}", self.id, path.display());
        Ok(path)
    }
}

/// Read cues from a JSON array of `{id, text, start_time, end_time}`
pub fn read_cues_file<P: AsRef<Path>>(path: P) -> Result<Vec<CaptionCue>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read captions: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse captions: {}", path.display()))
}

/// Write cues as a pretty-printed JSON array
pub fn write_cues_file<P: AsRef<Path>>(path: P, cues: &[CaptionCue]) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(cues).context("Failed to serialize captions")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write captions: {}", path.display()))
}
