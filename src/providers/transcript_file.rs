use std::path::{Path, PathBuf};
use async_trait::async_trait;
use log::debug;

use crate::errors::ProviderError;
use crate::providers::Transcriber;
use crate::transcript::Transcript;

/// Transcriber backed by whisper-style JSON files on disk.
///
/// With no explicit path, the transcript is looked up next to the media
/// source as `<stem>.json`.
#[derive(Debug, Clone, Default)]
pub struct TranscriptFile {
    path: Option<PathBuf>,
}

impl TranscriptFile {
    /// Always read the given file
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: Some(path.into()) }
    }

    /// Read `<stem>.json` next to whatever source is transcribed
    pub fn sidecar() -> Self {
        Self { path: None }
    }

    fn resolve(&self, source: &Path) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => source.with_extension("json"),
        }
    }
}

#[async_trait]
impl Transcriber for TranscriptFile {
    async fn transcribe(&self, source: &Path) -> Result<Transcript, ProviderError> {
        let path = self.resolve(source);
        debug!("Reading transcript for {} from {}", source.display(), path.display());

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Cannot read {}: {}", path.display(), e)))?;

        Transcript::from_json_str(&content)
            .map_err(|e| ProviderError::ParseError(format!("{}: {:#}", path.display(), e)))
    }
}
