/*!
 * JSON configuration for caption jobs.
 *
 * Every field has a serde default, so a partial file (or none at all) is a
 * valid configuration. `validate` is the only place values are rejected.
 */

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::markup::{StyleSpec, VideoGeometry};
use crate::segmenter::ChunkPolicy;

/// Settings shared by every job started from one configuration file
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language of the transcript (ISO code or English name)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language captions are translated into (ISO code or English name)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation pass settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Chunking thresholds
    #[serde(default)]
    pub segmentation: ChunkPolicy,

    /// Rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation pass settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Maximum number of segments translated at the same time
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Remove leading list numbering ("1. ") from translated text
    #[serde(default = "default_true")]
    pub strip_numbering: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: default_concurrent_requests(),
            strip_numbering: default_true(),
        }
    }
}

/// Rendering settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// Width used when the video geometry is unknown
    #[serde(default = "default_fallback_width")]
    pub fallback_width: u32,

    /// Height used when the video geometry is unknown
    #[serde(default = "default_fallback_height")]
    pub fallback_height: u32,

    /// ffprobe timeout in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Style used when a job does not bring its own
    #[serde(default)]
    pub style: StyleSpec,
}

impl RenderConfig {
    pub fn fallback_geometry(&self) -> VideoGeometry {
        VideoGeometry::new(self.fallback_width, self.fallback_height)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fallback_width: default_fallback_width(),
            fallback_height: default_fallback_height(),
            probe_timeout_secs: default_probe_timeout_secs(),
            style: StyleSpec::default(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "hi".to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_fallback_width() -> u32 {
    VideoGeometry::FALLBACK.width
}

fn default_fallback_height() -> u32 {
    VideoGeometry::FALLBACK.height
}

fn default_probe_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::get_language_name(&self.source_language)
            .context("Invalid source language")?;
        crate::language_utils::get_language_name(&self.target_language)
            .context("Invalid target language")?;

        if self.translation.concurrent_requests == 0 {
            return Err(anyhow!("translation.concurrent_requests must be at least 1"));
        }

        let policy = &self.segmentation;
        if policy.min_chunk_words == 0 || policy.min_chunk_words > policy.max_chunk_words {
            return Err(anyhow!(
                "Invalid chunk bounds: min_chunk_words {} / max_chunk_words {}",
                policy.min_chunk_words, policy.max_chunk_words
            ));
        }
        if policy.default_chunk_words == 0 {
            return Err(anyhow!("segmentation.default_chunk_words must be at least 1"));
        }
        if policy.slow_words_per_minute > policy.fast_words_per_minute {
            return Err(anyhow!(
                "slow_words_per_minute ({}) exceeds fast_words_per_minute ({})",
                policy.slow_words_per_minute, policy.fast_words_per_minute
            ));
        }

        if !self.render.fallback_geometry().is_valid() {
            return Err(anyhow!("Fallback geometry must have positive width and height"));
        }

        Ok(())
    }

    /// Load the configuration file, writing a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            segmentation: ChunkPolicy::default(),
            render: RenderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
