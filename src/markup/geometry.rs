use std::path::Path;
use std::time::Duration;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::process::Command;

use crate::errors::ProviderError;

// @module: Video pixel geometry and its lookup

/// Reference short side the base font size is designed for
const REFERENCE_SHORT_SIDE: f64 = 540.0;

/// Pixel dimensions of the target video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoGeometry {
    pub width: u32,
    pub height: u32,
}

impl VideoGeometry {
    /// Vertical 1080x1920, used whenever the real geometry is unknown
    pub const FALLBACK: VideoGeometry = VideoGeometry { width: 1080, height: 1920 };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are positive
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// This geometry if valid, otherwise `fallback`
    pub fn or_fallback(self, fallback: VideoGeometry) -> VideoGeometry {
        if self.is_valid() {
            self
        } else {
            warn!("Invalid video geometry {}x{}, using {}x{}", self.width, self.height, fallback.width, fallback.height);
            fallback
        }
    }

    /// Font scale relative to a 540px short side
    pub fn scale_factor(&self) -> f64 {
        f64::from(self.width.min(self.height)) / REFERENCE_SHORT_SIDE
    }
}

/// Resolve an optional geometry, substituting [`VideoGeometry::FALLBACK`]
pub fn resolve_geometry(geometry: Option<VideoGeometry>) -> VideoGeometry {
    match geometry {
        Some(geometry) => geometry.or_fallback(VideoGeometry::FALLBACK),
        None => {
            warn!("No video geometry supplied, using {}x{}", VideoGeometry::FALLBACK.width, VideoGeometry::FALLBACK.height);
            VideoGeometry::FALLBACK
        }
    }
}

/// Read the first video stream's dimensions with ffprobe.
///
/// A stream rotated by a quarter turn reports its display orientation, i.e.
/// width and height swapped.
pub async fn probe_video_geometry<P: AsRef<Path>>(video_path: P, timeout: Duration) -> Result<VideoGeometry, ProviderError> {
    let video_path = video_path.as_ref();

    if !video_path.exists() {
        return Err(ProviderError::RequestFailed(format!("Video file not found: {}", video_path.display())));
    }

    let ffprobe_future = Command::new("ffprobe")
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_streams",
            "-select_streams", "v:0",
            video_path.to_str().unwrap_or(""),
        ])
        .output();

    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| ProviderError::RequestFailed(format!("Failed to execute ffprobe: {}", e)))?
        },
        _ = tokio::time::sleep(timeout) => {
            return Err(ProviderError::Timeout(timeout.as_secs()));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProviderError::RequestFailed(format!("ffprobe failed: {}", stderr.trim())));
    }

    let geometry = parse_ffprobe_geometry(&String::from_utf8_lossy(&output.stdout))?;
    debug!("Probed {}: {}x{}", video_path.display(), geometry.width, geometry.height);
    Ok(geometry)
}

/// Probe a video, falling back instead of failing
pub async fn probe_or_fallback<P: AsRef<Path>>(video_path: P, timeout: Duration, fallback: VideoGeometry) -> VideoGeometry {
    match probe_video_geometry(video_path, timeout).await {
        Ok(geometry) => geometry.or_fallback(fallback),
        Err(e) => {
            warn!("Video geometry lookup failed ({}), using {}x{}", e, fallback.width, fallback.height);
            fallback
        }
    }
}

/// Extract display geometry from ffprobe's `-show_streams` JSON
pub fn parse_ffprobe_geometry(json: &str) -> Result<VideoGeometry, ProviderError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ProviderError::ParseError(format!("Invalid ffprobe JSON: {}", e)))?;

    let stream = value.get("streams")
        .and_then(|s| s.as_array())
        .and_then(|streams| streams.first())
        .ok_or_else(|| ProviderError::ParseError("No video stream found".to_string()))?;

    let dimension = |key: &str| {
        stream.get(key)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .ok_or_else(|| ProviderError::ParseError(format!("Video stream has no usable {}", key)))
    };

    let width = dimension("width")?;
    let height = dimension("height")?;

    if is_quarter_turn(stream_rotation(stream)) {
        Ok(VideoGeometry::new(height, width))
    } else {
        Ok(VideoGeometry::new(width, height))
    }
}

fn stream_rotation(stream: &Value) -> i64 {
    let from_tags = stream.get("tags")
        .and_then(|t| t.get("rotate"))
        .and_then(Value::as_str)
        .and_then(|r| r.trim().parse::<i64>().ok());

    let from_side_data = || {
        stream.get("side_data_list")
            .and_then(Value::as_array)
            .and_then(|list| list.iter().find_map(|d| d.get("rotation").and_then(Value::as_i64)))
    };

    from_tags.or_else(from_side_data).unwrap_or(0)
}

fn is_quarter_turn(rotation: i64) -> bool {
    rotation.rem_euclid(180) == 90
}
