/*!
 * # subcraft - caption segmentation and subtitle rendering
 *
 * Turns a time-stamped transcript into burned-in-ready captions:
 *
 * - Translate each speech segment (through a pluggable translator),
 *   degrading to the source text when a translation fails
 * - Re-chunk segments into short cues with timing proportional to words
 * - Compile a caption style and the cues into an ASS script whose
 *   coordinates match the target video
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `transcript`: Whisper-style transcript model
 * - `segmenter`: Chunking of segments into caption cues
 * - `markup`: Style resolution and the ASS compiler:
 *   - `markup::color`: Hex to ASS colour conversion
 *   - `markup::geometry`: Video dimensions and ffprobe lookup
 *   - `markup::style`: Style options with defaults
 *   - `markup::compiler`: Script generation
 * - `pipeline`: Translation pass and caption job orchestration
 * - `providers`: Transcriber / translator collaborators
 * - `app_config`: Configuration management
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod language_utils;
pub mod markup;
pub mod pipeline;
pub mod providers;
pub mod segmenter;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, CaptionError, ProviderError};
pub use markup::{compile, MarkupCompiler, MarkupDocument, StyleSpec, VideoGeometry};
pub use pipeline::CaptionJob;
pub use segmenter::{CaptionCue, SegmentText, Segmenter};
pub use transcript::{Transcript, TranscriptSegment};
