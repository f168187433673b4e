/*!
 * Caption job pipeline.
 *
 * A job runs in three steps:
 * 1. **Translation pass**: segments are translated concurrently and joined
 *    back in transcript order
 * 2. **Segmentation**: translated segments are chunked into cues and given
 *    job-wide ids
 * 3. **Rendering**: cues are compiled into a subtitle script for the
 *    target video geometry
 */

pub mod job;
pub mod translation_pass;

pub use job::{read_cues_file, write_cues_file, CaptionJob, CaptionOutput};
pub use translation_pass::{TranslationPass, TranslationPassConfig, TranslationStats};
