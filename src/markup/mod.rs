/*!
 * Subtitle markup generation.
 *
 * - `color`: hex to ASS colour conversion
 * - `geometry`: target video dimensions and their lookup
 * - `style`: caption style options and their validation
 * - `compiler`: the style + cues to ASS script compiler
 */

pub use self::color::AssColor;
pub use self::compiler::{compile, MarkupCompiler, MarkupDocument};
pub use self::geometry::VideoGeometry;
pub use self::style::{RenderMode, StyleSpec, StyleSpecBuilder};

pub mod color;
pub mod compiler;
pub mod geometry;
pub mod style;
