//! Pure, synchronous file transforms.
//!
//! Each function takes bytes or text for one file and returns the processed
//! result. Tasks call them on the blocking pool.

pub mod css;
pub mod html_min;
pub mod image;
pub mod include;
pub mod js;

pub use css::{CompiledStyle, CssOptions, compile_scss, process_css};
pub use html_min::minify_html;
pub use image::{ImageKind, ImageSettings, optimize};
pub use include::resolve_file;
pub use js::minify_js;
