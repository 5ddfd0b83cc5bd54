//! Rendering module for converting pages to output formats.

mod json;
mod options;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::{PageSelection, RenderOptions};
pub use text::{page_text, span_text, to_text, wrap_link};
