//! Page content extraction.

mod backend;
mod builder;
mod dump;
mod image;
mod links;
mod options;
mod reflow;

pub use backend::{LinkAnnotation, PageInfo, PageRef, PdfSource, RawBlock, RawLine, RawSpan};
pub use builder::build_blocks;
pub use dump::{DumpDocument, DumpPage, ReplayEngine};
pub use image::{document_token, ImageBlockBuilder, IMAGE_SPAN_FONT};
pub use links::attach_links;
pub use options::{ConvertOptions, DEFAULT_REFLOW_TOLERANCE};
pub use reflow::reflow_blocks;
