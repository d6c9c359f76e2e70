//! Loading and decoding of uploaded export files

pub mod collection;
pub mod decode;
pub mod file;
pub mod handler;
pub mod text;

pub use collection::expand_inputs;
pub use decode::{decode_upload, parse_document};
pub use handler::{SourceHandler, SourceHandlerRegistry, Upload};
