mod document;
mod value;

pub use document::Document;
pub use value::{ArrayBlock, Record, Value};
