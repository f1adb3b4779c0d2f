// src/extractors/mod.rs
pub mod attributes;
pub mod tagger;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use attributes::{AttributeExtractor, ExtractedRecord};
pub use tagger::{build_tagger, ModelLocation};
