// src/extractors/mod.rs
#[cfg(feature = "bert-ner")]
pub mod bert_ner;
pub mod email;
pub mod entities;
pub mod patterns;
pub mod resume;
pub mod vocabulary;

// Re-export key extraction types for convenience
pub use entities::{EntityRecognizer, RuleBasedRecognizer};
pub use resume::{ExtractionResult, ResumeExtractor};
pub use vocabulary::Vocabulary;
