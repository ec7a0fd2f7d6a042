// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Could not read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse PDF: {0}")]
    Parse(String),
}

/// Reasons a matched address is rejected. Never surfaced past the extractor.
#[derive(Error, Debug)]
pub enum EmailValidationError {
    #[error("Rejected by address parser: {0}")]
    Syntax(#[from] email_address::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid vocabulary file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid skill pattern: {0}")]
    InvalidPattern(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Failures loading the token-classification model. Recovered from by
/// falling back to the rule-based recognizer.
#[cfg(feature = "bert-ner")]
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model download failed: {0}")]
    Hub(#[from] hf_hub::api::sync::ApiError),

    #[error("Model error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model config: {0}")]
    Config(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
