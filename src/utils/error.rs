// src/utils/error.rs
#![allow(dead_code)]
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String), // Unrecognized extension, pipeline halts before extraction

    #[error("Could not decode text as UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Failed to parse document: {0}")]
    Parse(String), // Corrupt PDF / malformed .docx

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to initialize POS tagger: {0}")]
    TaggerInit(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Loading document failed: {0}")]
    Load(#[from] LoadError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
