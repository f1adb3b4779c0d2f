// src/loaders/text.rs
use crate::utils::error::LoadError;

/// Decodes a plain-text upload as UTF-8, verbatim.
pub fn read_text(bytes: Vec<u8>) -> Result<String, LoadError> {
    let text = String::from_utf8(bytes)?; // Propagates as LoadError::Decode
    Ok(text)
}
