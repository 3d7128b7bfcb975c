use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataUriError {
    #[error("Image data is not a base64 data URI")]
    NotBase64,

    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Decode the payload of a `data:<mime>;base64,<payload>` URI, as sent by a canvas snapshot
pub fn decode(uri: &str) -> Result<Vec<u8>, DataUriError> {
    let (_header, payload) = uri.split_once(";base64,").ok_or(DataUriError::NotBase64)?;
    Ok(STANDARD.decode(payload.trim())?)
}
