//! Encoded still images exchanged between the camera, gateways and the store.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::{MirageError, Result};

static DATA_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:(image/[\w.+-]+);base64,(.*)$").expect("data URL pattern is valid")
});

/// An encoded still image (JPEG, PNG, ...) together with its MIME type.
///
/// The kiosk never decodes pixels; images travel as opaque bytes from the
/// camera to the generation provider and on to the artifact store.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime_type: String,
    bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Parses a `data:image/...;base64,...` URL.
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let captures = DATA_URL
            .captures(data_url.trim())
            .ok_or_else(|| MirageError::invalid_image("Invalid base64 image data"))?;

        let mime_type = captures[1].to_string();
        let bytes = BASE64_STANDARD
            .decode(&captures[2])
            .map_err(|e| MirageError::invalid_image(format!("Invalid base64 payload: {e}")))?;

        Ok(Self { mime_type, bytes })
    }

    /// Decodes a bare base64 payload with a known MIME type.
    pub fn from_base64(mime_type: impl Into<String>, data: &str) -> Result<Self> {
        let bytes = BASE64_STANDARD
            .decode(data)
            .map_err(|e| MirageError::invalid_image(format!("Invalid base64 payload: {e}")))?;
        Ok(Self::new(mime_type, bytes))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.bytes)
    }

    /// File extension for this image's MIME type, `bin` when unknown.
    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            other => mime_guess::get_mime_extensions_str(other)
                .and_then(|exts| exts.first().copied())
                .unwrap_or("bin"),
        }
    }
}

// Payloads are megabytes of base64; keep them out of logs.
impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
