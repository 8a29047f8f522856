use crate::file_ref::FileRef;
use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, trace};

/// A detected encoding is trusted only above this confidence.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Charset guess for a byte buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub charset: String,
    pub confidence: f32,
}

impl Detection {
    pub fn detect(bytes: &[u8]) -> Self {
        let (charset, confidence, _language) = chardet::detect(&bytes.to_vec());
        trace!("Detected charset {} with confidence {}", charset, confidence);
        Detection { charset, confidence }
    }

    pub fn is_utf8_or_ascii(&self) -> bool {
        matches!(
            self.charset.to_ascii_lowercase().as_str(),
            "utf-8" | "utf8" | "ascii" | "us-ascii"
        )
    }

    /// The codec to decode with, or `None` when UTF-8 should be used instead.
    pub fn codec(&self) -> Option<&'static Encoding> {
        if self.is_utf8_or_ascii() || self.confidence <= CONFIDENCE_THRESHOLD {
            return None;
        }
        let label = chardet::charset2encoding(&self.charset);
        Encoding::for_label(label.as_bytes())
            .or_else(|| Encoding::for_label(self.charset.as_bytes()))
    }
}

/// Full text of one file after encoding resolution.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub source: FileRef,
    pub text: String,
    pub encoding: &'static str,
}

impl DecodedText {
    pub fn from_bytes(source: FileRef, bytes: &[u8]) -> Self {
        let (text, encoding) = decode(bytes);
        DecodedText {
            source,
            text,
            encoding: encoding.name(),
        }
    }
}

/// Decodes `bytes` into text. Never fails: anything a trusted codec rejects
/// ends up as lossy UTF-8.
pub fn decode(bytes: &[u8]) -> (String, &'static Encoding) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_owned(), UTF_8);
    }

    let detection = Detection::detect(bytes);
    if let Some(encoding) = detection.codec() {
        let (text, used, had_errors) = encoding.decode(bytes);
        if !had_errors {
            debug!("Decoded {} bytes as {}", bytes.len(), used.name());
            return (text.into_owned(), used);
        }
        debug!(
            "{} rejected the buffer, falling back to lossy UTF-8",
            encoding.name()
        );
    }

    (String::from_utf8_lossy(bytes).into_owned(), UTF_8)
}
