//! Encoded image input for the analyzer.
//!
//! Images reach the analyzer either as a `data:<mime>;base64,<payload>`
//! string (what a browser `FileReader` or the CLI produce) or as raw bytes.
//! Both end up as an [`EncodedImage`]: a base64 payload plus a MIME tag.

use base64::Engine;

/// MIME type assumed when none can be derived from the input.
pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// Base64-encoded image ready to send to the inference service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Base64-encoded image bytes, passed through verbatim
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl EncodedImage {
    pub fn new(data: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    /// Split a data URI into MIME type and payload.
    ///
    /// The header/payload boundary is the first comma. The MIME type is the
    /// text between the first `:` and the next `;` of the header; when that
    /// is missing (or there is no comma at all) it falls back to
    /// [`DEFAULT_MEDIA_TYPE`]. The payload is not validated as base64 here.
    pub fn from_data_uri(input: &str) -> Self {
        let Some(comma) = input.find(',') else {
            return Self::new(input, DEFAULT_MEDIA_TYPE);
        };

        let header = &input[..comma];
        let payload = &input[comma + 1..];
        let media_type = media_type_from_header(header).unwrap_or(DEFAULT_MEDIA_TYPE);

        Self::new(payload, media_type)
    }

    /// Encode raw image bytes, sniffing the MIME type from magic bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let media_type = sniff_media_type(bytes).unwrap_or_else(|| {
            tracing::warn!("Unrecognized image signature, defaulting to {DEFAULT_MEDIA_TYPE}");
            DEFAULT_MEDIA_TYPE
        });

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Return the image as a data URI.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Extract `<mime>` from a `data:<mime>;base64` header.
fn media_type_from_header(header: &str) -> Option<&str> {
    let start = header.find(':')? + 1;
    let len = header[start..].find(';')?;
    let media_type = &header[start..start + len];
    (!media_type.is_empty()).then_some(media_type)
}

/// Identify common image formats by their leading signature bytes.
pub fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }

    // JPEG: FF D8 FF
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Some("image/png");
    }

    // GIF: GIF8
    if bytes.starts_with(b"GIF8") {
        return Some("image/gif");
    }

    // WebP: RIFF....WEBP
    if bytes.starts_with(b"RIFF") && bytes.len() >= 12 && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    // BMP: BM
    if bytes.starts_with(b"BM") {
        return Some("image/bmp");
    }

    // TIFF: II (little-endian) or MM (big-endian) followed by version 42
    if bytes.starts_with(&[b'I', b'I', 0x2A, 0x00]) || bytes.starts_with(&[b'M', b'M', 0x00, 0x2A])
    {
        return Some("image/tiff");
    }

    // ISO-BMFF: ftyp box at offset 4, brand decides HEIC vs AVIF
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        return match &bytes[8..12] {
            b"avif" | b"avis" => Some("image/avif"),
            b"mif1" | b"msf1" => Some("image/heif"),
            _ => Some("image/heic"),
        };
    }

    None
}
