//! Upload surface: turns command-line inputs into encoded images.
//!
//! An input is either a literal `data:` URI or a path to an image file.
//! Files are checked for existence, size and image signature before any
//! bytes are sent anywhere.

use anyhow::{bail, Context};
use floradoc_core::image::sniff_media_type;
use floradoc_core::EncodedImage;
use std::path::PathBuf;

/// Label used in reports for inputs given as a data URI.
pub const DATA_URI_LABEL: &str = "data-uri";

/// An image ready for analysis, plus the name it is reported under.
#[derive(Debug)]
pub struct LoadedImage {
    pub label: String,
    pub image: EncodedImage,
}

/// Name an input is reported under, even when loading it fails.
pub fn label_for(raw: &str) -> String {
    if is_data_uri(raw) {
        DATA_URI_LABEL.to_string()
    } else {
        raw.to_string()
    }
}

fn is_data_uri(raw: &str) -> bool {
    raw.starts_with("data:")
}

/// Load one input, enforcing `max_bytes` on files.
pub async fn load(raw: &str, max_bytes: u64) -> anyhow::Result<LoadedImage> {
    if is_data_uri(raw) {
        let image = EncodedImage::from_data_uri(raw);
        if image.is_empty() {
            bail!("data URI has an empty payload");
        }
        return Ok(LoadedImage {
            label: DATA_URI_LABEL.to_string(),
            image,
        });
    }

    let path = PathBuf::from(shellexpand::tilde(raw).into_owned());
    let metadata = tokio::fs::metadata(&path)
        .await
        .with_context(|| format!("File not found: {}", path.display()))?;

    if !metadata.is_file() {
        bail!("Not a file: {}", path.display());
    }
    if metadata.len() == 0 {
        bail!("File is empty: {}", path.display());
    }
    if metadata.len() > max_bytes {
        bail!(
            "File too large: {} ({}MB > {}MB)",
            path.display(),
            metadata.len() / (1024 * 1024),
            max_bytes / (1024 * 1024)
        );
    }

    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if sniff_media_type(&bytes).is_none() {
        bail!(
            "Unrecognized image format (invalid magic bytes): {}",
            path.display()
        );
    }

    tracing::debug!("Loaded {} ({} bytes)", path.display(), bytes.len());
    Ok(LoadedImage {
        label: raw.to_string(),
        image: EncodedImage::from_bytes(&bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;
    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[tokio::test]
    async fn test_load_data_uri() {
        let loaded = load("data:image/png;base64,iVBORw0KGgo=", MB).await.unwrap();
        assert_eq!(loaded.label, DATA_URI_LABEL);
        assert_eq!(loaded.image.media_type, "image/png");
        assert_eq!(loaded.image.data, "iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_load_data_uri_rejects_empty_payload() {
        let err = load("data:image/png;base64,", MB).await.unwrap_err();
        assert!(err.to_string().contains("empty payload"));
    }

    #[tokio::test]
    async fn test_load_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.png");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let raw = path.to_string_lossy().into_owned();
        let loaded = load(&raw, MB).await.unwrap();
        assert_eq!(loaded.label, raw);
        assert_eq!(loaded.image.media_type, "image/png");
        assert_eq!(loaded.image.data, "iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load("/definitely/not/here/leaf.jpg", MB).await.unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[tokio::test]
    async fn test_load_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        let mut bytes = PNG_HEADER.to_vec();
        bytes.resize(2048, 0);
        std::fs::write(&path, bytes).unwrap();

        let err = load(&path.to_string_lossy(), 1024).await.unwrap_err();
        assert!(err.to_string().contains("File too large"));
    }

    #[tokio::test]
    async fn test_load_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "water the ferns on tuesday").unwrap();

        let err = load(&path.to_string_lossy(), MB).await.unwrap_err();
        assert!(err.to_string().contains("Unrecognized image format"));
    }

    #[test]
    fn test_label_for() {
        assert_eq!(label_for("data:image/png;base64,AAAA"), DATA_URI_LABEL);
        assert_eq!(label_for("~/photos/leaf.jpg"), "~/photos/leaf.jpg");
    }
}
