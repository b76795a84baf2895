use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Directory under the media root holding light app logos
pub const LOGO_DIR: &str = "applogo";

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("logo payload is empty")]
    Empty,

    #[error("logo is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },

    #[error("unsupported image format")]
    UnsupportedFormat,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Decoded image bytes plus the file extension matching their format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLogo {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Stores base64-encoded logos as files under the media root
#[derive(Debug, Clone)]
pub struct LogoStorage {
    root: PathBuf,
    max_bytes: usize,
}

impl LogoStorage {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    /// Absolute location of a stored logo path
    pub fn path_of(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Decode raw base64 or a `data:image/<type>;base64,` URI
    pub fn decode(&self, payload: &str) -> Result<DecodedLogo, LogoError> {
        let encoded = match payload.trim().strip_prefix("data:") {
            Some(uri) => {
                let (mime, data) = uri.split_once(";base64,").ok_or(LogoError::UnsupportedFormat)?;
                if !mime.starts_with("image/") {
                    return Err(LogoError::UnsupportedFormat);
                }
                data
            }
            None => payload,
        };

        let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if compact.is_empty() {
            return Err(LogoError::Empty);
        }

        // Reject before decoding when the payload clearly exceeds the cap
        let estimated = compact.len() / 4 * 3;
        if estimated > self.max_bytes + 3 {
            return Err(LogoError::TooLarge {
                size: estimated,
                max: self.max_bytes,
            });
        }

        let bytes = BASE64.decode(compact.as_bytes())?;
        if bytes.is_empty() {
            return Err(LogoError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(LogoError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }

        let extension = sniff_extension(&bytes).ok_or(LogoError::UnsupportedFormat)?;
        Ok(DecodedLogo { bytes, extension })
    }

    /// Decode and write the logo, returning its path relative to the media root
    pub async fn save(&self, payload: &str) -> Result<String, LogoError> {
        let logo = self.decode(payload)?;

        let relative = format!("{}/{}.{}", LOGO_DIR, Uuid::new_v4().simple(), logo.extension);
        tokio::fs::create_dir_all(self.root.join(LOGO_DIR)).await?;
        tokio::fs::write(self.path_of(&relative), &logo.bytes).await?;

        debug!("Stored logo {} ({} bytes)", relative, logo.bytes.len());
        Ok(relative)
    }

    /// Remove a previously stored logo; a missing file is not an error
    pub async fn remove(&self, relative: &str) -> Result<(), LogoError> {
        match tokio::fs::remove_file(self.path_of(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else if bytes.starts_with(b"BM") {
        Some("bmp")
    } else if bytes.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
        Some("ico")
    } else {
        None
    }
}
