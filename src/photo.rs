//! Encoded photo buffers.
//!
//! Captures and uploads arrive as encoded raster buffers (the booth's wire
//! form is a base64 data URI). A [`Photo`] keeps the encoded bytes plus a
//! processed marker that only the post-processing pipeline sets; the marker
//! is what stops a photo from being filtered twice when it is redrawn across
//! review / retake / compose.

use base64::Engine as _;
use image::RgbaImage;

use crate::{
    assets,
    error::{BoothError, BoothResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PhotoFormat {
    Png,
    Jpeg,
}

impl PhotoFormat {
    pub fn mime(self) -> &'static str {
        match self {
            PhotoFormat::Png => "image/png",
            PhotoFormat::Jpeg => "image/jpeg",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Photo {
    bytes: Vec<u8>,
    format: PhotoFormat,
    processed: bool,
}

impl Photo {
    /// Wraps freshly captured or uploaded bytes. The format is sniffed from
    /// the content; unsupported containers are a decode error.
    pub fn from_bytes(bytes: Vec<u8>) -> BoothResult<Self> {
        let format = match image::guess_format(&bytes) {
            Ok(image::ImageFormat::Png) => PhotoFormat::Png,
            Ok(image::ImageFormat::Jpeg) => PhotoFormat::Jpeg,
            Ok(other) => {
                return Err(BoothError::decode(format!(
                    "unsupported photo container {other:?}"
                )))
            }
            Err(e) => return Err(BoothError::decode(format!("unrecognized photo data: {e}"))),
        };
        Ok(Self {
            bytes,
            format,
            processed: false,
        })
    }

    /// Parses a `data:image/...;base64,` URI.
    pub fn from_data_uri(uri: &str) -> BoothResult<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| BoothError::decode("photo data URI must start with 'data:'"))?;
        let (_mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| BoothError::decode("photo data URI must be base64-encoded"))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| BoothError::decode(format!("invalid base64 payload: {e}")))?;
        Self::from_bytes(bytes)
    }

    /// Marks pipeline output. Only `process` constructs these.
    pub(crate) fn processed_jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            format: PhotoFormat::Jpeg,
            processed: true,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> PhotoFormat {
        self.format
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    pub fn decode(&self) -> BoothResult<RgbaImage> {
        assets::decode_rgba(&self.bytes)
    }
}
