//! Encoded copies of the whole canvas, used by the undo history and autosave.
//!
//! Encoding is synchronous. Decoding returns a future: restoring a snapshot onto the live
//! canvas completes at some later point and the session has to account for that.

use futures::future::BoxFuture;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::PixelBuffer;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),

    #[error("Failed to decode snapshot: {0}")]
    Decode(String),

    #[error("Snapshot is {found:?} but the codec reads {expected:?}")]
    FormatMismatch {
        expected: SnapshotFormat,
        found: SnapshotFormat,
    },

    #[error("Snapshot data is truncated")]
    Truncated,

    #[error("Snapshot holds {found} pixel bytes, {width}x{height} needs {expected}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },

    #[error("Snapshot decode was cancelled")]
    Cancelled,
}

/// How the bytes of a [`Snapshot`] are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// A PNG image, like a canvas data URL
    #[default]
    Png,
    /// Little-endian `u32` width and height followed by RGBA bytes
    Raw,
}

/// An immutable, self-contained encoded image of the whole canvas.
///
/// Owns its bytes outright, so no two snapshots share storage.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    format: SnapshotFormat,
    bytes: Vec<u8>,
}

impl Snapshot {
    pub fn new(format: SnapshotFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    pub fn format(&self) -> SnapshotFormat {
        self.format
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
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("format", &self.format)
            .field("bytes", &format!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

pub type DecodeFuture = BoxFuture<'static, Result<PixelBuffer, SnapshotError>>;

/// Turns the live buffer into snapshots and back
pub trait SnapshotCodec: Send + Sync {
    fn format(&self) -> SnapshotFormat;

    /// Encodes the full buffer.
    fn encode(&self, buffer: &PixelBuffer) -> Result<Snapshot, SnapshotError>;

    /// Decodes a snapshot. The work happens when the returned future is polled.
    fn decode(&self, snapshot: Snapshot) -> DecodeFuture;
}

fn check_format(expected: SnapshotFormat, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    if snapshot.format != expected {
        return Err(SnapshotError::FormatMismatch {
            expected,
            found: snapshot.format,
        });
    }
    Ok(())
}

/// PNG snapshots. Smaller than raw ones but slower to produce.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl PngCodec {
    pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, SnapshotError> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(
                buffer.as_raw(),
                buffer.width(),
                buffer.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| SnapshotError::Encode(e.to_string()))?;
        Ok(bytes)
    }

    pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, SnapshotError> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| SnapshotError::Decode(e.to_string()))?;
        Ok(PixelBuffer::from_image(image.into_rgba8()))
    }
}

impl SnapshotCodec for PngCodec {
    fn format(&self) -> SnapshotFormat {
        SnapshotFormat::Png
    }

    fn encode(&self, buffer: &PixelBuffer) -> Result<Snapshot, SnapshotError> {
        Ok(Snapshot::new(SnapshotFormat::Png, Self::encode_png(buffer)?))
    }

    fn decode(&self, snapshot: Snapshot) -> DecodeFuture {
        Box::pin(async move {
            check_format(SnapshotFormat::Png, &snapshot)?;
            Self::decode_png(&snapshot.bytes)
        })
    }
}

/// Uncompressed snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

const RAW_HEADER_LEN: usize = 8;

impl SnapshotCodec for RawCodec {
    fn format(&self) -> SnapshotFormat {
        SnapshotFormat::Raw
    }

    fn encode(&self, buffer: &PixelBuffer) -> Result<Snapshot, SnapshotError> {
        let mut bytes = Vec::with_capacity(RAW_HEADER_LEN + buffer.as_raw().len());
        bytes.extend_from_slice(&buffer.width().to_le_bytes());
        bytes.extend_from_slice(&buffer.height().to_le_bytes());
        bytes.extend_from_slice(buffer.as_raw());
        Ok(Snapshot::new(SnapshotFormat::Raw, bytes))
    }

    fn decode(&self, snapshot: Snapshot) -> DecodeFuture {
        Box::pin(async move {
            check_format(SnapshotFormat::Raw, &snapshot)?;
            let Snapshot { bytes, .. } = snapshot;
            if bytes.len() < RAW_HEADER_LEN {
                return Err(SnapshotError::Truncated);
            }
            let width = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            let height = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
            let pixels = bytes[RAW_HEADER_LEN..].to_vec();
            let expected = PixelBuffer::byte_len(width, height).ok_or(SnapshotError::Truncated)?;
            if pixels.len() != expected {
                return Err(SnapshotError::LengthMismatch {
                    width,
                    height,
                    expected,
                    found: pixels.len(),
                });
            }
            PixelBuffer::from_raw(width, height, pixels).ok_or(SnapshotError::Truncated)
        })
    }
}

/// The codec for a configured snapshot format
pub fn codec_for(format: SnapshotFormat) -> Box<dyn SnapshotCodec> {
    match format {
        SnapshotFormat::Png => Box::new(PngCodec),
        SnapshotFormat::Raw => Box::new(RawCodec),
    }
}
