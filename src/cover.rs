//! Album art loading.
//!
//! Covers are decoded with the `image` crate and scaled down to a small
//! thumbnail; the UI paints them with half-block cells, two pixel rows per
//! terminal row. Decode failures are never fatal: the caller falls back to
//! the "No Cover" placeholder.

use std::path::Path;

use image::{ImageReader, RgbaImage};
use tracing::warn;

/// Maximum thumbnail edge in pixels. Two pixel rows map onto one terminal
/// cell row, so this paints as a pane of at most 40x20 cells.
const THUMB_SIZE: u32 = 40;

/// A decoded, downscaled album cover.
pub struct CoverArt {
    image: RgbaImage,
}

impl CoverArt {
    /// Decode and downscale the image at `path`. The format is sniffed from
    /// the file contents, not the extension (embedded covers are exported
    /// with a generic extension).
    pub fn load(path: &Path) -> Option<Self> {
        let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
            Ok(r) => r,
            Err(e) => {
                warn!("could not open cover {}: {e}", path.display());
                return None;
            }
        };

        match reader.decode() {
            Ok(img) => {
                let image = img.thumbnail(THUMB_SIZE, THUMB_SIZE).to_rgba8();
                Some(Self { image })
            }
            Err(e) => {
                warn!("could not decode cover {}: {e}", path.display());
                None
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGB of the pixel at `(x, y)`, with alpha composited over black.
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let p = self.image.get_pixel(x, y);
        let a = p[3] as u16;
        (
            ((p[0] as u16 * a) / 255) as u8,
            ((p[1] as u16 * a) / 255) as u8,
            ((p[2] as u16 * a) / 255) as u8,
        )
    }
}
