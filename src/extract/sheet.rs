use std::path::Path;

use anyhow::Context as _;
use image::{GenericImageView as _, RgbaImage};

use crate::{
    foundation::core::Rect,
    foundation::error::{ConvertError, ConvertResult},
};

/// Pixels cropped out of a sheet, plus where the (possibly trimmed) image sits inside the
/// requested rect.
#[derive(Clone, Debug)]
pub struct CroppedFrame {
    pub pixels: RgbaImage,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Read-only access to a decoded sprite sheet.
///
/// Implementations are shared across extraction workers, hence `Sync`.
pub trait SheetBackend: Sync {
    fn dimensions(&self) -> (u32, u32);

    /// Crop `rect`, optionally trimming fully transparent borders.
    fn crop(&self, rect: Rect, trim: bool) -> ConvertResult<CroppedFrame>;
}

/// [`SheetBackend`] over an in-memory RGBA8 image.
#[derive(Clone, Debug)]
pub struct ImageSheet {
    rgba: RgbaImage,
}

impl ImageSheet {
    pub fn open(path: &Path) -> ConvertResult<Self> {
        let img = image::open(path)
            .with_context(|| format!("decode sprite sheet '{}'", path.display()))?;
        Ok(Self::from_rgba(img.to_rgba8()))
    }

    pub fn from_rgba(rgba: RgbaImage) -> Self {
        Self { rgba }
    }
}

impl SheetBackend for ImageSheet {
    fn dimensions(&self) -> (u32, u32) {
        self.rgba.dimensions()
    }

    fn crop(&self, rect: Rect, trim: bool) -> ConvertResult<CroppedFrame> {
        let (w, h) = self.dimensions();
        if !rect.fits_within(w, h) {
            return Err(ConvertError::invalid_layout(format!(
                "rect {rect:?} exceeds sheet bounds {w}x{h}"
            )));
        }

        let pixels = self
            .rgba
            .view(rect.left, rect.top, rect.width, rect.height)
            .to_image();
        if !trim {
            return Ok(CroppedFrame {
                pixels,
                offset_x: 0,
                offset_y: 0,
            });
        }

        match opaque_bounds(&pixels) {
            Some(b) if b.width != rect.width || b.height != rect.height => Ok(CroppedFrame {
                pixels: pixels.view(b.left, b.top, b.width, b.height).to_image(),
                offset_x: b.left,
                offset_y: b.top,
            }),
            _ => Ok(CroppedFrame {
                pixels,
                offset_x: 0,
                offset_y: 0,
            }),
        }
    }
}

/// Pixel dimensions from the image header, without decoding pixel data.
pub fn probe_dimensions(path: &Path) -> ConvertResult<(u32, u32)> {
    let reader = image::ImageReader::open(path)
        .map_err(|e| ConvertError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| ConvertError::io(path, e))?;
    let dims = reader
        .into_dimensions()
        .with_context(|| format!("read image header '{}'", path.display()))?;
    Ok(dims)
}

/// Smallest rect containing every pixel with non-zero alpha. `None` if fully transparent.
pub fn opaque_bounds(img: &RgbaImage) -> Option<Rect> {
    let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
    let (mut max_x, mut max_y) = (0u32, 0u32);
    let mut any = false;

    for (x, y, px) in img.enumerate_pixels() {
        if px.0[3] == 0 {
            continue;
        }
        any = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    any.then(|| Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

#[cfg(test)]
#[path = "../../tests/unit/extract/sheet.rs"]
mod tests;
