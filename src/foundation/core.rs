use crate::foundation::error::{ConvertError, ConvertResult};

/// Pixel rectangle inside a sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge; `None` on overflow.
    pub fn right(self) -> Option<u32> {
        self.left.checked_add(self.width)
    }

    /// Exclusive bottom edge; `None` on overflow.
    pub fn bottom(self) -> Option<u32> {
        self.top.checked_add(self.height)
    }

    pub fn fits_within(self, width: u32, height: u32) -> bool {
        matches!((self.right(), self.bottom()), (Some(r), Some(b)) if r <= width && b <= height)
    }
}

/// Playback rate in frames per second.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FrameRate(pub f64);

impl FrameRate {
    pub fn new(fps: f64) -> ConvertResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ConvertError::config(format!(
                "frame rate must be finite and > 0 (got {fps})"
            )));
        }
        Ok(Self(fps))
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        frames as f64 / self.0
    }
}
