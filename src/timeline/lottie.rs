//! Serde model for the subset of the Lottie schema this crate emits.
//!
//! Field names follow the Lottie JSON keys; see the per-field docs for their meaning.

use crate::foundation::{
    core::FrameRate,
    error::{ConvertError, ConvertResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LottieDocument {
    /// Schema version.
    pub v: String,
    /// Frame rate.
    pub fr: f64,
    /// In point (first frame).
    pub ip: u32,
    /// Out point (exclusive), i.e. total frames.
    pub op: u32,
    pub w: u32,
    pub h: u32,
    pub nm: String,
    pub ddd: u8,
    pub assets: Vec<ImageAsset>,
    pub layers: Vec<ImageLayer>,
}

/// Image asset with inline data (`e = 1`).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageAsset {
    pub id: String,
    /// Data URI.
    pub p: String,
    pub u: String,
    pub w: u32,
    pub h: u32,
    pub e: u8,
}

/// Image layer (`ty = 2`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageLayer {
    pub ddd: u8,
    pub ind: u32,
    pub ty: u8,
    pub nm: String,
    #[serde(rename = "refId")]
    pub ref_id: String,
    /// Time stretch.
    pub sr: u32,
    pub ks: LayerTransform,
    pub ao: u8,
    pub ip: u32,
    pub op: u32,
    /// Start time.
    pub st: u32,
    /// Blend mode.
    pub bm: u8,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerTransform {
    /// Opacity, 0..=100.
    pub o: AnimatedScalar,
    /// Rotation in degrees.
    pub r: StaticValue<f64>,
    /// Position.
    pub p: StaticValue<[f64; 3]>,
    /// Anchor point.
    pub a: StaticValue<[f64; 3]>,
    /// Scale in percent.
    pub s: StaticValue<[f64; 3]>,
}

/// Non-animated property (`a = 0`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StaticValue<T> {
    pub a: u8,
    pub k: T,
}

impl<T> StaticValue<T> {
    pub fn new(k: T) -> Self {
        Self { a: 0, k }
    }
}

/// Keyframed scalar property (`a = 1`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimatedScalar {
    pub a: u8,
    pub k: Vec<HoldKeyframe>,
}

/// Keyframe whose value holds until the next keyframe (`h = 1`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HoldKeyframe {
    pub t: f64,
    pub s: [f64; 1],
    pub h: u8,
}

impl HoldKeyframe {
    pub fn new(t: f64, value: f64) -> Self {
        Self {
            t,
            s: [value],
            h: 1,
        }
    }
}

impl LottieDocument {
    pub fn duration_secs(&self) -> f64 {
        FrameRate(self.fr).frames_to_secs(u64::from(self.op.saturating_sub(self.ip)))
    }

    /// Check the flip-book invariants: one asset and one layer per frame, layer `i`
    /// referencing asset `i`, and layer windows `[i, i+1)` tiling `[ip, op)`.
    pub fn validate(&self) -> ConvertResult<()> {
        let n = self.op.saturating_sub(self.ip) as usize;
        if self.assets.len() != n || self.layers.len() != n {
            return Err(ConvertError::serde(format!(
                "lottie document has {} assets and {} layers for {n} frames",
                self.assets.len(),
                self.layers.len()
            )));
        }

        let mut cursor = self.ip;
        for (layer, asset) in self.layers.iter().zip(&self.assets) {
            if layer.ip != cursor || layer.op != cursor + 1 {
                return Err(ConvertError::serde(format!(
                    "layer '{}' window [{}, {}) does not continue the timeline at {cursor}",
                    layer.nm, layer.ip, layer.op
                )));
            }
            if layer.ref_id != asset.id {
                return Err(ConvertError::serde(format!(
                    "layer '{}' references '{}' but its asset is '{}'",
                    layer.nm, layer.ref_id, asset.id
                )));
            }
            cursor += 1;
        }
        Ok(())
    }
}
