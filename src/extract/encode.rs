use anyhow::Context as _;
use image::{
    DynamicImage, RgbaImage,
    codecs::{jpeg::JpegEncoder, png::PngEncoder, webp::WebPEncoder},
};

use crate::{
    config::model::{Background, ImageOptions},
    foundation::error::ConvertResult,
};

/// Raster format for per-frame output files and embedded assets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    /// Lossless WebP.
    Webp,
}

impl FrameFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    pub fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }
}

/// Encode straight-alpha RGBA pixels into `opts.format`.
///
/// Formats without alpha are flattened onto the opaque background color. Alpha-capable
/// formats get the background composited underneath only when its alpha is non-zero.
pub fn encode_rgba(mut pixels: RgbaImage, opts: &ImageOptions) -> ConvertResult<Vec<u8>> {
    let bg_alpha = if opts.format.supports_alpha() {
        opts.background.alpha
    } else {
        1.0
    };
    if bg_alpha > 0.0 {
        composite_over(&mut pixels, opts.background, bg_alpha);
    }

    let mut buf = Vec::new();
    let img = DynamicImage::ImageRgba8(pixels);
    match opts.format {
        FrameFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, opts.quality))
            .context("encode jpeg frame")?,
        FrameFormat::Png => img
            .write_with_encoder(PngEncoder::new(&mut buf))
            .context("encode png frame")?,
        FrameFormat::Webp => img
            .write_with_encoder(WebPEncoder::new_lossless(&mut buf))
            .context("encode webp frame")?,
    }
    Ok(buf)
}

/// Source-over composite of `pixels` onto `bg` (straight alpha, in place).
pub fn composite_over(pixels: &mut RgbaImage, bg: Background, bg_alpha: f64) {
    let ba = bg_alpha.clamp(0.0, 1.0);
    let bg_rgb = [f64::from(bg.r), f64::from(bg.g), f64::from(bg.b)];

    for px in pixels.pixels_mut() {
        let sa = f64::from(px.0[3]) / 255.0;
        let out_a = sa + ba * (1.0 - sa);
        if out_a <= 0.0 {
            continue;
        }
        for c in 0..3 {
            let v = (f64::from(px.0[c]) * sa + bg_rgb[c] * ba * (1.0 - sa)) / out_a;
            px.0[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        px.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/extract/encode.rs"]
mod tests;
