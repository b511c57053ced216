use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};

use crate::{
    extract::driver::EncodedFrame,
    extract::encode::FrameFormat,
    foundation::core::FrameRate,
    foundation::error::{ConvertError, ConvertResult},
    timeline::lottie::{
        AnimatedScalar, HoldKeyframe, ImageAsset, ImageLayer, LayerTransform, LottieDocument,
        StaticValue,
    },
};

pub const LOTTIE_VERSION: &str = "5.9.0";

/// Fraction of a frame before the cut where a layer is still fully opaque.
pub const HOLD_EPSILON: f64 = 0.01;

/// Document-level inputs for [`assemble_document`].
#[derive(Clone, Debug)]
pub struct TimelineSpec<'a> {
    pub frame_rate: FrameRate,
    /// Nominal (untrimmed) frame size; becomes the document canvas.
    pub width: u32,
    pub height: u32,
    pub name: &'a str,
    pub format: FrameFormat,
}

pub fn data_uri(bytes: &[u8], format: FrameFormat) -> String {
    format!("data:{};base64,{}", format.mime(), BASE64_STANDARD.encode(bytes))
}

/// Build a flip-book document: frame `i` becomes asset `image_{i}` and a layer that is
/// opaque for `[i, i+1)` and transparent everywhere else.
///
/// Each layer is anchored at its image's center. The position places the image's
/// top-left at its trim offset inside the cell, so trimmed frames do not drift relative
/// to untrimmed ones.
pub fn assemble_document(
    frames: &[EncodedFrame],
    spec: &TimelineSpec<'_>,
) -> ConvertResult<LottieDocument> {
    if frames.is_empty() {
        return Err(ConvertError::invalid_layout(
            "cannot assemble a document without frames",
        ));
    }

    let mut assets = Vec::with_capacity(frames.len());
    let mut layers = Vec::with_capacity(frames.len());

    for (i, frame) in frames.iter().enumerate() {
        if frame.index != i {
            return Err(ConvertError::invalid_layout(format!(
                "frame at position {i} carries index {}",
                frame.index
            )));
        }

        let id = format!("image_{i}");
        assets.push(ImageAsset {
            id: id.clone(),
            p: data_uri(&frame.bytes, spec.format),
            u: String::new(),
            w: frame.width,
            h: frame.height,
            e: 1,
        });
        layers.push(frame_layer(i as u32, id, frame));
    }

    let doc = LottieDocument {
        v: LOTTIE_VERSION.to_string(),
        fr: spec.frame_rate.as_f64(),
        ip: 0,
        op: frames.len() as u32,
        w: spec.width,
        h: spec.height,
        nm: spec.name.to_string(),
        ddd: 0,
        assets,
        layers,
    };
    doc.validate()?;
    Ok(doc)
}

fn frame_layer(i: u32, ref_id: String, frame: &EncodedFrame) -> ImageLayer {
    let half_w = f64::from(frame.width) / 2.0;
    let half_h = f64::from(frame.height) / 2.0;
    let t = f64::from(i);

    ImageLayer {
        ddd: 0,
        ind: i + 1,
        ty: 2,
        nm: format!("Frame {}", i + 1),
        ref_id,
        sr: 1,
        ks: LayerTransform {
            o: AnimatedScalar {
                a: 1,
                k: vec![
                    HoldKeyframe::new(t, 100.0),
                    HoldKeyframe::new(t + (1.0 - HOLD_EPSILON), 100.0),
                    HoldKeyframe::new(t + 1.0, 0.0),
                ],
            },
            r: StaticValue::new(0.0),
            p: StaticValue::new([
                f64::from(frame.offset_x) + half_w,
                f64::from(frame.offset_y) + half_h,
                0.0,
            ]),
            a: StaticValue::new([half_w, half_h, 0.0]),
            s: StaticValue::new([100.0, 100.0, 100.0]),
        },
        ao: 0,
        ip: i,
        op: i + 1,
        st: 0,
        bm: 0,
    }
}

/// Persist `doc` as pretty-printed JSON, creating parent directories as needed.
pub fn write_document(doc: &LottieDocument, path: &Path) -> ConvertResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConvertError::io(parent, e))?;
    }
    let json = serde_json::to_vec_pretty(doc).map_err(|e| ConvertError::serde(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| ConvertError::io(path, e))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assembler.rs"]
mod tests;
