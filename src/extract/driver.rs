use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::{
    config::model::ImageOptions,
    extract::encode::{FrameFormat, encode_rgba},
    extract::sheet::SheetBackend,
    foundation::core::Rect,
    foundation::error::{ConvertError, ConvertResult},
    layout::resolver::FrameSet,
    observe::PipelineObserver,
};

#[derive(Clone, Debug)]
pub struct ExtractOptions {
    pub image: ImageOptions,
    pub trim: bool,
    /// Override rayon worker threads. `None` or `Some(0)` uses rayon defaults.
    pub threads: Option<usize>,
}

/// One encoded frame, also written to disk at `path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedFrame {
    pub index: usize,
    pub bytes: Vec<u8>,
    /// Encoded size; smaller than the source rect when trimmed.
    pub width: u32,
    pub height: u32,
    /// Top-left of the encoded image inside its source rect.
    pub offset_x: u32,
    pub offset_y: u32,
    pub path: PathBuf,
}

/// `frame{n}.{ext}` with 1-based `n`.
pub fn frame_file_name(index: usize, format: FrameFormat) -> String {
    format!("frame{}.{}", index + 1, format.extension())
}

/// Whether `name` looks like a file produced by [`frame_file_name`] in any format.
pub fn is_frame_file(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("frame") else {
        return false;
    };
    let Some((digits, ext)) = rest.split_once('.') else {
        return false;
    };
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && FrameFormat::from_extension(ext).is_some()
}

/// Create `dir` if needed and delete stale frame files from earlier runs.
///
/// Returns how many files were removed. Files not matching [`is_frame_file`] are kept.
pub fn clean_frames_dir(dir: &Path) -> ConvertResult<usize> {
    std::fs::create_dir_all(dir).map_err(|e| ConvertError::io(dir, e))?;

    let mut removed = 0usize;
    for entry in std::fs::read_dir(dir).map_err(|e| ConvertError::io(dir, e))? {
        let entry = entry.map_err(|e| ConvertError::io(dir, e))?;
        let path = entry.path();
        let is_file = entry
            .file_type()
            .map_err(|e| ConvertError::io(&path, e))?
            .is_file();
        let name = entry.file_name();
        if !is_file || !name.to_str().is_some_and(is_frame_file) {
            continue;
        }
        std::fs::remove_file(&path).map_err(|e| ConvertError::io(&path, e))?;
        removed += 1;
    }
    Ok(removed)
}

/// Crop, encode and write every frame of `frames` in parallel.
///
/// Frames come back in index order. If any frame fails, the error for the lowest failing
/// index is returned; files already written by other workers are left in place.
pub fn extract_frames(
    sheet: &dyn SheetBackend,
    frames: &FrameSet,
    opts: &ExtractOptions,
    dir: &Path,
    observer: &dyn PipelineObserver,
) -> ConvertResult<Vec<EncodedFrame>> {
    let pool = extraction_pool(opts.threads)?;

    let results = pool.install(|| {
        frames
            .rects()
            .par_iter()
            .enumerate()
            .map(|(index, rect)| -> ConvertResult<EncodedFrame> {
                let frame = extract_one(sheet, index, *rect, opts, dir)?;
                observer.frame_extracted(&frame);
                Ok(frame)
            })
            .collect::<Vec<_>>()
    });

    let mut out = Vec::with_capacity(results.len());
    for item in results {
        out.push(item?);
    }
    Ok(out)
}

fn extract_one(
    sheet: &dyn SheetBackend,
    index: usize,
    rect: Rect,
    opts: &ExtractOptions,
    dir: &Path,
) -> ConvertResult<EncodedFrame> {
    let (w, h) = sheet.dimensions();
    if !rect.fits_within(w, h) {
        return Err(ConvertError::extraction(
            index,
            format!("rect {rect:?} exceeds sheet bounds {w}x{h}"),
        ));
    }

    let cropped = sheet
        .crop(rect, opts.trim)
        .map_err(|e| ConvertError::extraction(index, e))?;
    let (width, height) = cropped.pixels.dimensions();

    let bytes =
        encode_rgba(cropped.pixels, &opts.image).map_err(|e| ConvertError::extraction(index, e))?;

    let path = dir.join(frame_file_name(index, opts.image.format));
    std::fs::write(&path, &bytes).map_err(|e| {
        ConvertError::extraction(index, format!("write '{}': {e}", path.display()))
    })?;

    Ok(EncodedFrame {
        index,
        bytes,
        width,
        height,
        offset_x: cropped.offset_x,
        offset_y: cropped.offset_y,
        path,
    })
}

fn extraction_pool(threads: Option<usize>) -> ConvertResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or(0))
        .thread_name(|i| format!("sprite2lottie-extract-{i}"))
        .build()
        .map_err(|e| ConvertError::Other(anyhow::anyhow!("build extraction pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/extract/driver.rs"]
mod tests;
