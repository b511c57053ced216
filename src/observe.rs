//! Hooks the conversion pipeline calls at fixed points.

use std::path::Path;

use crate::{
    extract::driver::EncodedFrame, layout::resolver::FrameSet, timeline::lottie::LottieDocument,
};

/// Receives progress notifications from [`crate::convert`].
///
/// All methods default to no-ops. `frame_extracted` runs on extraction worker threads.
pub trait PipelineObserver: Sync {
    fn frames_dir_cleaned(&self, _dir: &Path, _removed: usize) {}

    fn layout_resolved(&self, _sheet_size: (u32, u32), _frames: &FrameSet) {}

    fn frame_extracted(&self, _frame: &EncodedFrame) {}

    fn extraction_completed(&self, _frames: &[EncodedFrame]) {}

    fn document_written(&self, _path: &Path, _doc: &LottieDocument) {}
}

/// Ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Forwards notifications to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn frames_dir_cleaned(&self, dir: &Path, removed: usize) {
        tracing::debug!(dir = %dir.display(), removed, "cleaned frames directory");
    }

    fn layout_resolved(&self, sheet_size: (u32, u32), frames: &FrameSet) {
        let (fw, fh) = frames.nominal_size();
        tracing::info!(
            sheet_width = sheet_size.0,
            sheet_height = sheet_size.1,
            frames = frames.len(),
            frame_width = fw,
            frame_height = fh,
            "layout resolved"
        );
    }

    fn frame_extracted(&self, frame: &EncodedFrame) {
        tracing::trace!(
            index = frame.index,
            width = frame.width,
            height = frame.height,
            bytes = frame.bytes.len(),
            path = %frame.path.display(),
            "frame extracted"
        );
    }

    fn extraction_completed(&self, frames: &[EncodedFrame]) {
        let total_bytes: usize = frames.iter().map(|f| f.bytes.len()).sum();
        tracing::info!(frames = frames.len(), total_bytes, "extraction completed");
    }

    fn document_written(&self, path: &Path, doc: &LottieDocument) {
        tracing::info!(
            path = %path.display(),
            layers = doc.layers.len(),
            duration_secs = doc.duration_secs(),
            "lottie document written"
        );
    }
}
