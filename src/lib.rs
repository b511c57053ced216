//! sprite2lottie slices a grid sprite sheet into frames and packages them as a flip-book
//! Lottie animation.
//!
//! # Pipeline overview
//!
//! 1. **Clean**: remove stale `frame{n}.*` files from the working directory
//! 2. **Resolve**: sheet dimensions + [`LayoutConfig`] -> [`FrameSet`] (one rect per frame)
//! 3. **Extract**: crop, optionally trim, encode and write every frame in parallel
//! 4. **Assemble**: frames -> [`LottieDocument`] with one image asset and one hold-cut
//!    layer per frame, then write the JSON
//!
//! [`convert`] runs all four steps from a [`ConvertConfig`]. Each step is also exported
//! on its own.
#![forbid(unsafe_code)]

mod config;
mod extract;
mod foundation;
mod layout;
mod observe;
mod pipeline;
mod timeline;

pub mod logging;

pub use config::model::{
    Background, ConvertConfig, FrameOrder, Grid, ImageOptions, InputConfig, LayoutConfig,
    OutputConfig,
};
pub use extract::driver::{
    EncodedFrame, ExtractOptions, clean_frames_dir, extract_frames, frame_file_name,
    is_frame_file,
};
pub use extract::encode::{FrameFormat, composite_over, encode_rgba};
pub use extract::sheet::{
    CroppedFrame, ImageSheet, SheetBackend, opaque_bounds, probe_dimensions,
};
pub use foundation::core::{FrameRate, Rect};
pub use foundation::error::{ConvertError, ConvertResult};
pub use layout::resolver::{FrameSet, resolve_frames};
pub use observe::{NoopObserver, PipelineObserver, TracingObserver};
pub use pipeline::{ConvertReport, convert};
pub use timeline::assembler::{
    HOLD_EPSILON, LOTTIE_VERSION, TimelineSpec, assemble_document, data_uri, write_document,
};
pub use timeline::lottie::{
    AnimatedScalar, HoldKeyframe, ImageAsset, ImageLayer, LayerTransform, LottieDocument,
    StaticValue,
};
