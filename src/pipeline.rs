use std::path::PathBuf;

use crate::{
    config::model::ConvertConfig,
    extract::driver::{ExtractOptions, clean_frames_dir, extract_frames},
    extract::sheet::{ImageSheet, SheetBackend as _, probe_dimensions},
    foundation::error::{ConvertError, ConvertResult},
    layout::resolver::resolve_frames,
    observe::PipelineObserver,
    timeline::assembler::{TimelineSpec, assemble_document, write_document},
};

/// Summary of a successful [`convert`] run.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertReport {
    pub frames: usize,
    pub frame_width: u32,
    pub frame_height: u32,
    pub duration_secs: f64,
    pub frames_dir: PathBuf,
    pub json_path: PathBuf,
}

/// Run the full sheet-to-Lottie conversion described by `cfg`.
///
/// Steps:
/// 1. clean the frames directory
/// 2. read the sheet's dimensions and resolve frame rects
/// 3. crop + encode every frame in parallel, writing `frame{n}.{ext}`
/// 4. assemble the Lottie document and write it to `cfg.output.json_path`
///
/// The JSON file is only written when every earlier step succeeded.
#[tracing::instrument(skip_all, fields(sprite = %cfg.input.sprite_path.display()))]
pub fn convert(
    cfg: &ConvertConfig,
    observer: &dyn PipelineObserver,
) -> ConvertResult<ConvertReport> {
    cfg.validate()?;
    let frame_rate = cfg.frame_rate()?;
    let frames_dir = &cfg.output.frames_dir;

    let removed = clean_frames_dir(frames_dir)?;
    observer.frames_dir_cleaned(frames_dir, removed);

    let (sheet_w, sheet_h) = probe_dimensions(&cfg.input.sprite_path)?;
    let frame_set = resolve_frames(sheet_w, sheet_h, cfg.input.num_frames, &cfg.input.layout)?;
    observer.layout_resolved((sheet_w, sheet_h), &frame_set);

    let sheet = ImageSheet::open(&cfg.input.sprite_path)?;
    if sheet.dimensions() != (sheet_w, sheet_h) {
        return Err(ConvertError::invalid_layout(format!(
            "decoded sheet is {}x{} but its header reported {sheet_w}x{sheet_h}",
            sheet.dimensions().0,
            sheet.dimensions().1
        )));
    }

    let opts = ExtractOptions {
        image: cfg.output.image,
        trim: cfg.input.layout.trim,
        threads: cfg.threads,
    };
    let frames = extract_frames(&sheet, &frame_set, &opts, frames_dir, observer)?;
    observer.extraction_completed(&frames);

    let (frame_width, frame_height) = frame_set.nominal_size();
    let doc = assemble_document(
        &frames,
        &TimelineSpec {
            frame_rate,
            width: frame_width,
            height: frame_height,
            name: &cfg.output.name,
            format: cfg.output.image.format,
        },
    )?;
    write_document(&doc, &cfg.output.json_path)?;
    observer.document_written(&cfg.output.json_path, &doc);

    Ok(ConvertReport {
        frames: frames.len(),
        frame_width,
        frame_height,
        duration_secs: doc.duration_secs(),
        frames_dir: frames_dir.clone(),
        json_path: cfg.output.json_path.clone(),
    })
}
