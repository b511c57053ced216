use std::path::{Path, PathBuf};

use crate::{
    extract::encode::FrameFormat,
    foundation::core::{FrameRate, Rect},
    foundation::error::{ConvertError, ConvertResult},
};

/// Complete description of one conversion run.
///
/// The value is passed explicitly into [`crate::convert`]; nothing in the crate reads
/// configuration from global state.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConvertConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    /// Worker threads for frame extraction. `None` uses rayon defaults.
    #[serde(default)]
    pub threads: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InputConfig {
    pub sprite_path: PathBuf,
    pub num_frames: u32,
    pub frame_rate: f64,
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// How frames are laid out on the sheet.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub grid: Grid,
    #[serde(default)]
    pub order: FrameOrder,
    /// Gutter in pixels between adjacent cells.
    #[serde(default)]
    pub padding: u32,
    /// Strip fully transparent borders from each frame before encoding.
    #[serde(default)]
    pub trim: bool,
    /// Explicit per-frame rects. When non-empty the grid is ignored.
    #[serde(default)]
    pub custom_frames: Vec<Rect>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Grid {
    pub rows: u32,
    pub cols: u32,
}

/// Order in which grid cells map to frame indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOrder {
    /// Left-to-right, then top-to-bottom.
    #[default]
    RowMajor,
    /// Top-to-bottom, then left-to-right.
    ColumnMajor,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OutputConfig {
    pub json_path: PathBuf,
    pub frames_dir: PathBuf,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub image: ImageOptions,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageOptions {
    #[serde(default)]
    pub format: FrameFormat,
    /// 1..=100. Only lossy formats (JPEG) consult it.
    #[serde(default = "default_quality")]
    pub quality: u8,
    #[serde(default)]
    pub background: Background,
}

/// Straight RGBA color composited under each frame. `alpha` is 0..=1.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Background {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

fn default_name() -> String {
    "SpriteAnimation".to_string()
}

fn default_quality() -> u8 {
    100
}

impl Default for Grid {
    fn default() -> Self {
        Self { rows: 1, cols: 1 }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            order: FrameOrder::RowMajor,
            padding: 0,
            trim: false,
            custom_frames: Vec::new(),
        }
    }
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            format: FrameFormat::Png,
            quality: default_quality(),
            background: Background::default(),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input: InputConfig {
                sprite_path: PathBuf::from("sprite.png"),
                num_frames: 16,
                frame_rate: 12.0,
                layout: LayoutConfig {
                    grid: Grid { rows: 4, cols: 4 },
                    ..LayoutConfig::default()
                },
            },
            output: OutputConfig {
                json_path: PathBuf::from("sprite.json"),
                frames_dir: PathBuf::from("frames"),
                name: default_name(),
                image: ImageOptions::default(),
            },
            threads: None,
        }
    }
}

impl ConvertConfig {
    /// Read, path-resolve and validate a JSON config file.
    ///
    /// Relative paths inside the file are resolved against the file's directory.
    pub fn from_path(path: &Path) -> ConvertResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        let mut cfg: Self = serde_json::from_str(&text).map_err(|e| {
            ConvertError::config(format!("parse config '{}': {e}", path.display()))
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        cfg.resolve_paths(base);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_pretty(&self) -> ConvertResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConvertError::serde(e.to_string()))
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        fn rebase(base: &Path, p: &mut PathBuf) {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
        rebase(base, &mut self.input.sprite_path);
        rebase(base, &mut self.output.json_path);
        rebase(base, &mut self.output.frames_dir);
    }

    pub fn frame_rate(&self) -> ConvertResult<FrameRate> {
        FrameRate::new(self.input.frame_rate)
    }

    pub fn validate(&self) -> ConvertResult<()> {
        if self.input.num_frames == 0 {
            return Err(ConvertError::invalid_layout("num_frames must be > 0"));
        }
        self.frame_rate()?;

        let layout = &self.input.layout;
        if layout.custom_frames.is_empty() && (layout.grid.rows == 0 || layout.grid.cols == 0) {
            return Err(ConvertError::invalid_layout(format!(
                "grid must have rows > 0 and cols > 0 (got {}x{})",
                layout.grid.rows, layout.grid.cols
            )));
        }

        let image = &self.output.image;
        if !(1..=100).contains(&image.quality) {
            return Err(ConvertError::config(format!(
                "image quality must be in 1..=100 (got {})",
                image.quality
            )));
        }
        let alpha = image.background.alpha;
        if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
            return Err(ConvertError::config(format!(
                "background alpha must be in 0..=1 (got {alpha})"
            )));
        }

        if self.threads == Some(0) {
            return Err(ConvertError::config("threads must be >= 1 when set"));
        }
        if self.output.name.trim().is_empty() {
            return Err(ConvertError::config("output name must be non-empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
