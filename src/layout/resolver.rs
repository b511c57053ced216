use crate::{
    config::model::{FrameOrder, LayoutConfig},
    foundation::core::Rect,
    foundation::error::{ConvertError, ConvertResult},
};

/// Ordered frame rects for one sheet. Index order is playback order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FrameSet {
    rects: Vec<Rect>,
    frame_width: u32,
    frame_height: u32,
}

impl FrameSet {
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rect> {
        self.rects.get(index).copied()
    }

    /// Untrimmed frame size used for the document canvas.
    ///
    /// Grid layouts report the cell size; custom layouts report the first rect's size.
    pub fn nominal_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }
}

/// Turn sheet dimensions and a layout into per-frame rects.
///
/// Custom frames, when present, are used verbatim and the grid is ignored. Otherwise the
/// sheet is divided into `rows x cols` equal cells (separated by `padding` pixels) and
/// cells are numbered according to `layout.order`.
///
/// Sheet-bounds containment of custom rects is checked at extraction time, where the
/// failing frame index can be reported.
pub fn resolve_frames(
    sheet_width: u32,
    sheet_height: u32,
    num_frames: u32,
    layout: &LayoutConfig,
) -> ConvertResult<FrameSet> {
    if num_frames == 0 {
        return Err(ConvertError::invalid_layout("num_frames must be > 0"));
    }

    if !layout.custom_frames.is_empty() {
        return resolve_custom(num_frames, &layout.custom_frames);
    }

    let rows = layout.grid.rows;
    let cols = layout.grid.cols;
    if rows == 0 || cols == 0 {
        return Err(ConvertError::invalid_layout(format!(
            "grid must have rows > 0 and cols > 0 (got {rows}x{cols})"
        )));
    }

    let capacity = u64::from(rows) * u64::from(cols);
    if u64::from(num_frames) > capacity {
        return Err(ConvertError::invalid_layout(format!(
            "{num_frames} frames do not fit a {rows}x{cols} grid ({capacity} cells)"
        )));
    }

    let cell_w = cell_extent(sheet_width, cols, layout.padding);
    let cell_h = cell_extent(sheet_height, rows, layout.padding);
    if cell_w == 0 || cell_h == 0 {
        return Err(ConvertError::invalid_layout(format!(
            "sheet {sheet_width}x{sheet_height} with a {rows}x{cols} grid and padding {} \
             yields an empty cell ({cell_w}x{cell_h})",
            layout.padding
        )));
    }

    let rects = (0..num_frames)
        .map(|i| {
            let (row, col) = match layout.order {
                FrameOrder::RowMajor => (i / cols, i % cols),
                FrameOrder::ColumnMajor => (i % rows, i / rows),
            };
            Ok(Rect::new(
                cell_origin(col, cell_w, layout.padding)?,
                cell_origin(row, cell_h, layout.padding)?,
                cell_w,
                cell_h,
            ))
        })
        .collect::<ConvertResult<Vec<_>>>()?;

    Ok(FrameSet {
        rects,
        frame_width: cell_w,
        frame_height: cell_h,
    })
}

fn resolve_custom(num_frames: u32, custom: &[Rect]) -> ConvertResult<FrameSet> {
    let n = num_frames as usize;
    if custom.len() < n {
        return Err(ConvertError::invalid_layout(format!(
            "{} custom frames given but num_frames is {num_frames}",
            custom.len()
        )));
    }

    let rects = custom[..n].to_vec();
    if let Some((idx, r)) = rects.iter().enumerate().find(|(_, r)| r.is_empty()) {
        return Err(ConvertError::invalid_layout(format!(
            "custom frame {idx} has an empty size ({}x{})",
            r.width, r.height
        )));
    }

    let first = rects[0];
    Ok(FrameSet {
        rects,
        frame_width: first.width,
        frame_height: first.height,
    })
}

/// Offset of the `index`-th cell along one axis. The gutter only counts between cells, so
/// index 0 is always at 0 whatever the padding.
fn cell_origin(index: u32, cell: u32, padding: u32) -> ConvertResult<u32> {
    let origin = u64::from(index) * (u64::from(cell) + u64::from(padding));
    u32::try_from(origin).map_err(|_| {
        ConvertError::invalid_layout(format!(
            "cell {index} with size {cell} and padding {padding} lies outside u32 pixel space"
        ))
    })
}

fn cell_extent(total: u32, cells: u32, padding: u32) -> u32 {
    let gutters = u64::from(padding) * u64::from(cells - 1);
    let usable = u64::from(total).saturating_sub(gutters);
    (usable / u64::from(cells)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/layout/resolver.rs"]
mod tests;
