//! Multi-row grid geometry. The alignment is wrapped into row blocks of `line_length` columns;
//! each block has a position ruler above it, then one line per sequence.
//!
//! Everything here is pure, and is recomputed from scratch when the line length, zoom, or
//! alignment changes.

use std::ops::Range;

use bincode::{Decode, Encode};
use eframe::egui::{vec2, Vec2};

pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 3.0;
pub const ZOOM_IN_FACTOR: f32 = 1.2;
pub const ZOOM_OUT_FACTOR: f32 = 0.8;
/// Ctrl + mouse wheel uses a finer step.
pub const ZOOM_WHEEL_IN_FACTOR: f32 = 1.1;
pub const ZOOM_WHEEL_OUT_FACTOR: f32 = 0.9;

pub const LINE_LENGTH_OPTIONS: [usize; 3] = [50, 55, 60];
pub const DEFAULT_LINE_LENGTH: usize = 60;

pub const CELL_WIDTH: f32 = 16.;
pub const CELL_HEIGHT: f32 = 20.;
pub const NAME_COLUMN_WIDTH: f32 = 150.;

/// Space above the first row block.
pub const TOP_MARGIN: f32 = 20.;
/// Vertical space between sequence lines within a block.
pub const ROW_GAP: f32 = 2.;
/// Space for the position ruler text, above each block's sequences.
pub const HEADER_GAP: f32 = 15.;
/// Space after each block's last sequence.
pub const BLOCK_GAP: f32 = 20.;

pub const MIN_CANVAS_WIDTH: f32 = 800.;
pub const MIN_CANVAS_HEIGHT: f32 = 600.;
const CANVAS_PAD_X: f32 = 20.;
const CANVAS_PAD_BOTTOM: f32 = 100.;

/// Multiply the zoom by a factor, keeping it in range.
pub fn adjust_zoom(zoom: f32, factor: f32) -> f32 {
    (zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX)
}

#[derive(Clone, Copy, Debug, PartialEq, Encode, Decode)]
pub struct LayoutConfig {
    /// Residues per row block.
    pub line_length: usize,
    pub zoom: f32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub name_column_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_length: DEFAULT_LINE_LENGTH,
            zoom: 1.,
            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,
            name_column_width: NAME_COLUMN_WIDTH,
        }
    }
}

impl LayoutConfig {
    pub fn set_line_length(&mut self, line_length: usize) {
        self.line_length = line_length.max(1);
    }

    pub fn adjust_zoom(&mut self, factor: f32) {
        self.zoom = adjust_zoom(self.zoom, factor);
    }

    /// Cell width, at the current zoom.
    pub fn cell_w(&self) -> f32 {
        self.cell_width * self.zoom
    }

    /// Cell height, at the current zoom.
    pub fn cell_h(&self) -> f32 {
        self.cell_height * self.zoom
    }

    /// Vertical distance between the tops of adjacent sequence lines.
    pub fn seq_stride(&self) -> f32 {
        self.cell_h() + ROW_GAP
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub total_rows: usize,
    /// Height of one full row block: Ruler, sequence lines, and trailing gap.
    pub row_height: f32,
    /// The top of each row block, in canvas pixels.
    pub row_y_offsets: Vec<f32>,
    /// The alignment positions each row block covers. The last may be short.
    pub row_ranges: Vec<Range<usize>>,
}

impl Layout {
    /// The canvas size needed to show every row block. `available_width` is the width of the
    /// area hosting the canvas.
    pub fn canvas_size(&self, available_width: f32) -> Vec2 {
        let width = (available_width - CANVAS_PAD_X).max(MIN_CANVAS_WIDTH);
        let height =
            (self.total_rows as f32 * self.row_height + CANVAS_PAD_BOTTOM).max(MIN_CANVAS_HEIGHT);

        vec2(width, height)
    }
}

/// Divide the alignment into rows, for display.
pub fn get_row_ranges(len: usize, chars_per_row: usize) -> Vec<Range<usize>> {
    let chars_per_row = chars_per_row.max(1);

    (0..len.div_ceil(chars_per_row))
        .map(|row_i| {
            let start = row_i * chars_per_row;
            start..(start + chars_per_row).min(len)
        })
        .collect()
}

pub fn compute_layout(alignment_len: usize, seq_count: usize, config: &LayoutConfig) -> Layout {
    let row_ranges = get_row_ranges(alignment_len, config.line_length);
    let total_rows = row_ranges.len();

    let row_height = seq_count as f32 * config.seq_stride() + HEADER_GAP + BLOCK_GAP;

    let row_y_offsets = (0..total_rows)
        .map(|r| TOP_MARGIN + r as f32 * row_height)
        .collect();

    Layout {
        total_rows,
        row_height,
        row_y_offsets,
        row_ranges,
    }
}
