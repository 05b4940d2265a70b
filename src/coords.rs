//! Maps between canvas pixels, and (alignment position, sequence index) cells.
//!
//! Canvas space is the full scrollable drawing area; pointer positions relative to the visible
//! viewport are converted with `viewport_to_canvas` first.

use eframe::egui::{pos2, vec2, Pos2, Rect, Vec2};

use crate::{
    layout::{compute_layout, Layout, LayoutConfig, HEADER_GAP, TOP_MARGIN},
    util::{split_by_rows, RangeIncl},
};

/// A single cell of the alignment grid. Both indices are 0-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellCoord {
    pub position: usize,
    pub sequence: usize,
}

impl CellCoord {
    pub fn new(position: usize, sequence: usize) -> Self {
        Self { position, sequence }
    }
}

fn clamp_index(v: i64, len: usize) -> usize {
    v.clamp(0, len.saturating_sub(1) as i64) as usize
}

/// Refine a floored index estimate against the exact edges the forward mapping produces. `edge(i)`
/// is the leading edge of index `i`. Dividing loses precision on tall canvases, so without this a
/// cell's own corner can land in its neighbour.
fn settle(estimate: f64, len: usize, v: f32, edge: impl Fn(usize) -> f32) -> usize {
    let mut i = if estimate.is_finite() {
        clamp_index(estimate.floor() as i64, len)
    } else {
        0
    };

    while i + 1 < len && v >= edge(i + 1) {
        i += 1;
    }
    while i > 0 && v < edge(i) {
        i -= 1;
    }
    i
}

/// Layout-derived geometry for one alignment at one zoom level and line length.
#[derive(Clone, Debug)]
pub struct CoordMapper {
    pub config: LayoutConfig,
    pub layout: Layout,
    pub alignment_len: usize,
    pub seq_count: usize,
}

impl CoordMapper {
    pub fn new(alignment_len: usize, seq_count: usize, config: LayoutConfig) -> Self {
        Self {
            layout: compute_layout(alignment_len, seq_count, &config),
            config,
            alignment_len,
            seq_count,
        }
    }

    /// Convert a pointer position relative to the visible viewport, into canvas space.
    pub fn viewport_to_canvas(pos: Pos2, scroll_offset: Vec2) -> Pos2 {
        pos + scroll_offset
    }

    fn row_top(&self, row: usize) -> f32 {
        TOP_MARGIN + row as f32 * self.layout.row_height
    }

    /// The top of a sequence line within a row block.
    fn seq_top(&self, row: usize, sequence: usize) -> f32 {
        self.row_top(row) + HEADER_GAP + sequence as f32 * self.config.seq_stride()
    }

    fn col_left(&self, col: usize) -> f32 {
        self.config.name_column_width + col as f32 * self.config.cell_w()
    }

    /// Top-left corner of a cell.
    pub fn logical_to_pixel(&self, position: usize, sequence: usize) -> Pos2 {
        let line_len = self.config.line_length;

        pos2(
            self.col_left(position % line_len),
            self.seq_top(position / line_len, sequence),
        )
    }

    pub fn cell_rect(&self, position: usize, sequence: usize) -> Rect {
        Rect::from_min_size(
            self.logical_to_pixel(position, sequence),
            vec2(self.config.cell_w(), self.config.cell_h()),
        )
    }

    /// The cell under a canvas position. Positions outside the grid clamp to the nearest cell,
    /// so drags that overshoot the grid still select sensibly.
    pub fn pixel_to_logical(&self, pos: Pos2) -> CellCoord {
        let row_height = self.layout.row_height as f64;
        let stride = self.config.seq_stride() as f64;
        let cell_w = self.config.cell_w() as f64;

        let y_rel = pos.y as f64 - TOP_MARGIN as f64;
        let row = settle(y_rel / row_height, self.layout.total_rows, pos.y, |r| {
            self.row_top(r)
        });

        let y_in_block = pos.y as f64 - self.seq_top(row, 0) as f64;
        let sequence = settle(y_in_block / stride, self.seq_count, pos.y, |s| {
            self.seq_top(row, s)
        });

        let x_rel = pos.x as f64 - self.config.name_column_width as f64;
        let col = settle(x_rel / cell_w, self.config.line_length, pos.x, |c| {
            self.col_left(c)
        });

        let position = clamp_index(
            (row * self.config.line_length + col) as i64,
            self.alignment_len,
        );

        CellCoord { position, sequence }
    }

    /// Convert a screen-space rectangle into its start and end cells, normalized so that
    /// start <= end on both axes.
    pub fn selection_to_cells(&self, rect: Rect) -> (CellCoord, CellCoord) {
        let a = self.pixel_to_logical(rect.min);
        let b = self.pixel_to_logical(rect.max);

        (
            CellCoord::new(a.position.min(b.position), a.sequence.min(b.sequence)),
            CellCoord::new(a.position.max(b.position), a.sequence.max(b.sequence)),
        )
    }

    /// Rectangles covering a region. A region crossing a line-wrap boundary produces one
    /// rectangle per row block it touches.
    pub fn region_rects(&self, positions: RangeIncl, seqs: RangeIncl) -> Vec<Rect> {
        let height = seqs.len() as f32 * self.config.seq_stride();

        split_by_rows(positions, &self.layout.row_ranges)
            .into_iter()
            .map(|piece| {
                let min = self.logical_to_pixel(piece.start, seqs.start);
                Rect::from_min_size(min, vec2(piece.len() as f32 * self.config.cell_w(), height))
            })
            .collect()
    }

    /// Baseline position of a row block's ruler text.
    pub fn ruler_pos(&self, row: usize) -> Pos2 {
        pos2(
            5.,
            self.layout
                .row_y_offsets
                .get(row)
                .copied()
                .unwrap_or(TOP_MARGIN),
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout::{ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

    fn mapper(len: usize, count: usize) -> CoordMapper {
        CoordMapper::new(len, count, LayoutConfig::default())
    }

    fn zoomed(line_length: usize, factor: f32, steps: usize) -> LayoutConfig {
        let mut config = LayoutConfig::default();
        config.set_line_length(line_length);
        for _ in 0..steps {
            config.adjust_zoom(factor);
        }
        config
    }

    fn assert_round_trip(m: &CoordMapper) {
        for p in 0..m.alignment_len {
            for s in 0..m.seq_count {
                let corner = m.logical_to_pixel(p, s);
                assert_eq!(
                    m.pixel_to_logical(corner),
                    CellCoord::new(p, s),
                    "corner at {corner:?}"
                );

                let center = m.cell_rect(p, s).center();
                assert_eq!(m.pixel_to_logical(center), CellCoord::new(p, s));
            }
        }
    }

    #[test]
    fn round_trip_every_cell() {
        let configs = [
            LayoutConfig::default(),
            zoomed(55, ZOOM_IN_FACTOR, 1),
            zoomed(50, ZOOM_OUT_FACTOR, 3),
        ];

        for config in configs {
            assert_round_trip(&CoordMapper::new(125, 6, config));
        }
    }

    #[test]
    fn round_trip_on_tall_canvases() {
        // Canvases tens of thousands of pixels tall, at awkward zoom levels.
        assert_round_trip(&CoordMapper::new(20_000, 6, zoomed(50, ZOOM_OUT_FACTOR, 3)));
        assert_round_trip(&CoordMapper::new(600, 200, zoomed(50, ZOOM_OUT_FACTOR, 3)));
        assert_round_trip(&CoordMapper::new(600, 200, zoomed(50, ZOOM_IN_FACTOR, 5)));
        assert_round_trip(&CoordMapper::new(3_000, 50, zoomed(60, ZOOM_IN_FACTOR, 2)));
    }

    #[test]
    fn first_cell_location() {
        let m = mapper(78, 6);
        assert_eq!(m.logical_to_pixel(0, 0), pos2(150., 35.));
        // Second row block: 20 + 167 + 15
        assert_eq!(m.logical_to_pixel(60, 1), pos2(150., 224.));
    }

    #[test]
    fn out_of_bounds_clamps() {
        let m = mapper(78, 6);

        assert_eq!(m.pixel_to_logical(pos2(-100., -100.)), CellCoord::new(0, 0));
        // Far right on the first row stays on the first row.
        assert_eq!(m.pixel_to_logical(pos2(5_000., 40.)), CellCoord::new(59, 0));
        // Far below the grid: The last cell.
        assert_eq!(m.pixel_to_logical(pos2(5_000., 9_000.)), CellCoord::new(77, 5));
        // Past the end of the short last row.
        assert_eq!(m.pixel_to_logical(pos2(1_000., 230.)), CellCoord::new(77, 1));
    }

    #[test]
    fn ruler_area_maps_to_first_sequence() {
        let m = mapper(78, 6);
        assert_eq!(m.pixel_to_logical(pos2(160., 25.)), CellCoord::new(0, 0));
    }

    #[test]
    fn scroll_offset_applies() {
        let p = CoordMapper::viewport_to_canvas(pos2(10., 20.), vec2(0., 200.));
        assert_eq!(p, pos2(10., 220.));
    }

    #[test]
    fn backwards_selection_normalizes() {
        let m = mapper(78, 6);
        let a = m.cell_rect(30, 4).center();
        let b = m.cell_rect(12, 1).center();
        // The rect is built from the drag end to the drag start.
        let (start, end) = m.selection_to_cells(Rect::from_two_pos(a, b));

        assert_eq!(start, CellCoord::new(12, 1));
        assert_eq!(end, CellCoord::new(30, 4));
    }

    #[test]
    fn selection_spanning_blocks_normalizes_sequences() {
        let m = mapper(78, 6);
        // Low on the first block, to high on the second.
        let a = m.cell_rect(40, 5).center();
        let b = m.cell_rect(65, 0).center();
        let (start, end) = m.selection_to_cells(Rect::from_two_pos(a, b));

        assert!(start.position <= end.position);
        assert!(start.sequence <= end.sequence);
        assert_eq!((start.sequence, end.sequence), (0, 5));
    }

    #[test]
    fn region_splits_at_wrap() {
        let m = mapper(78, 6);
        let rects = m.region_rects(RangeIncl::new(55, 64), RangeIncl::new(1, 2));

        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].min, m.logical_to_pixel(55, 1));
        assert_eq!(rects[0].width(), 5. * 16.);
        assert_eq!(rects[1].min, m.logical_to_pixel(60, 1));
        assert_eq!(rects[1].width(), 5. * 16.);
        assert_eq!(rects[1].height(), 2. * 22.);
    }
}
