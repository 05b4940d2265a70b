//! Draws the alignment grid, annotations, and the live selection onto a drawing surface. This is
//! a pure function of its inputs; it owns no state. Surfaces: The egui painter in the GUI, and an
//! SVG document for image export.

use eframe::egui::{pos2, Color32, Pos2, Rect};

use crate::{
    annotation::{Annotation, AnnotationMode},
    color_scheme::{ColorScheme, Theme},
    coords::CoordMapper,
    fasta::AlignmentSet,
    util::truncate_label,
    Color,
};

pub const FONT_SIZE_RULER: f32 = 10.;
pub const FONT_SIZE_NAME: f32 = 12.;
/// Multiplied by the zoom.
pub const FONT_SIZE_RESIDUE: f32 = 12.;

pub const NAME_MAX_CHARS: usize = 20;
const NAME_X: f32 = 5.;
/// From the top of a sequence line to its name's baseline.
const NAME_BASELINE_OFFSET: f32 = 15.;
/// From a cell's corner to its glyph's baseline. The y value is multiplied by the zoom.
const GLYPH_OFFSET_X: f32 = 2.;
const GLYPH_OFFSET_Y: f32 = 14.;

pub const SELECTION_STROKE_WIDTH: f32 = 2.;
pub const SELECTION_DASH: f32 = 5.;
pub const SELECTION_GAP: f32 = 5.;

/// Any 2D raster-drawing target. Coordinates are canvas pixels, with the origin top-left.
pub trait DrawSurface {
    /// Fill the whole surface.
    fn clear(&mut self, color: Color32);
    fn fill_rect(&mut self, rect: Rect, color: Color32);
    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color32);
    fn dashed_rect(&mut self, rect: Rect, width: f32, color: Color32, dash: f32, gap: f32);
    /// Monospace text; `pos` is the left end of its baseline.
    fn text(&mut self, pos: Pos2, text: &str, size: f32, color: Color32);
}

pub fn annotation_fill_color(color: Color, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0., 1.) * 255.).round() as u8;
    Color32::from_rgba_unmultiplied(color.0, color.1, color.2, alpha)
}

/// Per row block: The position ruler, sequence names, and residue cells.
fn draw_alignment(
    surface: &mut dyn DrawSurface,
    alignment: &AlignmentSet,
    mapper: &CoordMapper,
    scheme: ColorScheme,
    theme: &Theme,
) {
    let config = &mapper.config;
    let glyph_size = FONT_SIZE_RESIDUE * config.zoom;

    for (row, range) in mapper.layout.row_ranges.iter().enumerate() {
        surface.text(
            mapper.ruler_pos(row),
            &format!("{}-{}", range.start + 1, range.end),
            FONT_SIZE_RULER,
            theme.text_secondary,
        );

        for (seq_i, seq) in alignment.sequences().iter().enumerate() {
            let line_top = mapper.logical_to_pixel(range.start, seq_i).y;

            surface.text(
                pos2(NAME_X, line_top + NAME_BASELINE_OFFSET),
                &truncate_label(&seq.name, NAME_MAX_CHARS),
                FONT_SIZE_NAME,
                theme.text,
            );

            for i in range.clone() {
                let residue = seq.residue(i);
                let cell = mapper.cell_rect(i, seq_i);

                if let Some(color) = scheme.residue_color(residue) {
                    surface.fill_rect(cell, color);
                }

                surface.text(
                    pos2(
                        cell.min.x + GLYPH_OFFSET_X,
                        cell.min.y + GLYPH_OFFSET_Y * config.zoom,
                    ),
                    &residue.to_string(),
                    glyph_size,
                    theme.text,
                );
            }
        }
    }
}

fn draw_annotations(surface: &mut dyn DrawSurface, annotations: &[Annotation], mapper: &CoordMapper) {
    for annotation in annotations {
        let (r, g, b) = annotation.style.color;

        for rect in annotation.rects(mapper) {
            match annotation.mode {
                AnnotationMode::Fill => surface.fill_rect(
                    rect,
                    annotation_fill_color(annotation.style.color, annotation.style.opacity),
                ),
                AnnotationMode::Border => surface.stroke_rect(
                    rect,
                    annotation.style.border_width,
                    Color32::from_rgb(r, g, b),
                ),
            }
        }
    }
}

/// Draw everything. Annotations paint in order, so later ones cover earlier ones; the selection
/// goes on top.
pub fn render(
    surface: &mut dyn DrawSurface,
    alignment: &AlignmentSet,
    mapper: &CoordMapper,
    annotations: &[Annotation],
    selection: Option<Rect>,
    scheme: ColorScheme,
    theme: &Theme,
) {
    surface.clear(theme.background);

    if alignment.is_empty() {
        return;
    }

    draw_alignment(surface, alignment, mapper, scheme, theme);
    draw_annotations(surface, annotations, mapper);

    if let Some(sel) = selection {
        surface.dashed_rect(
            sel,
            SELECTION_STROKE_WIDTH,
            theme.primary,
            SELECTION_DASH,
            SELECTION_GAP,
        );
    }
}
