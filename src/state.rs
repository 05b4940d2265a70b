//! The viewer session: The loaded alignment, its annotations, and the UI state around them.
//!
//! The session is `Empty` until a file parses successfully, then `Loaded`. A new load replaces the
//! alignment wholesale; a failed load leaves everything as it was.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use eframe::egui::{Context, Pos2, Rect};

use crate::{
    annotation::{AnnotationMode, AnnotationStore, AnnotationStyle, SelectionMode},
    color_scheme::{ColorScheme, Theme},
    coords::CoordMapper,
    error::{MsaError, MsaResult},
    fasta::{parse_file, AlignmentSet},
    file_io::{
        self,
        export::{import_manifest, render_svg, save_manifest, svg_to_png, Manifest},
        save::{load, save, PrefsToSave, DEFAULT_PREFS_FILE},
    },
    gui::{self, save::FileDialogs},
    layout::{LayoutConfig, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR},
    util::RangeIncl,
};

/// Save user preferences this often, in seconds.
const PREFS_SAVE_INTERVAL: u64 = 60;

pub const SAMPLE_FILE_NAME: &str = "sample.fasta";

/// Shown at startup, so there's something on screen.
pub const SAMPLE_FASTA: &str = ">seq1
ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT
>seq2
ACGTACCTACGTGGACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT
>seq3
ACGTTCGTACGT--ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT
>seq4
ACGTACGTTCGTGGTCGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT
>seq5
ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT--
>seq6
ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTAC";

/// Values defined here generally aren't worth saving to file etc, with the exception of the
/// annotation tool settings; those go in the prefs file.
pub struct StateUi {
    pub color_scheme: ColorScheme,
    pub selection_mode: SelectionMode,
    pub annotation_mode: AnnotationMode,
    /// Applied to the next annotation added.
    pub style: AnnotationStyle,
    pub theme: Theme,
    /// The in-progress or finished drag rectangle, in canvas space.
    pub selection: Option<Rect>,
    /// Canvas space. Set while a drag is active.
    pub drag_start: Option<Pos2>,
    /// Mouse cursor, in canvas space.
    pub cursor_pos: Option<Pos2>,
    /// Vertical scroll of the canvas, in pixels.
    pub scroll_offset: f32,
    /// `scroll_offset` was set programmatically, and should be applied to the scroll area.
    pub scroll_pending: bool,
    /// Set by the GUI each frame.
    pub viewport_height: f32,
    /// Width available to the canvas. Set by the GUI each frame.
    pub canvas_width_avail: f32,
    /// An error or status message, shown until dismissed.
    pub notification: Option<String>,
    /// Showing the "Clear all annotations?" prompt.
    pub confirm_clear: bool,
    pub file_dialogs: FileDialogs,
    /// A saved setting changed since the prefs file was last written.
    pub prefs_dirty: bool,
    /// The window title needs updating.
    pub title_dirty: bool,
    /// Annotations changed since the manifest was last exported.
    pub unexported: bool,
}

impl Default for StateUi {
    fn default() -> Self {
        Self {
            color_scheme: Default::default(),
            selection_mode: Default::default(),
            annotation_mode: Default::default(),
            style: Default::default(),
            theme: Default::default(),
            selection: None,
            drag_start: None,
            cursor_pos: None,
            scroll_offset: 0.,
            scroll_pending: false,
            viewport_height: 0.,
            canvas_width_avail: 0.,
            notification: None,
            confirm_clear: false,
            file_dialogs: Default::default(),
            prefs_dirty: false,
            title_dirty: true,
            unexported: false,
        }
    }
}

pub struct State {
    pub ui: StateUi,
    /// `None` until a file loads.
    pub alignment: Option<AlignmentSet>,
    /// The loaded file's name, including its extension.
    pub file_name: String,
    pub layout: LayoutConfig,
    pub annotations: AnnotationStore,
    /// Geometry for the current alignment and layout. Rebuilt whenever either changes.
    pub mapper: CoordMapper,
    last_prefs_save: Instant,
}

impl Default for State {
    fn default() -> Self {
        let layout = LayoutConfig::default();

        Self {
            ui: Default::default(),
            alignment: None,
            file_name: String::new(),
            mapper: CoordMapper::new(0, 0, layout),
            layout,
            annotations: Default::default(),
            last_prefs_save: Instant::now(),
        }
    }
}

impl eframe::App for State {
    /// This is the GUI's event loop. This also handles saving preferences to disk, periodically
    /// and after a setting changes.
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if self.ui.prefs_dirty || self.last_prefs_save.elapsed().as_secs() > PREFS_SAVE_INTERVAL {
            self.save_prefs();
        }

        if self.annotations.take_dirty() {
            self.ui.unexported = !self.annotations.is_empty();
            self.ui.title_dirty = true;
        }

        gui::draw(self, ctx);
    }
}

impl State {
    pub fn load_prefs(&mut self, path: &Path) {
        match load::<PrefsToSave>(path) {
            Ok(prefs) => {
                prefs.apply(self);
                self.sync_layout();
            }
            Err(e) => log::info!("No preferences loaded from {path:?}: {e}"),
        }
    }

    pub fn save_prefs(&mut self) {
        self.last_prefs_save = Instant::now();
        self.ui.prefs_dirty = false;

        if let Err(e) = save(
            &PathBuf::from(DEFAULT_PREFS_FILE),
            &PrefsToSave::from_state(self),
        ) {
            log::error!("Error saving prefs: {e}");
        }
    }

    /// Rebuild derived geometry. Run this when the alignment, line length, or zoom changes.
    pub fn sync_layout(&mut self) {
        let (len, count) = self
            .alignment
            .as_ref()
            .map(|a| (a.alignment_len(), a.len()))
            .unwrap_or_default();

        self.mapper = CoordMapper::new(len, count, self.layout);
        self.clamp_scroll();
    }

    /// Report a recoverable error to the user.
    pub fn notify(&mut self, error: &MsaError) {
        log::warn!("{error}");
        self.ui.notification = Some(error.to_string());
    }

    /// Replace the loaded alignment. Annotations, the selection, and scroll are reset.
    fn install(&mut self, file_name: String, alignment: AlignmentSet) {
        log::info!(
            "Showing {file_name}: {} sequences, length {}",
            alignment.len(),
            alignment.alignment_len()
        );

        self.alignment = Some(alignment);
        self.file_name = file_name;
        self.annotations.clear();
        self.clear_selection();
        self.ui.cursor_pos = None;
        self.ui.confirm_clear = false;
        self.ui.scroll_offset = 0.;
        self.ui.scroll_pending = true;
        self.ui.title_dirty = true;

        self.sync_layout();
    }

    /// Parse and show FASTA text, eg from a dropped file. On failure, state is unchanged.
    pub fn load_text(&mut self, file_name: &str, text: &str) -> MsaResult<()> {
        let alignment = parse_file(file_name, text)?;
        self.install(file_name.to_owned(), alignment);
        Ok(())
    }

    pub fn load_path(&mut self, path: &Path) -> MsaResult<()> {
        let (file_name, alignment) = file_io::load_path(path)?;
        self.install(file_name, alignment);
        Ok(())
    }

    pub fn load_sample(&mut self) -> MsaResult<()> {
        self.load_text(SAMPLE_FILE_NAME, SAMPLE_FASTA)
    }

    pub fn set_line_length(&mut self, line_length: usize) {
        self.layout.set_line_length(line_length);
        self.ui.prefs_dirty = true;
        self.sync_layout();
    }

    /// Multiply the zoom by a factor, clamped to its range.
    pub fn adjust_zoom(&mut self, factor: f32) {
        self.layout.adjust_zoom(factor);
        self.ui.prefs_dirty = true;
        self.sync_layout();
    }

    pub fn zoom_in(&mut self) {
        self.adjust_zoom(ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.adjust_zoom(ZOOM_OUT_FACTOR);
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.ui.color_scheme = scheme;
        self.ui.prefs_dirty = true;
    }

    /// Start a selection drag, at a canvas position. Ignored with nothing loaded.
    pub fn begin_drag(&mut self, pos: Pos2) {
        if self.alignment.is_none() {
            return;
        }
        self.ui.drag_start = Some(pos);
        self.ui.selection = Some(Rect::from_two_pos(pos, pos));
    }

    pub fn update_drag(&mut self, pos: Pos2) {
        if let Some(start) = self.ui.drag_start {
            self.ui.selection = Some(Rect::from_two_pos(start, pos));
        }
    }

    /// Finish a drag. The selection stays until it's committed, or cleared.
    pub fn end_drag(&mut self, pos: Pos2) {
        self.update_drag(pos);
        self.ui.drag_start = None;
    }

    pub fn clear_selection(&mut self) {
        self.ui.selection = None;
        self.ui.drag_start = None;
    }

    /// Commit the current selection as an annotation, using the current tool settings.
    pub fn add_annotation(&mut self) -> MsaResult<()> {
        if self.alignment.is_none() {
            return Err(MsaError::NoData);
        }

        self.annotations.add(
            self.ui.selection,
            self.ui.selection_mode,
            self.ui.annotation_mode,
            self.ui.style,
            &self.mapper,
        )?;

        self.clear_selection();
        Ok(())
    }

    pub fn remove_annotation(&mut self, id: u64) {
        if !self.annotations.remove(id) {
            log::warn!("No annotation with ID {id} to remove");
        }
    }

    pub fn clear_annotations(&mut self) {
        log::info!("Clearing {} annotations", self.annotations.len());
        self.annotations.clear();
        self.ui.confirm_clear = false;
    }

    /// The scrollable canvas' size.
    pub fn canvas_size(&self) -> eframe::egui::Vec2 {
        self.mapper.layout.canvas_size(self.ui.canvas_width_avail)
    }

    fn max_scroll(&self) -> f32 {
        (self.canvas_size().y - self.ui.viewport_height).max(0.)
    }

    fn clamp_scroll(&mut self) {
        self.ui.scroll_offset = self.ui.scroll_offset.clamp(0., self.max_scroll());
    }

    /// Scroll the canvas vertically, clamped to its content.
    pub fn scroll_by(&mut self, delta: f32, viewport_height: f32) {
        self.ui.viewport_height = viewport_height;
        self.ui.scroll_offset += delta;
        self.ui.scroll_pending = true;
        self.clamp_scroll();
    }

    /// How far down the canvas we're scrolled, from 0 to 100.
    pub fn scroll_percent(&self) -> u8 {
        let max = self.max_scroll();
        if max <= 0. {
            return 0;
        }
        (self.ui.scroll_offset / max * 100.).round().clamp(0., 100.) as u8
    }

    /// Status bar text for the cell under the cursor. 1-based.
    pub fn cursor_text(&self, pos: Option<Pos2>) -> String {
        match (pos, &self.alignment) {
            (Some(pos), Some(_)) => {
                let cell = self.mapper.pixel_to_logical(pos);
                format!("Position: {}, Seq: {}", cell.position + 1, cell.sequence + 1)
            }
            _ => "Position: -".to_owned(),
        }
    }

    /// Status bar text describing the selection. 1-based.
    pub fn selection_text(&self) -> String {
        match (self.ui.selection, &self.alignment) {
            (Some(sel), Some(_)) => {
                let (start, end) = self.mapper.selection_to_cells(sel);
                format!(
                    "Selected: Pos {}, Seq {}",
                    RangeIncl::new(start.position, end.position),
                    RangeIncl::new(start.sequence, end.sequence)
                )
            }
            _ => "No selection".to_owned(),
        }
    }

    pub fn manifest(&self) -> MsaResult<Manifest> {
        let alignment = self.alignment.as_ref().ok_or(MsaError::NoData)?;

        Ok(Manifest::new(
            &self.file_name,
            alignment,
            self.annotations.list(),
            self.layout.line_length,
        ))
    }

    pub fn export_manifest(&mut self, path: &Path) -> MsaResult<()> {
        save_manifest(path, &self.manifest()?)?;

        self.ui.unexported = false;
        self.ui.title_dirty = true;
        Ok(())
    }

    /// Add annotations from a previously-exported manifest. Ones that don't fit the loaded
    /// alignment are skipped. Returns how many were added.
    pub fn import_annotations(&mut self, text: &str) -> MsaResult<usize> {
        let (len, count) = match &self.alignment {
            Some(a) => (a.alignment_len(), a.len()),
            None => return Err(MsaError::NoData),
        };
        let manifest = import_manifest(text)?;

        if manifest.filename != self.file_name {
            log::warn!(
                "Importing annotations made for {}, onto {}",
                manifest.filename,
                self.file_name
            );
        }

        let mut added = 0;
        for annotation in manifest.annotations {
            let positions = annotation.kind.positions();
            let seqs = annotation.kind.seqs();

            if positions.is_empty() || seqs.is_empty() || positions.end >= len || seqs.end >= count {
                log::warn!("Skipping out-of-range annotation: {annotation:?}");
                continue;
            }
            self.annotations.push(annotation);
            added += 1;
        }

        log::info!("Imported {added} annotations");
        Ok(added)
    }

    pub fn import_annotations_path(&mut self, path: &Path) -> MsaResult<usize> {
        let text = file_io::read_file(path)?;
        self.import_annotations(&text)
    }

    /// The annotated alignment as an SVG document, at the current canvas size.
    pub fn svg(&self) -> MsaResult<String> {
        let alignment = self.alignment.as_ref().ok_or(MsaError::NoData)?;

        Ok(render_svg(
            alignment,
            &self.mapper,
            self.annotations.list(),
            self.ui.color_scheme,
            &self.ui.theme,
            self.canvas_size(),
        ))
    }

    pub fn export_svg(&self, path: &Path) -> MsaResult<()> {
        fs::write(path, self.svg()?)?;
        log::info!("Exported SVG to {path:?}");
        Ok(())
    }

    pub fn export_png(&self, path: &Path) -> MsaResult<()> {
        let png = svg_to_png(&self.svg()?)?;
        fs::write(path, png)?;
        log::info!("Exported PNG to {path:?}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::annotation::AnnotationKind;

    fn loaded() -> State {
        let mut state = State::default();
        state.load_sample().unwrap();
        state
    }

    #[test]
    fn sample_loads() {
        let state = loaded();
        let aln = state.alignment.as_ref().unwrap();

        assert_eq!(aln.len(), 6);
        assert_eq!(aln.alignment_len(), 76);
        assert_eq!(state.mapper.layout.total_rows, 2);
        assert_eq!(state.file_name, SAMPLE_FILE_NAME);
    }

    #[test]
    fn failed_load_keeps_state() {
        let mut state = loaded();
        state.ui.selection_mode = SelectionMode::Residue;
        state.begin_drag(state.mapper.cell_rect(3, 2).center());
        state.end_drag(state.mapper.cell_rect(3, 2).center());
        state.add_annotation().unwrap();

        assert!(state.load_text("bad.fasta", "no headers here").is_err());
        assert!(state.load_text("empty.fasta", ">a\n>b\n").is_err());

        assert_eq!(state.file_name, SAMPLE_FILE_NAME);
        assert_eq!(state.annotations.len(), 1);
        assert_eq!(state.alignment.as_ref().unwrap().len(), 6);
    }

    #[test]
    fn new_load_resets_document_state() {
        let mut state = loaded();
        state.begin_drag(pos2(160., 40.));
        state.end_drag(pos2(300., 80.));
        state.add_annotation().unwrap();
        state.begin_drag(pos2(160., 40.));
        state.scroll_by(100., 200.);

        state.load_text("other.fas", ">x\nACGT\n").unwrap();

        assert!(state.annotations.is_empty());
        assert_eq!(state.ui.selection, None);
        assert_eq!(state.ui.scroll_offset, 0.);
        assert_eq!(state.mapper.alignment_len, 4);
    }

    #[test]
    fn add_without_selection() {
        let mut state = loaded();
        assert!(matches!(
            state.add_annotation(),
            Err(MsaError::EmptySelection)
        ));
        assert!(state.annotations.is_empty());

        let mut empty = State::default();
        assert!(matches!(empty.add_annotation(), Err(MsaError::NoData)));
    }

    #[test]
    fn residue_mode_uses_lowest_cell() {
        let mut state = loaded();
        state.ui.selection_mode = SelectionMode::Residue;

        // Forwards, backwards, and against the grain on one axis.
        let drags = [((10, 1), (20, 3)), ((20, 3), (10, 1)), ((20, 1), (10, 3))];
        for ((p0, s0), (p1, s1)) in drags {
            state.begin_drag(state.mapper.cell_rect(p0, s0).center());
            state.end_drag(state.mapper.cell_rect(p1, s1).center());
            state.add_annotation().unwrap();
            // Committing clears the selection.
            assert_eq!(state.ui.selection, None);
        }

        for annotation in state.annotations.list() {
            assert_eq!(
                annotation.kind,
                AnnotationKind::Residue {
                    position: 10,
                    sequence: 1
                }
            );
        }
        assert_eq!(state.annotations.len(), 3);
    }

    #[test]
    fn annotations_survive_layout_changes() {
        let mut state = loaded();
        state.begin_drag(state.mapper.cell_rect(45, 0).center());
        state.end_drag(state.mapper.cell_rect(55, 2).center());
        state.add_annotation().unwrap();
        let kind = state.annotations.list()[0].kind;
        assert_eq!(kind.positions(), RangeIncl::new(45, 55));

        state.set_line_length(50);
        state.zoom_in();

        assert_eq!(state.annotations.list()[0].kind, kind);
        // Now split across the wrap at 50.
        let rects = state.annotations.list()[0].rects(&state.mapper);
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].min, state.mapper.logical_to_pixel(45, 0));
        assert_eq!(rects[1].min, state.mapper.logical_to_pixel(50, 0));
    }

    #[test]
    fn zoom_clamps() {
        let mut state = State::default();
        for _ in 0..20 {
            state.zoom_in();
        }
        assert_eq!(state.layout.zoom, 3.);
        for _ in 0..20 {
            state.zoom_out();
        }
        assert_eq!(state.layout.zoom, 0.5);
    }

    #[test]
    fn status_texts() {
        let mut state = loaded();
        assert_eq!(state.selection_text(), "No selection");
        assert_eq!(
            state.cursor_text(Some(state.mapper.cell_rect(61, 4).center())),
            "Position: 62, Seq: 5"
        );
        assert_eq!(state.cursor_text(None), "Position: -");

        state.begin_drag(state.mapper.cell_rect(9, 1).center());
        state.update_drag(state.mapper.cell_rect(19, 2).center());
        assert_eq!(state.selection_text(), "Selected: Pos 10-20, Seq 2-3");
        // Still dragging; the drag end is not required for the text.
        assert!(state.ui.drag_start.is_some());

        state.clear_selection();
        assert_eq!(state.selection_text(), "No selection");
    }

    #[test]
    fn scrolling_clamps_and_reports_percent() {
        let mut state = loaded();
        state.set_line_length(50);
        // Canvas height is the 600px minimum for this small alignment.
        state.scroll_by(-50., 400.);
        assert_eq!(state.ui.scroll_offset, 0.);
        assert_eq!(state.scroll_percent(), 0);

        state.scroll_by(100., 400.);
        assert_eq!(state.scroll_percent(), 50);

        state.scroll_by(10_000., 400.);
        assert_eq!(state.ui.scroll_offset, 200.);
        assert_eq!(state.scroll_percent(), 100);

        // A viewport taller than the canvas can't scroll.
        state.scroll_by(50., 2_000.);
        assert_eq!(state.ui.scroll_offset, 0.);
        assert_eq!(state.scroll_percent(), 0);
    }

    #[test]
    fn exports_need_data() {
        let state = State::default();
        assert!(matches!(state.manifest(), Err(MsaError::NoData)));
        assert!(matches!(state.svg(), Err(MsaError::NoData)));
    }

    #[test]
    fn import_skips_out_of_range() {
        let mut state = loaded();
        state.begin_drag(state.mapper.cell_rect(1, 0).center());
        state.end_drag(state.mapper.cell_rect(70, 5).center());
        state.add_annotation().unwrap();
        let json = file_io::export::export_manifest(&state.manifest().unwrap()).unwrap();

        // Onto a shorter alignment: The region no longer fits.
        state.load_text("short.fasta", ">a\nACGT\n").unwrap();
        assert_eq!(state.import_annotations(&json).unwrap(), 0);

        state.load_sample().unwrap();
        assert_eq!(state.import_annotations(&json).unwrap(), 1);
        assert_eq!(state.annotations.len(), 1);
    }
}
