//! GUI code for opening alignment files, and exporting.

use eframe::egui::{Context, RichText, Ui};
use egui_file_dialog::FileDialog;

use crate::{
    file_io::export::{IMAGE_FILE, MANIFEST_FILE, SVG_FILE},
    gui::theme::COLOR_ACTION,
    state::State,
};

/// One dialog per action, so we know what to do with the path the user picks.
pub struct FileDialogs {
    pub open: FileDialog,
    pub export_png: FileDialog,
    pub export_svg: FileDialog,
    pub export_manifest: FileDialog,
    pub import_manifest: FileDialog,
}

impl Default for FileDialogs {
    fn default() -> Self {
        let save_dialog = |file_name: &str| {
            let mut dialog = FileDialog::new();
            dialog.config_mut().default_file_name = file_name.to_owned();
            dialog
        };

        Self {
            open: FileDialog::new(),
            export_png: save_dialog(IMAGE_FILE),
            export_svg: save_dialog(SVG_FILE),
            export_manifest: save_dialog(MANIFEST_FILE),
            import_manifest: FileDialog::new(),
        }
    }
}

fn save_button(dialog: &mut FileDialog, text: &str, hover_text: &str, enabled: bool, ui: &mut Ui) {
    if ui
        .add_enabled(enabled, eframe::egui::Button::new(text))
        .on_hover_text(hover_text)
        .clicked()
    {
        dialog.save_file();
    }
}

/// Top-bar buttons for loading and exporting.
pub fn save_section(state: &mut State, ui: &mut Ui) {
    let loaded = state.alignment.is_some();

    if ui
        .button(RichText::new("Upload MSA File").color(COLOR_ACTION))
        .on_hover_text("Open an alignment in the FASTA format. (Ctrl + O)")
        .clicked()
    {
        state.ui.file_dialogs.open.select_file();
    }

    save_button(
        &mut state.ui.file_dialogs.export_png,
        "Download Image",
        "Save the annotated alignment as a PNG image.",
        loaded,
        ui,
    );

    save_button(
        &mut state.ui.file_dialogs.export_svg,
        "SVG",
        "Save the annotated alignment as an SVG image.",
        loaded,
        ui,
    );

    save_button(
        &mut state.ui.file_dialogs.export_manifest,
        "Export Annotations",
        "Save the annotations, and the sequences they apply to, as JSON.",
        loaded,
        ui,
    );

    if ui
        .add_enabled(loaded, eframe::egui::Button::new("Import Annotations"))
        .on_hover_text("Add annotations from a previously-exported JSON file.")
        .clicked()
    {
        state.ui.file_dialogs.import_manifest.select_file();
    }

    if ui
        .button("Load sample")
        .on_hover_text("Show a small example alignment.")
        .clicked()
    {
        if let Err(e) = state.load_sample() {
            state.notify(&e);
        }
    }
}

/// Run the dialogs, and act on any path the user picked.
pub fn handle_dialogs(state: &mut State, ctx: &Context) {
    let dialogs = &mut state.ui.file_dialogs;
    dialogs.open.update(ctx);
    dialogs.export_png.update(ctx);
    dialogs.export_svg.update(ctx);
    dialogs.export_manifest.update(ctx);
    dialogs.import_manifest.update(ctx);

    let result = if let Some(path) = state.ui.file_dialogs.open.take_picked() {
        state.load_path(&path)
    } else if let Some(path) = state.ui.file_dialogs.export_png.take_picked() {
        state.export_png(&path)
    } else if let Some(path) = state.ui.file_dialogs.export_svg.take_picked() {
        state.export_svg(&path)
    } else if let Some(path) = state.ui.file_dialogs.export_manifest.take_picked() {
        state.export_manifest(&path)
    } else if let Some(path) = state.ui.file_dialogs.import_manifest.take_picked() {
        state.import_annotations_path(&path).map(|_| ())
    } else {
        Ok(())
    };

    if let Err(e) = result {
        state.notify(&e);
    }
}
