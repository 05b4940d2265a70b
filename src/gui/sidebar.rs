//! The control panel: File info, view settings, annotation tools, and the annotation list.

use std::fmt;

use eframe::egui::{vec2, Button, Color32, ComboBox, RichText, Slider, Ui};
use egui_extras::{Column, TableBuilder};
use strum::IntoEnumIterator;

use crate::{
    annotation::{
        AnnotationMode, SelectionMode, BORDER_WIDTH_MAX, BORDER_WIDTH_MIN, OPACITY_MAX,
        OPACITY_MIN, PRESET_COLORS,
    },
    color_scheme::ColorScheme,
    gui::{
        theme::{COLOR_ACTION, COLOR_ERROR, COLOR_INFO},
        COL_SPACING, ROW_SPACING,
    },
    layout::LINE_LENGTH_OPTIONS,
    state::State,
};

const TABLE_ROW_HEIGHT: f32 = 20.;
const PRESET_SWATCH_SIZE: f32 = 18.;

/// A combo box over every variant of an enum. Returns the new value, if the user changed it.
fn enum_selector<T: fmt::Display + PartialEq + Copy + IntoEnumIterator>(
    name: &str,
    val: T,
    id: &str,
    ui: &mut Ui,
) -> Option<T> {
    let mut selected = val;

    ui.horizontal(|ui| {
        ui.label(name);
        ComboBox::from_id_salt(id)
            .width(110.)
            .selected_text(val.to_string())
            .show_ui(ui, |ui| {
                for variant in T::iter() {
                    ui.selectable_value(&mut selected, variant, variant.to_string());
                }
            });
    });

    (selected != val).then_some(selected)
}

fn file_info(state: &State, ui: &mut Ui) {
    ui.heading("File");

    let Some(alignment) = &state.alignment else {
        ui.label(RichText::new("No alignment loaded").color(COLOR_INFO));
        return;
    };

    ui.label(format!("File: {}", state.file_name));
    ui.label(format!("Sequences: {}", alignment.len()));
    ui.label(format!("Length: {}", alignment.alignment_len()));
    ui.label(format!("Rows: {}", state.mapper.layout.total_rows));
}

fn view_controls(state: &mut State, ui: &mut Ui) {
    ui.heading("View");

    if let Some(v) = enum_selector("Colors:", state.ui.color_scheme, "color_scheme", ui) {
        state.set_color_scheme(v);
    }

    ui.horizontal(|ui| {
        ui.label("Line length:");
        let current = state.layout.line_length;
        ComboBox::from_id_salt("line_length")
            .width(60.)
            .selected_text(current.to_string())
            .show_ui(ui, |ui| {
                for len in LINE_LENGTH_OPTIONS {
                    if ui.selectable_label(current == len, len.to_string()).clicked() {
                        state.set_line_length(len);
                    }
                }
            });
    });

    ui.horizontal(|ui| {
        ui.label("Zoom:");
        if ui.button("−").on_hover_text("Zoom out (Ctrl + -)").clicked() {
            state.zoom_out();
        }
        ui.label(format!("{:.0}%", state.layout.zoom * 100.));
        if ui.button("+").on_hover_text("Zoom in (Ctrl + +)").clicked() {
            state.zoom_in();
        }
    });
}

fn color_picker(state: &mut State, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label("Color:");

        let (r, g, b) = state.ui.style.color;
        let mut color = Color32::from_rgb(r, g, b);
        if ui.color_edit_button_srgba(&mut color).changed() {
            state.ui.style.color = (color.r(), color.g(), color.b());
            state.ui.prefs_dirty = true;
        }
    });

    ui.horizontal_wrapped(|ui| {
        for preset in PRESET_COLORS {
            let (r, g, b) = preset;
            let swatch = Button::new("")
                .fill(Color32::from_rgb(r, g, b))
                .min_size(vec2(PRESET_SWATCH_SIZE, PRESET_SWATCH_SIZE))
                .selected(state.ui.style.color == preset);

            if ui.add(swatch).clicked() {
                state.ui.style.color = preset;
                state.ui.prefs_dirty = true;
            }
        }
    });
}

fn annotation_tools(state: &mut State, ui: &mut Ui) {
    ui.heading("Annotate");

    if let Some(v) = enum_selector::<SelectionMode>("Select:", state.ui.selection_mode, "sel_mode", ui) {
        state.ui.selection_mode = v;
        state.ui.prefs_dirty = true;
    }
    if let Some(v) = enum_selector::<AnnotationMode>("Mode:", state.ui.annotation_mode, "ann_mode", ui) {
        state.ui.annotation_mode = v;
        state.ui.prefs_dirty = true;
    }

    color_picker(state, ui);

    ui.horizontal(|ui| match state.ui.annotation_mode {
        AnnotationMode::Fill => {
            ui.label("Opacity:");
            let mut v = state.ui.style.opacity;
            if ui
                .add(Slider::new(&mut v, OPACITY_MIN..=OPACITY_MAX).step_by(0.1))
                .changed()
            {
                state.ui.style.set_opacity(v);
                state.ui.prefs_dirty = true;
            }
        }
        AnnotationMode::Border => {
            ui.label("Border width:");
            let mut v = state.ui.style.border_width;
            if ui
                .add(Slider::new(&mut v, BORDER_WIDTH_MIN..=BORDER_WIDTH_MAX).step_by(1.))
                .changed()
            {
                state.ui.style.set_border_width(v);
                state.ui.prefs_dirty = true;
            }
        }
    });

    ui.add_space(ROW_SPACING / 2.);

    ui.horizontal(|ui| {
        let loaded = state.alignment.is_some();

        if ui
            .add_enabled(loaded, Button::new(RichText::new("Add Annotation").color(COLOR_ACTION)))
            .on_hover_text("Annotate the current selection.")
            .clicked()
        {
            if let Err(e) = state.add_annotation() {
                state.notify(&e);
            }
        }

        ui.add_space(COL_SPACING);

        if state.ui.confirm_clear {
            ui.label("Clear all annotations?");
            if ui.button(RichText::new("Yes").color(COLOR_ERROR)).clicked() {
                state.clear_annotations();
            }
            if ui.button("No").clicked() {
                state.ui.confirm_clear = false;
            }
        } else if ui
            .add_enabled(!state.annotations.is_empty(), Button::new("Clear All"))
            .clicked()
        {
            state.ui.confirm_clear = true;
        }
    });
}

fn annotation_list(state: &mut State, ui: &mut Ui) {
    ui.heading(format!("Annotations ({})", state.annotations.len()));

    if state.annotations.is_empty() {
        ui.label("None yet. Drag on the alignment, then Add Annotation.");
        return;
    }

    let mut remove = None;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto()) // Swatch
        .column(Column::auto()) // Type
        .column(Column::auto()) // Mode
        .column(Column::remainder()) // Details
        .column(Column::auto()) // Remove
        .header(TABLE_ROW_HEIGHT, |mut header| {
            header.col(|_ui| {});
            header.col(|ui| {
                ui.strong("Type");
            });
            header.col(|ui| {
                ui.strong("Mode");
            });
            header.col(|ui| {
                ui.strong("Location");
            });
            header.col(|_ui| {});
        })
        .body(|mut body| {
            for annotation in state.annotations.list() {
                body.row(TABLE_ROW_HEIGHT, |mut row| {
                    let (r, g, b) = annotation.style.color;
                    row.col(|ui| {
                        ui.label(RichText::new("■").color(Color32::from_rgb(r, g, b)));
                    });
                    row.col(|ui| {
                        ui.label(annotation.kind.label());
                    });
                    row.col(|ui| {
                        ui.label(annotation.mode.to_string());
                    });
                    row.col(|ui| {
                        ui.label(annotation.details());
                    });
                    row.col(|ui| {
                        if ui
                            .button(RichText::new("✕").color(COLOR_ERROR))
                            .on_hover_text("Remove this annotation")
                            .clicked()
                        {
                            remove = Some(annotation.id);
                        }
                    });
                });
            }
        });

    if let Some(id) = remove {
        state.remove_annotation(id);
    }
}

pub fn sidebar(state: &mut State, ui: &mut Ui) {
    file_info(state, ui);
    ui.separator();
    view_controls(state, ui);
    ui.separator();
    annotation_tools(state, ui);
    ui.separator();
    annotation_list(state, ui);
}
