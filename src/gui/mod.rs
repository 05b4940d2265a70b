//! The egui shell: Panels, status bar, notifications, and input routing. Drawing the alignment
//! itself is in `canvas`, via the shared renderer.

use eframe::{
    egui,
    egui::{Align2, Context, RichText, ViewportCommand},
};

use crate::{gui::theme::COLOR_ERROR, state::State};

pub mod canvas;
pub mod input;
pub mod save;
mod sidebar;
pub mod theme;

pub const WINDOW_WIDTH: f32 = 1_400.;
pub const WINDOW_HEIGHT: f32 = 900.;

pub const WINDOW_TITLE: &str = "MSA Annotator";

pub const ROW_SPACING: f32 = 22.;
pub const COL_SPACING: f32 = 30.;

const SIDE_PANEL_WIDTH: f32 = 320.;

/// `unexported` marks annotations that haven't been saved to a manifest.
pub fn get_window_title(file_name: &str, unexported: bool) -> String {
    if file_name.is_empty() {
        return WINDOW_TITLE.to_owned();
    }
    let marker = if unexported { "*" } else { "" };
    format!("{file_name}{marker} - {WINDOW_TITLE}")
}

fn notification_window(state: &mut State, ctx: &Context) {
    let Some(message) = &state.ui.notification else {
        return;
    };

    let mut dismiss = false;
    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0., 0.])
        .show(ctx, |ui| {
            ui.label(RichText::new(message).color(COLOR_ERROR));
            ui.add_space(ROW_SPACING / 2.);
            if ui.button("OK").clicked() {
                dismiss = true;
            }
        });

    if dismiss {
        state.ui.notification = None;
    }
}

fn status_bar(state: &State, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.label(state.cursor_text(state.ui.cursor_pos));
        ui.add_space(COL_SPACING);
        ui.label(state.selection_text());
        ui.add_space(COL_SPACING);
        ui.label(format!("Scroll: {}%", state.scroll_percent()));
    });
}

pub fn draw(state: &mut State, ctx: &Context) {
    input::handle_input(state, ctx);

    if state.ui.title_dirty {
        ctx.send_viewport_cmd(ViewportCommand::Title(get_window_title(
            &state.file_name,
            state.ui.unexported,
        )));
        state.ui.title_dirty = false;
    }

    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading(WINDOW_TITLE);
            ui.add_space(COL_SPACING);
            save::save_section(state, ui);
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        status_bar(state, ui);
    });

    egui::SidePanel::left("controls")
        .default_width(SIDE_PANEL_WIDTH)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("controls_scroll")
                .show(ui, |ui| sidebar::sidebar(state, ui));
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        if input::files_hovered(ctx) {
            ui.heading("Drop a FASTA file to load it");
        }

        if let Some(alignment) = &state.alignment {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} sequences • {} positions",
                    alignment.len(),
                    alignment.alignment_len()
                ));
                ui.add_space(COL_SPACING);
                ui.label(format!(
                    "Multi-row view ({} rows)",
                    state.mapper.layout.total_rows
                ));
            });

            if alignment.alignment_len() > 2 * state.layout.line_length {
                canvas::scroll_controls(state, ui);
            }
        } else {
            ui.label("Upload a FASTA file, drop one here, or load the sample.");
        }

        canvas::canvas(state, ui);
    });

    save::handle_dialogs(state, ctx);
    notification_window(state, ctx);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_title() {
        assert_eq!(get_window_title("", true), WINDOW_TITLE);
        assert_eq!(get_window_title("a.fasta", false), "a.fasta - MSA Annotator");
        assert_eq!(get_window_title("a.fasta", true), "a.fasta* - MSA Annotator");
    }
}
