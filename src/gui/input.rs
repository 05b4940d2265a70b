//! Code related to mouse and keyboard input handling.

use eframe::egui::{Context, InputState, Key};

use crate::{
    error::ParseError,
    layout::{ZOOM_WHEEL_IN_FACTOR, ZOOM_WHEEL_OUT_FACTOR},
    state::State,
};

/// Page Up/Down, and the arrow keys.
pub const SCROLL_STEP: f32 = 200.;
/// Ctrl + arrow keys.
pub const SCROLL_STEP_FINE: f32 = 50.;

/// Ignore wheel zoom deltas smaller than this.
const ZOOM_DELTA_THRESH: f32 = 0.001;

/// Handle hotkeys, and Ctrl + mouse wheel zooming.
fn handle_global(state: &mut State, ip: &InputState) {
    let ctrl = ip.modifiers.command;

    if ctrl && (ip.key_pressed(Key::Plus) || ip.key_pressed(Key::Equals)) {
        state.zoom_in();
    }
    if ctrl && ip.key_pressed(Key::Minus) {
        state.zoom_out();
    }

    // egui converts Ctrl + scroll into a zoom delta.
    let zoom_delta = ip.zoom_delta();
    if (zoom_delta - 1.).abs() > ZOOM_DELTA_THRESH {
        if zoom_delta > 1. {
            state.adjust_zoom(ZOOM_WHEEL_IN_FACTOR);
        } else {
            state.adjust_zoom(ZOOM_WHEEL_OUT_FACTOR);
        }
    }

    if ctrl && ip.key_pressed(Key::O) {
        state.ui.file_dialogs.open.select_file();
    }

    if ip.key_pressed(Key::Escape) {
        state.clear_selection();
        state.ui.confirm_clear = false;
    }

    let arrow_step = if ctrl { SCROLL_STEP_FINE } else { SCROLL_STEP };
    let mut scroll = 0.;

    if ip.key_pressed(Key::PageUp) {
        scroll -= SCROLL_STEP;
    }
    if ip.key_pressed(Key::PageDown) {
        scroll += SCROLL_STEP;
    }
    if ip.key_pressed(Key::ArrowUp) {
        scroll -= arrow_step;
    }
    if ip.key_pressed(Key::ArrowDown) {
        scroll += arrow_step;
    }

    if scroll != 0. {
        state.scroll_by(scroll, state.ui.viewport_height);
    }
}

/// Load a dropped file. Native builds get a path; web builds get the contents.
fn handle_dropped(state: &mut State, ip: &InputState) {
    let Some(file) = ip.raw.dropped_files.first() else {
        return;
    };

    let result = if let Some(path) = &file.path {
        state.load_path(path)
    } else if let Some(bytes) = &file.bytes {
        match std::str::from_utf8(bytes) {
            Ok(text) => state.load_text(&file.name, text),
            Err(_) => Err(ParseError::Unsupported.into()),
        }
    } else {
        Ok(())
    };

    if let Err(e) = result {
        state.notify(&e);
    }
}

/// Handles keyboard and mouse input not associated with a widget.
pub fn handle_input(state: &mut State, ctx: &Context) {
    ctx.input(|ip| {
        handle_dropped(state, ip);
        handle_global(state, ip);
    });
}

/// Are files being dragged over the window?
pub fn files_hovered(ctx: &Context) -> bool {
    ctx.input(|ip| !ip.raw.hovered_files.is_empty())
}
