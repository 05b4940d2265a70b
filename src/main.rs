// Disables the terminal window on Windows, in release mode.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use std::{env, path::PathBuf};

use eframe::egui;
use msa_annotator::{
    file_io::save::DEFAULT_PREFS_FILE,
    gui::{get_window_title, WINDOW_HEIGHT, WINDOW_WIDTH},
    state::State,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut state = State::default();
    state.load_prefs(&PathBuf::from(DEFAULT_PREFS_FILE));

    // Initial load hierarchy:
    // - Path argument (e.g. file association)
    // - The sample alignment
    let path_arg = env::args().nth(1).map(PathBuf::from);

    let loaded_from_arg = match &path_arg {
        Some(path) => match state.load_path(path) {
            Ok(()) => true,
            Err(e) => {
                state.notify(&e);
                false
            }
        },
        None => false,
    };

    if !loaded_from_arg {
        if let Err(e) = state.load_sample() {
            state.notify(&e);
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let title = get_window_title(&state.file_name, false);

    if let Err(e) = eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            // Ctrl + +/- zooms the alignment, not the whole UI.
            cc.egui_ctx.options_mut(|o| o.zoom_with_keyboard = false);

            let ctx = cc.egui_ctx.clone();
            state
                .annotations
                .set_observer(move || ctx.request_repaint());

            Ok(Box::new(state))
        }),
    ) {
        log::error!("Application error: {e}");
    }
}
