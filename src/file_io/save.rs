//! Preference persistence, using Bincode. Alignments and annotations aren't saved here; they
//! leave the program only through explicit exports.

use std::{
    fs::File,
    io,
    io::{Read, Write},
    path::Path,
};

use bincode::{config, Decode, Encode};

use crate::{
    annotation::{AnnotationMode, AnnotationStyle, SelectionMode},
    color_scheme::ColorScheme,
    layout::LayoutConfig,
    state::State,
};

pub const DEFAULT_PREFS_FILE: &str = "msa_prefs.mp";

#[derive(Clone, Debug, PartialEq, Encode, Decode)]
/// Represents state to save automatically; not related to alignment data.
pub struct PrefsToSave {
    color_scheme: ColorScheme,
    layout: LayoutConfig,
    annotation_mode: AnnotationMode,
    selection_mode: SelectionMode,
    style: AnnotationStyle,
}

impl PrefsToSave {
    pub fn from_state(state: &State) -> Self {
        Self {
            color_scheme: state.ui.color_scheme,
            layout: state.layout,
            annotation_mode: state.ui.annotation_mode,
            selection_mode: state.ui.selection_mode,
            style: state.ui.style,
        }
    }

    /// Load into state. Values are re-clamped, in case the file was edited or is from an older
    /// version with different limits.
    pub fn apply(&self, state: &mut State) {
        state.ui.color_scheme = self.color_scheme;
        state.ui.annotation_mode = self.annotation_mode;
        state.ui.selection_mode = self.selection_mode;

        state.ui.style = self.style;
        state.ui.style.set_opacity(self.style.opacity);
        state.ui.style.set_border_width(self.style.border_width);

        state.layout = self.layout;
        state.layout.set_line_length(self.layout.line_length);
        state.layout.adjust_zoom(1.);
    }
}

/// Save to file, using Bincode.
pub fn save<T: Encode>(path: &Path, data: &T) -> io::Result<()> {
    let config = config::standard();

    let encoded: Vec<u8> = bincode::encode_to_vec(data, config).map_err(io::Error::other)?;

    let mut file = File::create(path)?;
    file.write_all(&encoded)?;
    Ok(())
}

/// Load from file, using Bincode.
pub fn load<T: Decode<()>>(path: &Path) -> io::Result<T> {
    let config = config::standard();

    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    let (decoded, _len) = bincode::decode_from_slice(&buffer, config).map_err(|e| {
        log::warn!("Error loading from file. Did the format change? {e}");
        io::Error::new(io::ErrorKind::InvalidData, "error loading")
    })?;

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::file_io::tests::temp_path;

    #[test]
    fn prefs_survive_a_restart() {
        let mut state = State::default();
        state.ui.color_scheme = ColorScheme::AminoAcids;
        state.ui.annotation_mode = AnnotationMode::Border;
        state.ui.style.set_border_width(4.);
        state.set_line_length(55);

        let path = temp_path("prefs.mp");
        save(&path, &PrefsToSave::from_state(&state)).unwrap();
        let loaded: PrefsToSave = load(&path).unwrap();
        fs::remove_file(&path).ok();

        let mut fresh = State::default();
        loaded.apply(&mut fresh);

        assert_eq!(fresh.ui.color_scheme, ColorScheme::AminoAcids);
        assert_eq!(fresh.ui.annotation_mode, AnnotationMode::Border);
        assert_eq!(fresh.ui.style.border_width, 4.);
        assert_eq!(fresh.layout.line_length, 55);
    }

    #[test]
    fn garbage_file_is_an_error() {
        let path = temp_path("garbage.mp");
        fs::write(&path, [0xFF; 3]).unwrap();

        let result: io::Result<PrefsToSave> = load(&path);
        fs::remove_file(&path).ok();

        assert!(result.is_err());
    }
}
