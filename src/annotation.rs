//! User-drawn annotations. These store logical coordinates only (alignment positions and sequence
//! indices), so they stay correct when the zoom or line length changes.

use std::fmt;

use bincode::{Decode, Encode};
use chrono::Utc;
use eframe::egui::Rect;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::{
    coords::CoordMapper,
    error::{MsaError, MsaResult},
    util::RangeIncl,
    Color,
};

pub const DEFAULT_COLOR: Color = (0xFF, 0x6B, 0x6B);
pub const DEFAULT_OPACITY: f32 = 0.7;
pub const DEFAULT_BORDER_WIDTH: f32 = 2.;

pub const OPACITY_MIN: f32 = 0.1;
pub const OPACITY_MAX: f32 = 1.;
pub const BORDER_WIDTH_MIN: f32 = 1.;
pub const BORDER_WIDTH_MAX: f32 = 5.;

/// Quick-pick colors offered next to the color picker.
pub const PRESET_COLORS: [Color; 8] = [
    (0xFF, 0x6B, 0x6B),
    (0x4E, 0xCD, 0xC4),
    (0x45, 0xB7, 0xD1),
    (0xFF, 0xA0, 0x7A),
    (0xDD, 0xA0, 0xDD),
    (0x98, 0xFB, 0x98),
    (0xF0, 0xE6, 0x8C),
    (0xFF, 0xB6, 0xC1),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationMode {
    /// A translucent filled rectangle.
    #[default]
    Fill,
    /// A stroked outline with no fill.
    Border,
}

impl fmt::Display for AnnotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self {
            Self::Fill => "Fill",
            Self::Border => "Border only",
        };
        write!(f, "{v}")
    }
}

/// Determines how a committed selection becomes an annotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Encode, Decode, EnumIter)]
pub enum SelectionMode {
    /// Annotate a single cell: The lowest position and sequence the selection covers.
    Residue,
    #[default]
    Region,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self {
            Self::Residue => "Single residue",
            Self::Region => "Region",
        };
        write!(f, "{v}")
    }
}

/// Serialize colors as `#RRGGBB` strings.
mod hex_color {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::{
        util::{color_from_hex, color_to_hex},
        Color,
    };

    pub fn serialize<S: Serializer>(color: &Color, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&color_to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Color, D::Error> {
        let v = String::deserialize(d)?;
        color_from_hex(&v).map_err(|e| de::Error::custom(format!("Invalid color {v}: {e}")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationStyle {
    #[serde(with = "hex_color")]
    pub color: Color,
    /// Used in fill mode.
    pub opacity: f32,
    /// Used in border mode.
    pub border_width: f32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            opacity: DEFAULT_OPACITY,
            border_width: DEFAULT_BORDER_WIDTH,
        }
    }
}

impl AnnotationStyle {
    pub fn set_opacity(&mut self, v: f32) {
        self.opacity = v.clamp(OPACITY_MIN, OPACITY_MAX);
    }

    pub fn set_border_width(&mut self, v: f32) {
        self.border_width = v.clamp(BORDER_WIDTH_MIN, BORDER_WIDTH_MAX);
    }
}

/// Where an annotation sits. Indices are 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum AnnotationKind {
    Residue {
        position: usize,
        sequence: usize,
    },
    /// Inclusive on both axes; start <= end.
    Region {
        start_pos: usize,
        end_pos: usize,
        start_seq: usize,
        end_seq: usize,
    },
}

impl AnnotationKind {
    pub fn positions(&self) -> RangeIncl {
        match self {
            Self::Residue { position, .. } => RangeIncl::new(*position, *position),
            Self::Region {
                start_pos, end_pos, ..
            } => RangeIncl::new(*start_pos, *end_pos),
        }
    }

    pub fn seqs(&self) -> RangeIncl {
        match self {
            Self::Residue { sequence, .. } => RangeIncl::new(*sequence, *sequence),
            Self::Region {
                start_seq, end_seq, ..
            } => RangeIncl::new(*start_seq, *end_seq),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Residue { .. } => "residue",
            Self::Region { .. } => "region",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Creation time in milliseconds, made unique within a store.
    pub id: u64,
    #[serde(flatten)]
    pub kind: AnnotationKind,
    pub mode: AnnotationMode,
    #[serde(flatten)]
    pub style: AnnotationStyle,
}

impl Annotation {
    /// A 1-based description, eg for the annotation list.
    pub fn details(&self) -> String {
        match self.kind {
            AnnotationKind::Residue { position, sequence } => {
                format!("Pos {}, Seq {}", position + 1, sequence + 1)
            }
            AnnotationKind::Region { .. } => {
                format!(
                    "Pos {}, Seq {}",
                    self.kind.positions(),
                    self.kind.seqs()
                )
            }
        }
    }

    /// Pixel rectangles to paint for this annotation, at the current layout.
    pub fn rects(&self, mapper: &CoordMapper) -> Vec<Rect> {
        match self.kind {
            AnnotationKind::Residue { position, sequence } => {
                vec![mapper.cell_rect(position, sequence)]
            }
            AnnotationKind::Region { .. } => {
                mapper.region_rects(self.kind.positions(), self.kind.seqs())
            }
        }
    }
}

/// Build an annotation's logical location from a selection rectangle.
pub fn kind_from_selection(
    selection: Rect,
    selection_mode: SelectionMode,
    mapper: &CoordMapper,
) -> AnnotationKind {
    let (start, end) = mapper.selection_to_cells(selection);

    if selection_mode == SelectionMode::Residue || start == end {
        return AnnotationKind::Residue {
            position: start.position,
            sequence: start.sequence,
        };
    }

    AnnotationKind::Region {
        start_pos: start.position,
        end_pos: end.position,
        start_seq: start.sequence,
        end_seq: end.sequence,
    }
}

type Observer = Box<dyn FnMut()>;

/// Ordered annotations. Creation order is paint order; later entries paint over earlier ones.
#[derive(Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    last_id: u64,
    /// Set on every mutation; cleared by the host when it redraws.
    dirty: bool,
    observer: Option<Observer>,
}

impl fmt::Debug for AnnotationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationStore")
            .field("annotations", &self.annotations)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl AnnotationStore {
    /// Register a callback run after each mutation.
    pub fn set_observer(&mut self, observer: impl FnMut() + 'static) {
        self.observer = Some(Box::new(observer));
    }

    fn changed(&mut self) {
        self.dirty = true;
        if let Some(observer) = &mut self.observer {
            observer();
        }
    }

    /// Returns, and resets, whether the store changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Timestamp IDs; bumped when two annotations are added in the same millisecond.
    fn next_id(&mut self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.last_id = now.max(self.last_id + 1);
        self.last_id
    }

    /// Commit a selection as a new annotation. Without a selection, the store is unchanged.
    pub fn add(
        &mut self,
        selection: Option<Rect>,
        selection_mode: SelectionMode,
        mode: AnnotationMode,
        style: AnnotationStyle,
        mapper: &CoordMapper,
    ) -> MsaResult<&Annotation> {
        let selection = selection.ok_or(MsaError::EmptySelection)?;

        let annotation = Annotation {
            id: self.next_id(),
            kind: kind_from_selection(selection, selection_mode, mapper),
            mode,
            style,
        };
        log::debug!("Adding annotation: {annotation:?}");

        self.annotations.push(annotation);
        self.changed();

        Ok(&self.annotations[self.annotations.len() - 1])
    }

    /// Insert an annotation built elsewhere, eg imported from a manifest. Its ID is kept if unused.
    pub fn push(&mut self, mut annotation: Annotation) {
        if self.get(annotation.id).is_some() {
            annotation.id = self.next_id();
        }
        self.last_id = self.last_id.max(annotation.id);

        self.annotations.push(annotation);
        self.changed();
    }

    /// Returns `true` if an annotation with this ID was present.
    pub fn remove(&mut self, id: u64) -> bool {
        let len_prev = self.annotations.len();
        self.annotations.retain(|a| a.id != id);

        let removed = self.annotations.len() != len_prev;
        if removed {
            self.changed();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.annotations.clear();
        self.changed();
    }

    pub fn list(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, id: u64) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
