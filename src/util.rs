use std::{fmt, num::ParseIntError, ops::Range};

use crate::Color;

/// An inclusive index range, eg of alignment positions. We use this instead of `RangeInclusive`
/// since it's `Copy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeIncl {
    pub start: usize,
    pub end: usize,
}

impl RangeIncl {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for RangeIncl {
    /// 1-based, for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start + 1, self.end + 1)
    }
}

/// Given a range of positions, return the portion of it each wrapped row contains. This, after
/// converting to pixels, is how we draw regions that cross a line-wrap boundary.
pub fn split_by_rows(range: RangeIncl, row_ranges: &[Range<usize>]) -> Vec<RangeIncl> {
    let mut result = Vec::new();

    if range.end < range.start {
        return result;
    }

    for row in row_ranges {
        if row.is_empty() || row.start > range.end || row.end <= range.start {
            continue;
        }

        let start = range.start.max(row.start);
        let end = range.end.min(row.end - 1);
        result.push(RangeIncl::new(start, end));
    }

    result
}

/// Parse a color in the format `#RRGGBB`.
pub fn color_from_hex(hex: &str) -> Result<Color, ParseIntError> {
    let hex = hex.trim_start_matches('#');

    // A wrong length parses an empty string, which errors.
    let channel = |range: Range<usize>| {
        let digits = if hex.len() == 6 {
            hex.get(range).unwrap_or_default()
        } else {
            ""
        };
        u8::from_str_radix(digits, 16)
    };

    let r = channel(0..2)?;
    let g = channel(2..4)?;
    let b = channel(4..6)?;

    Ok((r, g, b))
}

pub fn color_to_hex(color: Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color.0, color.1, color.2)
}

/// Shorten a label to fit the name column.
pub fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() > max_chars {
        let kept: String = name.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        name.to_owned()
    }
}
