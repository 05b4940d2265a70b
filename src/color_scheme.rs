//! Residue background colors, and the theme colors used for text and the selection outline.

use std::fmt;

use bincode::{Decode, Encode};
use eframe::egui::Color32;
use strum_macros::EnumIter;

const NT_A: Color32 = Color32::from_rgb(0xFF, 0x6B, 0x6B);
const NT_T_U: Color32 = Color32::from_rgb(0x4E, 0xCD, 0xC4);
const NT_G: Color32 = Color32::from_rgb(0x45, 0xB7, 0xD1);
const NT_C: Color32 = Color32::from_rgb(0xFF, 0xA0, 0x7A);
const NT_OTHER: Color32 = Color32::WHITE;

const AA_HYDROPHOBIC: Color32 = Color32::from_rgb(0xD3, 0xD3, 0xD3);
const AA_POLAR: Color32 = Color32::from_rgb(0x87, 0xCE, 0xEB);
const AA_POSITIVE: Color32 = Color32::from_rgb(0xFF, 0x63, 0x47);
const AA_NEGATIVE: Color32 = Color32::from_rgb(0xFF, 0xA5, 0x00);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AaClass {
    Hydrophobic,
    Polar,
    Positive,
    Negative,
}

impl AaClass {
    pub fn from_residue(residue: char) -> Option<Self> {
        match residue {
            'A' | 'I' | 'L' | 'M' | 'F' | 'W' | 'Y' | 'V' => Some(Self::Hydrophobic),
            'N' | 'C' | 'Q' | 'S' | 'T' => Some(Self::Polar),
            'R' | 'H' | 'K' => Some(Self::Positive),
            'D' | 'E' => Some(Self::Negative),
            _ => None,
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            Self::Hydrophobic => AA_HYDROPHOBIC,
            Self::Polar => AA_POLAR,
            Self::Positive => AA_POSITIVE,
            Self::Negative => AA_NEGATIVE,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Encode, Decode, EnumIter)]
pub enum ColorScheme {
    /// No residue backgrounds.
    #[default]
    None,
    Nucleotides,
    AminoAcids,
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self {
            Self::None => "None",
            Self::Nucleotides => "Nucleotides",
            Self::AminoAcids => "Amino acids",
        };
        write!(f, "{v}")
    }
}

impl ColorScheme {
    /// The background color for a residue cell, if any.
    pub fn residue_color(&self, residue: char) -> Option<Color32> {
        match self {
            Self::None => None,
            Self::Nucleotides => Some(match residue {
                'A' => NT_A,
                'T' | 'U' => NT_T_U,
                'G' => NT_G,
                'C' => NT_C,
                _ => NT_OTHER,
            }),
            Self::AminoAcids => AaClass::from_residue(residue).map(|c| c.color()),
        }
    }
}

/// Colors not tied to residues. Passed to the renderer explicitly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub background: Color32,
    pub text: Color32,
    pub text_secondary: Color32,
    /// The live selection outline.
    pub primary: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color32::WHITE,
            text: Color32::BLACK,
            text_secondary: Color32::from_rgb(0x66, 0x66, 0x66),
            primary: Color32::from_rgb(0x4E, 0xCD, 0xC4),
        }
    }
}
