//! Error types. All of these are recoverable; the GUI reports them as notifications, and
//! leaves the loaded alignment and annotations as they were.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures turning text into an alignment.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// There was no `>` header line anywhere in the text.
    #[error("No FASTA records found")]
    NoRecords,
    /// Headers were present, but every sequence was empty.
    #[error("No sequences found")]
    EmptySequences,
    #[error("Unsupported file format. Only FASTA files are supported.")]
    Unsupported,
    /// Residues are single ASCII letters; anything else can't be placed in a column.
    #[error("Invalid residue {residue:?} in sequence {name}")]
    InvalidResidue { name: String, residue: char },
}

#[derive(Debug, Error)]
pub enum MsaError {
    #[error("Failed to read file {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error parsing FASTA format: {0}")]
    Parse(#[from] ParseError),

    #[error("Please make a selection first")]
    EmptySelection,

    #[error("No data to export")]
    NoData,

    #[error("Export error: {0}")]
    Export(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type MsaResult<T> = Result<T, MsaError>;
