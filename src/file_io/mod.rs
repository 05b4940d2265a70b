//! This module contains code for reading alignment files, and writing exports and preferences.

use std::{fs, path::Path};

use crate::{
    error::{MsaError, MsaResult},
    fasta::{parse_file, AlignmentSet},
};

pub mod export;
pub mod save;

/// The name we report for a loaded file, eg in the manifest. Includes the extension.
pub fn get_filename(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|s| s.to_owned())
        .unwrap_or_default()
}

/// Read a file's full contents as text. There is no retry.
pub fn read_file(path: &Path) -> MsaResult<String> {
    fs::read_to_string(path).map_err(|source| MsaError::FileRead {
        path: path.to_owned(),
        source,
    })
}

/// Read and parse an alignment file.
pub fn load_path(path: &Path) -> MsaResult<(String, AlignmentSet)> {
    let text = read_file(path)?;
    let file_name = get_filename(path);

    let alignment = parse_file(&file_name, &text)?;
    log::info!(
        "Loaded {file_name}: {} sequences, length {}",
        alignment.len(),
        alignment.alignment_len()
    );

    Ok((file_name, alignment))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{env, path::PathBuf};

    use super::*;
    use crate::error::ParseError;

    /// A path in the system temp dir, unique to this test.
    pub fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("msa_annotator_{}_{name}", std::process::id()))
    }

    #[test]
    fn load_from_disk() {
        let path = temp_path("load.fasta");
        fs::write(&path, ">a\nACGT\n>b\nAC\n").unwrap();

        let (name, aln) = load_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(name.ends_with("load.fasta"));
        assert_eq!(aln.len(), 2);
        assert_eq!(aln.sequences()[1].sequence, "AC--");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = temp_path("does_not_exist.fasta");
        assert!(matches!(
            load_path(&path),
            Err(MsaError::FileRead { .. })
        ));
    }

    #[test]
    fn unsupported_content() {
        let path = temp_path("notes.txt");
        fs::write(&path, "Just some notes").unwrap();

        let result = load_path(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(
            result,
            Err(MsaError::Parse(ParseError::Unsupported))
        ));
    }
}
