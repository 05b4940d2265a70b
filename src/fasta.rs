//! FASTA parsing. We use a custom parser instead of `bio`'s reader, since we need lenient
//! handling: Unnamed records, lowercase input, blank lines, and padding ragged records to a
//! common length.

use std::path::Path;

use crate::error::ParseError;

pub const GAP: char = '-';
pub const UNNAMED_SEQ: &str = "Unnamed sequence";

/// File extensions we accept without sniffing the content.
pub const FASTA_EXTENSIONS: [&str; 2] = ["fasta", "fas"];

#[derive(Clone, Debug, PartialEq)]
pub struct Sequence {
    pub name: String,
    /// Uppercase ASCII residues, right-padded with gaps. One byte per column.
    pub sequence: String,
}

impl Sequence {
    /// The residue at a 0-based position. Reads past the end as a gap.
    pub fn residue(&self, i: usize) -> char {
        self.sequence.as_bytes().get(i).map(|b| *b as char).unwrap_or(GAP)
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// A set of sequences, all the same length. This is replaced wholesale when a new file is loaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlignmentSet {
    sequences: Vec<Sequence>,
}

impl AlignmentSet {
    /// Construct from already-parsed sequences, padding them to a common length.
    pub fn new(mut sequences: Vec<Sequence>) -> Result<Self, ParseError> {
        if sequences.iter().all(|s| s.is_empty()) {
            return Err(ParseError::EmptySequences);
        }
        pad_sequences(&mut sequences);

        Ok(Self { sequences })
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// All sequences share this length.
    pub fn alignment_len(&self) -> usize {
        self.sequences.first().map(|s| s.len()).unwrap_or(0)
    }
}

/// Pad every sequence on the right with gaps, to match the longest one. This is a normalization,
/// not an alignment.
pub fn pad_sequences(sequences: &mut [Sequence]) {
    let max_len = sequences.iter().map(|s| s.len()).max().unwrap_or(0);

    for seq in sequences {
        let gaps_needed = max_len - seq.len();
        if gaps_needed > 0 {
            seq.sequence.extend(std::iter::repeat(GAP).take(gaps_needed));
        }
    }
}

/// Parse FASTA text. Lines before the first header are ignored.
pub fn parse(text: &str) -> Result<AlignmentSet, ParseError> {
    let mut sequences = Vec::new();
    let mut current: Option<Sequence> = None;

    for line in text.lines() {
        let line = line.trim();

        if let Some(header) = line.strip_prefix('>') {
            if let Some(seq) = current.take() {
                sequences.push(seq);
            }

            let name = if header.is_empty() {
                UNNAMED_SEQ.to_owned()
            } else {
                header.to_owned()
            };

            current = Some(Sequence {
                name,
                sequence: String::new(),
            });
        } else if !line.is_empty() {
            if let Some(seq) = &mut current {
                if let Some(residue) = line.chars().find(|c| !c.is_ascii()) {
                    return Err(ParseError::InvalidResidue {
                        name: seq.name.clone(),
                        residue,
                    });
                }
                seq.sequence.push_str(&line.to_ascii_uppercase());
            }
        }
    }

    if let Some(seq) = current {
        sequences.push(seq);
    }

    if sequences.is_empty() {
        return Err(ParseError::NoRecords);
    }

    AlignmentSet::new(sequences)
}

/// Decide if this file is something we can read, by extension, or by sniffing for a header.
pub fn is_supported(file_name: &str, text: &str) -> bool {
    let ext_ok = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FASTA_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false);

    ext_ok || text.contains('>')
}

/// Parse the contents of a file, checking that its format is supported first.
pub fn parse_file(file_name: &str, text: &str) -> Result<AlignmentSet, ParseError> {
    if !is_supported(file_name, text) {
        return Err(ParseError::Unsupported);
    }
    parse(text)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn pads_ragged_records() {
        let text = ">a\nACGTACGT\n>b\nACGTA\n>c\nACGTACGT\n";
        let aln = parse(text).unwrap();

        assert_eq!(aln.len(), 3);
        assert_eq!(aln.alignment_len(), 8);
        for seq in aln.sequences() {
            assert_eq!(seq.len(), 8);
        }
        assert_eq!(aln.sequences()[1].sequence, "ACGTA---");
    }

    #[test]
    fn equal_length_records_are_unchanged() {
        let text = ">a\nACGT\n>b\nTT-A\n";
        let aln = parse(text).unwrap();

        assert_eq!(aln.sequences()[0].sequence, "ACGT");
        assert_eq!(aln.sequences()[1].sequence, "TT-A");
    }

    #[test]
    fn multiline_records_lowercase_and_blank_lines() {
        let text = "; comment\n>first seq\nacg\n\n  tac \n>\nGG\n";
        let aln = parse(text).unwrap();

        assert_eq!(aln.sequences()[0].name, "first seq");
        assert_eq!(aln.sequences()[0].sequence, "ACGTAC");
        assert_eq!(aln.sequences()[1].name, UNNAMED_SEQ);
        assert_eq!(aln.sequences()[1].sequence, "GG----");
    }

    #[test]
    fn windows_line_endings() {
        let aln = parse(">x\r\nAC\r\n>y\r\nA\r\n").unwrap();
        assert_eq!(aln.sequences()[0].name, "x");
        assert_eq!(aln.sequences()[1].sequence, "A-");
    }

    #[test]
    fn rejects_text_without_headers() {
        assert_eq!(parse("ACGTACGT\nACGT\n"), Err(ParseError::NoRecords));
        assert_eq!(parse(""), Err(ParseError::NoRecords));
    }

    #[test]
    fn rejects_empty_sequences() {
        assert_eq!(parse(">only\n"), Err(ParseError::EmptySequences));
        assert_eq!(parse(">a\n\n>b\n"), Err(ParseError::EmptySequences));
    }

    #[test]
    fn format_sniffing() {
        assert!(is_supported("aln.FASTA", "ACGT"));
        assert!(is_supported("aln.fas", ""));
        assert!(is_supported("aln.txt", ">a\nAC"));
        assert!(!is_supported("aln.txt", "ACGT"));

        assert_eq!(parse_file("aln.txt", "ACGT"), Err(ParseError::Unsupported));
        assert_eq!(parse_file("aln.fas", "ACGT"), Err(ParseError::NoRecords));
    }

    #[test]
    fn rejects_non_ascii_residues() {
        assert_eq!(
            parse(">a\nACGÅ\n>b\nACGT\n"),
            Err(ParseError::InvalidResidue {
                name: "a".to_owned(),
                residue: 'Å',
            })
        );

        // Names may hold anything.
        let aln = parse(">Å\nACG\n>b\nACGT\n").unwrap();
        assert_eq!(aln.sequences()[0].name, "Å");
        assert_eq!(aln.sequences()[0].sequence, "ACG-");
        assert_eq!(aln.sequences()[0].residue(3), GAP);
    }

    #[test]
    fn residue_past_end_is_gap() {
        let aln = parse(">a\nAC\n").unwrap();
        assert_eq!(aln.sequences()[0].residue(1), 'C');
        assert_eq!(aln.sequences()[0].residue(5), GAP);
    }
}
