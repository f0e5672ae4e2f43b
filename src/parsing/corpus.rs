//! Parser for sentence-per-line corpus files.
//!
//! Lines are trimmed and blank lines are skipped, so trailing newlines and
//! empty separator lines do not produce empty sentences.

use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "Hypothesis and reference files differ in length: {hypotheses} hypotheses but {references} references"
    )]
    LengthMismatch {
        hypotheses: usize,
        references: usize,
    },
}

/// Split corpus text into trimmed, non-empty sentences
#[must_use]
pub fn parse_sentences_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Read a UTF-8 file with one sentence per line
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or is not UTF-8.
pub fn read_sentences(path: &Path) -> Result<Vec<String>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_sentences_text(&content))
}

/// Read a hypothesis file and a reference file of equal sentence count
///
/// # Errors
///
/// Returns `ParseError::Io` if either file cannot be read, or
/// `ParseError::LengthMismatch` if their sentence counts differ.
pub fn read_parallel(
    hypothesis_path: &Path,
    reference_path: &Path,
) -> Result<(Vec<String>, Vec<String>), ParseError> {
    let hypotheses = read_sentences(hypothesis_path)?;
    let references = read_sentences(reference_path)?;

    if hypotheses.len() != references.len() {
        return Err(ParseError::LengthMismatch {
            hypotheses: hypotheses.len(),
            references: references.len(),
        });
    }

    Ok((hypotheses, references))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_sentences_text() {
        let sentences = parse_sentences_text("  Frau Frauen \n\n\tHaus Kind\n   \n");
        assert_eq!(sentences, vec!["Frau Frauen", "Haus Kind"]);
    }

    #[test]
    fn test_crlf_lines() {
        let sentences = parse_sentences_text("eins\r\nzwei\r\n");
        assert_eq!(sentences, vec!["eins", "zwei"]);
    }

    #[test]
    fn test_read_parallel() {
        let hyp = write_temp("Frau Frauen\nHaus Kind\n");
        let reference = write_temp("Frau Frau\n\nFrau Mann\n");

        let (hyps, refs) = read_parallel(hyp.path(), reference.path()).unwrap();
        assert_eq!(hyps.len(), 2);
        assert_eq!(refs, vec!["Frau Frau", "Frau Mann"]);
    }

    #[test]
    fn test_read_parallel_mismatch() {
        let hyp = write_temp("a\nb\nc\n");
        let reference = write_temp("a\n");

        match read_parallel(hyp.path(), reference.path()) {
            Err(ParseError::LengthMismatch {
                hypotheses,
                references,
            }) => {
                assert_eq!(hypotheses, 3);
                assert_eq!(references, 1);
            }
            other => panic!("expected LengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = read_sentences(Path::new("/nonexistent/corpus.txt"));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
