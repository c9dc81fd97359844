//! FASTA to flat base file conversion.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Error;

/// Copy the sequence lines of a FASTA stream to `writer` as one run of uppercase
/// letters, returning the number of bases written.
///
/// A line is kept only when its first character is a letter, which drops headers,
/// comments and blank lines. Line terminators are not copied.
pub fn flatten_fasta<R: BufRead, W: Write>(reader: R, writer: &mut W) -> Result<u64, Error> {
    let mut written = 0u64;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();
        if !line.starts_with(|c: char| c.is_ascii_alphabetic()) {
            continue;
        }
        let mut bases = line.as_bytes().to_vec();
        bases.make_ascii_uppercase();
        writer.write_all(&bases)?;
        written += bases.len() as u64;
    }
    writer.flush()?;
    Ok(written)
}

/// Open a FASTA file for line reading, decompressing when it ends in `.gz`.
pub fn open_fasta(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open {}: {e}", path.display()),
        ))
    })?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(reader)))
}

/// Flatten the FASTA file at `input` into the flat base file at `output`.
pub fn flatten_fasta_file(input: &Path, output: &Path) -> Result<u64, Error> {
    let reader = open_fasta(input)?;
    let mut writer = BufWriter::new(File::create(output)?);
    flatten_fasta(reader, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Cursor;

    const FASTA: &str = ">chr1 test\nACGTn\nacgt\n\n>second\r\nGGCC\r\n";

    #[test]
    fn headers_and_blank_lines_dropped() {
        let mut out = Vec::new();
        let n = flatten_fasta(Cursor::new(FASTA), &mut out).unwrap();
        assert_eq!(out, b"ACGTNACGTGGCC");
        assert_eq!(n, 13);
    }

    #[test]
    fn non_letter_lines_dropped() {
        let mut out = Vec::new();
        flatten_fasta(Cursor::new(";comment\n123\nAC\n"), &mut out).unwrap();
        assert_eq!(out, b"AC");
    }

    #[test]
    fn empty_input() {
        let mut out = Vec::new();
        assert_eq!(flatten_fasta(Cursor::new(""), &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("chromosome1.fa");
        let output = dir.path().join("chromosome1.bases");
        std::fs::write(&input, FASTA).unwrap();

        assert_eq!(flatten_fasta_file(&input, &output).unwrap(), 13);
        assert_eq!(std::fs::read(&output).unwrap(), b"ACGTNACGTGGCC");
    }

    #[test]
    fn gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("chromosome1.fa.gz");
        let output = dir.path().join("chromosome1.bases");

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(FASTA.as_bytes()).unwrap();
        std::fs::write(&input, encoder.finish().unwrap()).unwrap();

        flatten_fasta_file(&input, &output).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), b"ACGTNACGTGGCC");
    }

    #[test]
    fn missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = flatten_fasta_file(&dir.path().join("absent.fa"), &dir.path().join("out"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
