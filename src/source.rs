//! Random-access sources of flat base data.
//!
//! A flat base file holds nothing but nucleotide letters, one byte per base, so the
//! byte offset of a base is its 0-based position on the chromosome.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::Error;

/// Byte-range access to a chromosome's flat bases.
pub trait SequenceSource {
    /// Identifies the source; exons remember the name they were materialized from.
    fn name(&self) -> &str;

    /// Total number of bases.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read exactly `length` bytes starting at `offset`.
    fn read_at(&mut self, offset: u64, length: usize) -> Result<Vec<u8>, Error>;
}

fn out_of_range(name: &str, offset: u64, length: usize, available: u64) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("{name}: range {offset}+{length} exceeds sequence length {available}"),
    ))
}

fn in_range(offset: u64, length: usize, available: u64) -> bool {
    offset
        .checked_add(length as u64)
        .is_some_and(|end| end <= available)
}

/// A flat base file opened for seek+read. Closed when dropped.
pub struct FlatSequenceFile {
    name: String,
    reader: BufReader<File>,
    length: u64,
}

impl FlatSequenceFile {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("failed to open {}: {e}", path.display()),
            ))
        })?;
        let length = file.metadata()?.len();
        Ok(Self {
            name: path.display().to_string(),
            reader: BufReader::new(file),
            length,
        })
    }
}

impl SequenceSource for FlatSequenceFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> u64 {
        self.length
    }

    fn read_at(&mut self, offset: u64, length: usize) -> Result<Vec<u8>, Error> {
        if !in_range(offset, length, self.length) {
            return Err(out_of_range(&self.name, offset, length, self.length));
        }
        self.reader.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; length];
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }
}

/// A whole chromosome held in memory.
#[derive(Debug, Clone)]
pub struct MemorySequence {
    name: String,
    bases: Vec<u8>,
}

impl MemorySequence {
    pub fn new(name: impl Into<String>, bases: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bases: bases.into(),
        }
    }

    /// Read a flat base file completely.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let bases = std::fs::read(path).map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("failed to read {}: {e}", path.display()),
            ))
        })?;
        Ok(Self::new(path.display().to_string(), bases))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bases
    }
}

impl SequenceSource for MemorySequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> u64 {
        self.bases.len() as u64
    }

    fn read_at(&mut self, offset: u64, length: usize) -> Result<Vec<u8>, Error> {
        let available = self.bases.len() as u64;
        if !in_range(offset, length, available) {
            return Err(out_of_range(&self.name, offset, length, available));
        }
        let start = offset as usize;
        Ok(self.bases[start..start + length].to_vec())
    }
}
