//! Nucleotide bases and ordered base buffers.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A single nucleotide symbol: the four DNA bases, `N`, and the IUPAC ambiguity codes.
/// Encoded as its upper-case ASCII letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Base {
    A = b'A',
    C = b'C',
    G = b'G',
    T = b'T',
    N = b'N',
    R = b'R',
    Y = b'Y',
    S = b'S',
    W = b'W',
    K = b'K',
    M = b'M',
    B = b'B',
    D = b'D',
    H = b'H',
    V = b'V',
}

impl Base {
    /// Parse a single letter, case-insensitive.
    #[must_use]
    pub fn from_letter(letter: u8) -> Option<Self> {
        let base = match letter.to_ascii_uppercase() {
            b'A' => Self::A,
            b'C' => Self::C,
            b'G' => Self::G,
            b'T' => Self::T,
            b'N' => Self::N,
            b'R' => Self::R,
            b'Y' => Self::Y,
            b'S' => Self::S,
            b'W' => Self::W,
            b'K' => Self::K,
            b'M' => Self::M,
            b'B' => Self::B,
            b'D' => Self::D,
            b'H' => Self::H,
            b'V' => Self::V,
            _ => return None,
        };
        Some(base)
    }

    #[must_use]
    pub fn letter(self) -> u8 {
        self as u8
    }

    /// Watson-Crick partner; ambiguity codes map to the code of the complementary set.
    #[must_use]
    pub fn complement(self) -> Self {
        match self {
            Self::A => Self::T,
            Self::T => Self::A,
            Self::C => Self::G,
            Self::G => Self::C,
            Self::R => Self::Y,
            Self::Y => Self::R,
            Self::K => Self::M,
            Self::M => Self::K,
            Self::B => Self::V,
            Self::V => Self::B,
            Self::D => Self::H,
            Self::H => Self::D,
            // self-complementary
            Self::N | Self::S | Self::W => self,
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter() as char)
    }
}

/// An ordered list of bases.
///
/// Transformations (`reverse`, `complement`, `reverse_complement`) never touch the
/// receiver and always return a new buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bases {
    bases: Vec<Base>,
}

impl Bases {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a byte slice of letters. Fails on the first byte outside the alphabet.
    pub fn from_letters(letters: &[u8]) -> Result<Self, Error> {
        let mut bases = Self {
            bases: Vec::with_capacity(letters.len()),
        };
        bases.push_bytes(letters)?;
        Ok(bases)
    }

    /// Append the letters of `letters` to the end of the buffer.
    ///
    /// On error the buffer is left unchanged.
    pub fn push_letters(&mut self, letters: &str) -> Result<&mut Self, Error> {
        self.push_bytes(letters.as_bytes())?;
        Ok(self)
    }

    /// Append all bases of `other`.
    pub fn extend(&mut self, other: &Bases) -> &mut Self {
        self.bases.extend_from_slice(&other.bases);
        self
    }

    pub fn push(&mut self, base: Base) -> &mut Self {
        self.bases.push(base);
        self
    }

    fn push_bytes(&mut self, letters: &[u8]) -> Result<(), Error> {
        let decoded = letters
            .iter()
            .enumerate()
            .map(|(position, &letter)| {
                Base::from_letter(letter).ok_or(Error::InvalidBase {
                    letter: letter as char,
                    position,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.bases.extend(decoded);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Base] {
        &self.bases
    }

    /// The bases as upper-case ASCII bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bases.iter().map(|b| b.letter()).collect()
    }

    /// The bases as a letter string.
    #[must_use]
    pub fn letters(&self) -> String {
        self.bases.iter().map(|b| b.letter() as char).collect()
    }

    #[must_use]
    pub fn reverse(&self) -> Self {
        Self {
            bases: self.bases.iter().rev().copied().collect(),
        }
    }

    #[must_use]
    pub fn complement(&self) -> Self {
        Self {
            bases: self.bases.iter().map(|b| b.complement()).collect(),
        }
    }

    #[must_use]
    pub fn reverse_complement(&self) -> Self {
        self.reverse().complement()
    }
}

impl FromStr for Bases {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_letters(s.as_bytes())
    }
}

impl fmt::Display for Bases {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters())
    }
}

impl From<Vec<Base>> for Bases {
    fn from(bases: Vec<Base>) -> Self {
        Self { bases }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bases(s: &str) -> Bases {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_letters() {
        let b = bases("ACGTN");
        assert_eq!(b.len(), 5);
        assert_eq!(b.letters(), "ACGTN");
        assert_eq!(b.to_bytes(), b"ACGTN");
    }

    #[test]
    fn lowercase_is_normalized() {
        assert_eq!(bases("acgtn").letters(), "ACGTN");
    }

    #[test]
    fn invalid_letter_names_position() {
        let err = "ACXT".parse::<Bases>().unwrap_err();
        match err {
            Error::InvalidBase { letter, position } => {
                assert_eq!(letter, 'X');
                assert_eq!(position, 2);
            }
            other => panic!("expected InvalidBase, got {other:?}"),
        }
    }

    #[test]
    fn push_letters_appends() {
        let mut b = Bases::new();
        b.push_letters("AC").unwrap().push_letters("GT").unwrap();
        assert_eq!(b.letters(), "ACGT");
    }

    #[test]
    fn failed_push_leaves_buffer_unchanged() {
        let mut b = bases("AC");
        assert!(b.push_letters("G?").is_err());
        assert_eq!(b.letters(), "AC");
    }

    #[test]
    fn extend_appends_other_buffer() {
        let mut b = bases("AAA");
        b.extend(&bases("CCC")).push(Base::G);
        assert_eq!(b.letters(), "AAACCCG");
    }

    #[test]
    fn reverse_is_pure() {
        let b = bases("AACG");
        let r = b.reverse();
        assert_eq!(r.letters(), "GCAA");
        assert_eq!(b.letters(), "AACG");
    }

    #[test]
    fn complement_pairs_bases() {
        assert_eq!(bases("ACGTN").complement().letters(), "TGCAN");
        assert_eq!(bases("RYKMBVDHSW").complement().letters(), "YRMKVBHDSW");
    }

    #[test]
    fn reverse_complement() {
        assert_eq!(bases("AACG").reverse_complement().letters(), "CGTT");
        assert_eq!(bases("ATGN").reverse_complement().letters(), "NCAT");
    }

    #[test]
    fn reverse_complement_twice_is_identity() {
        for s in ["", "A", "ACGTTGCA", "NNACGRYKM", "GATTACA"] {
            let b = bases(s);
            assert_eq!(b.reverse_complement().reverse_complement(), b);
        }
    }

    #[test]
    fn complement_is_involution() {
        for letter in b"ACGTNRYSWKMBDHV" {
            let base = Base::from_letter(*letter).unwrap();
            assert_eq!(base.complement().complement(), base);
        }
    }
}
