//! Strand orientation for genomic features.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Strand orientation of a gene and everything it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Positive,
    Negative,
}

impl Strand {
    /// The catalog symbol: `+` or `-`.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Positive => '+',
            Self::Negative => '-',
        }
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self == Self::Negative
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

impl FromStr for Strand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Self::Positive),
            "-" => Ok(Self::Negative),
            other => Err(Error::Parse(format!("invalid strand symbol: '{other}'"))),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
