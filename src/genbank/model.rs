//! GenBank data model - what the reader hands to the flattener
//!
//! A file is a sequence of [`Record`]s, each owning an ordered list of
//! [`Feature`]s, each owning an ordered list of [`Qualifier`]s.

use std::fmt;

/// Strand of a feature location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    /// Code stored in `feature.location_strand`
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Plus => "+",
            Strand::Minus => "-",
        }
    }

    /// Flip the strand (used when descending into `complement(...)`)
    pub fn reverse(&self) -> Strand {
        match self {
            Strand::Plus => Strand::Minus,
            Strand::Minus => Strand::Plus,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of a feature, reduced to what the database stores.
///
/// Coordinates are 0-based and half-open, so `100..200` in a flat file
/// becomes `start = 99, end = 200`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// A contiguous location with a known strand (strand may still be absent
    /// for locations that carry no direction)
    FullySpecified {
        start: i64,
        end: i64,
        strand: Option<Strand>,
    },
    /// A compound location (`join`, `order`, ...) with no single strand.
    /// Either bound may be missing when no local coordinates exist.
    PartialRange { start: Option<i64>, end: Option<i64> },
}

impl Location {
    pub fn start(&self) -> Option<i64> {
        match self {
            Location::FullySpecified { start, .. } => Some(*start),
            Location::PartialRange { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Option<i64> {
        match self {
            Location::FullySpecified { end, .. } => Some(*end),
            Location::PartialRange { end, .. } => *end,
        }
    }

    pub fn strand(&self) -> Option<Strand> {
        match self {
            Location::FullySpecified { strand, .. } => *strand,
            Location::PartialRange { .. } => None,
        }
    }

    /// True when the location has a strand attribute at all
    pub fn is_fully_specified(&self) -> bool {
        matches!(self, Location::FullySpecified { .. })
    }
}

/// A `/key=value` annotation on a feature. Flag qualifiers like `/pseudo`
/// have no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
    pub key: String,
    pub value: Option<String>,
}

impl Qualifier {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// One entry of the FEATURES table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Feature key (`gene`, `CDS`, `source`, ...)
    pub kind: String,
    pub location: Location,
    pub qualifiers: Vec<Qualifier>,
}

/// One top-level GenBank entry (LOCUS through `//`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub definition: Option<String>,
    pub accession: Option<String>,
    pub version: Option<String>,
    pub features: Vec<Feature>,
}
