//! Location string parsing
//!
//! Feature locations in a flat file are small expressions:
//! `190..255`, `complement(<1..>200)`, `join(1..100,complement(200..300))`,
//! `J00194.1:100..202`, `102^103`. They are parsed into a [`LocationExpr`]
//! tree and then collapsed into the two-variant [`Location`] the database
//! stores.

use super::model::{Location, Strand};

/// Parsed location expression, coordinates as written (1-based, inclusive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationExpr {
    /// `a..b`, or a single base `a` (start == end)
    Range { start: i64, end: i64 },
    /// `a^b`, a site between two bases
    Between { before: i64, after: i64 },
    Complement(Box<LocationExpr>),
    /// `join`, `order`, `bond` and `one-of`
    Compound(Vec<LocationExpr>),
    /// `gap()`, `gap(100)`, `gap(unk100)`
    Gap,
    /// A range on another entry: `J00194.1:100..202`
    Remote { accession: String },
}

impl LocationExpr {
    /// 0-based half-open extent of the local parts of this expression
    pub fn extent(&self) -> Option<(i64, i64)> {
        match self {
            LocationExpr::Range { start, end } => Some((start - 1, *end)),
            LocationExpr::Between { before, .. } => Some((*before, *before)),
            LocationExpr::Complement(inner) => inner.extent(),
            LocationExpr::Compound(parts) => parts
                .iter()
                .filter_map(LocationExpr::extent)
                .reduce(|(s1, e1), (s2, e2)| (s1.min(s2), e1.max(e2))),
            LocationExpr::Gap | LocationExpr::Remote { .. } => None,
        }
    }

    /// Collapse the tree into a stored [`Location`].
    ///
    /// Simple locations keep their strand, `complement` flips it, and
    /// compound locations lose it. A complemented compound location with a
    /// known extent is reported on the minus strand.
    pub fn to_location(&self) -> Location {
        match self {
            LocationExpr::Range { .. } | LocationExpr::Between { .. } => {
                let (start, end) = self.extent().unwrap_or_default();
                Location::FullySpecified {
                    start,
                    end,
                    strand: Some(Strand::Plus),
                }
            }
            LocationExpr::Complement(inner) => match inner.to_location() {
                Location::FullySpecified { start, end, strand } => Location::FullySpecified {
                    start,
                    end,
                    strand: strand.map(|s| s.reverse()),
                },
                Location::PartialRange {
                    start: Some(start),
                    end: Some(end),
                } => Location::FullySpecified {
                    start,
                    end,
                    strand: Some(Strand::Minus),
                },
                partial => partial,
            },
            LocationExpr::Compound(_) | LocationExpr::Gap | LocationExpr::Remote { .. } => {
                let extent = self.extent();
                Location::PartialRange {
                    start: extent.map(|(s, _)| s),
                    end: extent.map(|(_, e)| e),
                }
            }
        }
    }
}

/// Parse a location string. The error is a human readable message; the
/// caller attaches the line number.
pub fn parse_location(text: &str) -> Result<LocationExpr, String> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err("empty location".to_string());
    }

    let mut parser = LocationParser {
        input: compact.as_bytes(),
        pos: 0,
    };
    let expr = parser.expr()?;
    if parser.pos != parser.input.len() {
        return Err(format!(
            "unexpected trailing input in location '{}' at offset {}",
            compact, parser.pos
        ));
    }
    Ok(expr)
}

struct LocationParser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> LocationParser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), String> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(format!(
                "expected '{}' at offset {} in location",
                byte as char, self.pos
            ))
        }
    }

    fn expr(&mut self) -> Result<LocationExpr, String> {
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() => self.named(),
            Some(_) => self.range(),
            None => Err("unexpected end of location".to_string()),
        }
    }

    /// Function call (`join(...)`) or remote reference (`ACC.1:1..10`)
    fn named(&mut self) -> Result<LocationExpr, String> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let word = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();

        if self.eat(b':') {
            self.range()?;
            return Ok(LocationExpr::Remote { accession: word });
        }

        self.expect(b'(')?;
        let expr = match word.as_str() {
            "complement" => LocationExpr::Complement(Box::new(self.expr()?)),
            "join" | "order" | "bond" | "one-of" => {
                let mut parts = vec![self.expr()?];
                while self.eat(b',') {
                    parts.push(self.expr()?);
                }
                LocationExpr::Compound(parts)
            }
            "gap" => {
                while let Some(b) = self.peek() {
                    if b == b')' {
                        break;
                    }
                    self.pos += 1;
                }
                LocationExpr::Gap
            }
            other => return Err(format!("unknown location operator '{}'", other)),
        };
        self.expect(b')')?;
        Ok(expr)
    }

    fn range(&mut self) -> Result<LocationExpr, String> {
        let start = self.point()?;

        if self.input[self.pos..].starts_with(b"..") {
            self.pos += 2;
            let end = self.point()?;
            return Ok(LocationExpr::Range { start, end });
        }
        if self.eat(b'^') {
            let after = self.number()?;
            return Ok(LocationExpr::Between {
                before: start,
                after,
            });
        }
        // `102.110`: a single base somewhere within the range
        if self.eat(b'.') {
            let end = self.number()?;
            return Ok(LocationExpr::Range { start, end });
        }
        Ok(LocationExpr::Range { start, end: start })
    }

    fn point(&mut self) -> Result<i64, String> {
        if !self.eat(b'<') {
            self.eat(b'>');
        }
        self.number()
    }

    fn number(&mut self) -> Result<i64, String> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(format!("expected a coordinate at offset {} in location", start));
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|e| e.to_string())?
            .parse::<i64>()
            .map_err(|e| format!("invalid coordinate: {}", e))
    }
}
