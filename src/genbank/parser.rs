//! Streaming GenBank flat file parser
//!
//! Reads one record at a time from any `BufRead`. Only the annotation of the
//! current record is held in memory; ORIGIN sequence lines are skipped as
//! they are read.
//! Format documentation: https://www.ncbi.nlm.nih.gov/Sitemap/samplerecord.html

use super::location::parse_location;
use super::model::{Feature, Qualifier, Record};
use crate::{Error, Result};
use std::io::BufRead;

/// Column where feature locations and qualifiers start
const FEATURE_TEXT_COLUMN: usize = 21;

/// Lazy, forward-only iterator over the records of a flat file
pub struct GenbankReader<R> {
    reader: R,
    line_no: usize,
    pending: Option<String>,
    buf: String,
    done: bool,
}

impl<R: BufRead> GenbankReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            pending: None,
            buf: String::new(),
            done: false,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }

        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        let line = self.buf.trim_end_matches(['\n', '\r']);
        Ok(Some(line.to_string()))
    }

    fn push_back(&mut self, line: String) {
        self.pending = Some(line);
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            line: self.line_no,
            message: message.into(),
        }
    }

    /// Read the next record, or `None` at a clean end of input
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let locus = loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
            }
        };

        if locus.split_whitespace().next() != Some("LOCUS") {
            return Err(self.error(format!("expected LOCUS line, found '{}'", locus)));
        }
        let name = locus
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| self.error("LOCUS line without a name"))?;

        let mut record = Record {
            name: name.to_string(),
            ..Default::default()
        };

        loop {
            let Some(line) = self.next_line()? else {
                return Err(self.error(format!(
                    "unexpected end of input inside record '{}'",
                    record.name
                )));
            };

            if line.starts_with("//") {
                return Ok(Some(record));
            }
            if line.starts_with(' ') || line.is_empty() {
                // continuation of a skipped keyword, or sequence data
                continue;
            }

            if !line.starts_with(|c: char| c.is_ascii_alphabetic()) {
                return Err(self.error(format!("expected a keyword, found '{}'", line)));
            }
            let (keyword, value) = line
                .split_once(char::is_whitespace)
                .map_or((line.as_str(), ""), |(k, v)| (k, v.trim()));
            match keyword {
                "DEFINITION" => {
                    record.definition = Some(self.read_continued(value)?);
                }
                "ACCESSION" => {
                    record.accession = value.split_whitespace().next().map(str::to_string);
                }
                "VERSION" => {
                    record.version = value.split_whitespace().next().map(str::to_string);
                }
                "FEATURES" => self.read_features(&mut record)?,
                _ => {}
            }
        }
    }

    /// Join a header value with its 12-space indented continuation lines
    fn read_continued(&mut self, first: &str) -> Result<String> {
        let mut parts = vec![first.to_string()];
        while let Some(line) = self.next_line()? {
            if line.starts_with("            ") {
                parts.push(line.trim().to_string());
            } else {
                self.push_back(line);
                break;
            }
        }
        Ok(parts.join(" "))
    }

    fn read_features(&mut self, record: &mut Record) -> Result<()> {
        let mut current: Option<FeatureBuilder> = None;

        while let Some(line) = self.next_line()? {
            if line.trim().is_empty() {
                continue;
            }
            if !line.starts_with(' ') {
                self.push_back(line);
                break;
            }

            if is_feature_header(&line) {
                if let Some(builder) = current.take() {
                    record.features.push(builder.finish()?);
                }
                let mut tokens = line.trim().splitn(2, char::is_whitespace);
                let kind = tokens.next().unwrap_or_default().to_string();
                let location = tokens.next().map(str::trim).unwrap_or_default();
                if location.is_empty() {
                    return Err(self.error(format!("feature '{}' has no location", kind)));
                }
                current = Some(FeatureBuilder::new(kind, location, self.line_no));
                continue;
            }

            let text = line.get(FEATURE_TEXT_COLUMN..).unwrap_or(line.trim_start()).trim_end();
            let text = text.trim_start();
            let Some(builder) = current.as_mut() else {
                return Err(self.error(format!("qualifier before any feature: '{}'", text)));
            };
            builder.push_line(text);
        }

        if let Some(builder) = current.take() {
            record.features.push(builder.finish()?);
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for GenbankReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                // no recovery past a malformed record
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// A feature key sits at column 5: five spaces, then a non-space
fn is_feature_header(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() > 5 && bytes[..5].iter().all(|b| *b == b' ') && bytes[5] != b' '
}

struct FeatureBuilder {
    kind: String,
    location: String,
    location_line: usize,
    qualifiers: Vec<Qualifier>,
    open: Option<(String, Option<String>)>,
}

impl FeatureBuilder {
    fn new(kind: String, location: &str, line: usize) -> Self {
        Self {
            kind,
            location: location.to_string(),
            location_line: line,
            qualifiers: Vec::new(),
            open: None,
        }
    }

    fn push_line(&mut self, text: &str) {
        let inside_quotes = self
            .open
            .as_ref()
            .and_then(|(_, value)| value.as_ref())
            .is_some_and(|v| v.matches('"').count() % 2 == 1);

        if text.starts_with('/') && !inside_quotes {
            self.close_qualifier();
            let body = &text[1..];
            self.open = Some(match body.split_once('=') {
                Some((key, value)) => (key.to_string(), Some(value.to_string())),
                None => (body.to_string(), None),
            });
            return;
        }

        match self.open.as_mut() {
            Some((key, Some(value))) => {
                if key != "translation" {
                    value.push(' ');
                }
                value.push_str(text);
            }
            Some((_, None)) => {}
            None => self.location.push_str(text),
        }
    }

    fn close_qualifier(&mut self) {
        if let Some((key, value)) = self.open.take() {
            self.qualifiers.push(Qualifier::new(key, value.map(unquote)));
        }
    }

    fn finish(mut self) -> Result<Feature> {
        self.close_qualifier();
        let expr = parse_location(&self.location).map_err(|message| Error::Parse {
            line: self.location_line,
            message: format!("feature '{}': {}", self.kind, message),
        })?;
        Ok(Feature {
            kind: self.kind,
            location: expr.to_location(),
            qualifiers: self.qualifiers,
        })
    }
}

fn unquote(raw: String) -> String {
    match raw.strip_prefix('"') {
        Some(inner) => inner
            .strip_suffix('"')
            .unwrap_or(inner)
            .replace("\"\"", "\""),
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genbank::{Location, Strand};

    const SAMPLE: &str = "\
LOCUS       NC_001422               5386 bp    DNA     circular PHG 06-JUL-2018
DEFINITION  Escherichia phage phiX174, complete
            genome.
ACCESSION   NC_001422 J02482
VERSION     NC_001422.1
KEYWORDS    RefSeq.
SOURCE      Escherichia phage phiX174
  ORGANISM  Escherichia phage phiX174
            Viruses; Monodnaviria.
FEATURES             Location/Qualifiers
     source          1..5386
                     /organism=\"Escherichia phage phiX174\"
                     /mol_type=\"genomic DNA\"
                     /db_xref=\"taxon:10847\"
     gene            join(3981..5386,1..136)
                     /gene=\"A\"
     CDS             complement(100..
                     200)
                     /note=\"a long note that
                     wraps /onto the next line\"
                     /pseudo
                     /translation=\"MVRSYY
                     RKTT\"
ORIGIN
        1 gagttttatc gcttccatga cgcagaagtt aacactttcg gatatttctg atgagtcgaa
//
";

    fn read_all(text: &str) -> Vec<Result<Record>> {
        GenbankReader::new(text.as_bytes()).collect()
    }

    #[test]
    fn test_parse_header() {
        let records = read_all(SAMPLE);
        assert_eq!(records.len(), 1);
        let record = records[0].as_ref().unwrap();
        assert_eq!(record.name, "NC_001422");
        assert_eq!(
            record.definition.as_deref(),
            Some("Escherichia phage phiX174, complete genome.")
        );
        assert_eq!(record.accession.as_deref(), Some("NC_001422"));
        assert_eq!(record.version.as_deref(), Some("NC_001422.1"));
    }

    #[test]
    fn test_parse_features_and_qualifiers() {
        let records = read_all(SAMPLE);
        let record = records[0].as_ref().unwrap();
        assert_eq!(record.features.len(), 3);

        let source = &record.features[0];
        assert_eq!(source.kind, "source");
        assert_eq!(source.qualifiers.len(), 3);
        assert_eq!(source.qualifiers[0].key, "organism");
        assert_eq!(
            source.qualifiers[0].value.as_deref(),
            Some("Escherichia phage phiX174")
        );

        let gene = &record.features[1];
        assert_eq!(
            gene.location,
            Location::PartialRange {
                start: Some(0),
                end: Some(5386)
            }
        );

        let cds = &record.features[2];
        assert_eq!(
            cds.location,
            Location::FullySpecified {
                start: 99,
                end: 200,
                strand: Some(Strand::Minus)
            }
        );
        let keys: Vec<_> = cds.qualifiers.iter().map(|q| q.key.as_str()).collect();
        assert_eq!(keys, vec!["note", "pseudo", "translation"]);
        assert_eq!(
            cds.qualifiers[0].value.as_deref(),
            Some("a long note that wraps /onto the next line")
        );
        assert_eq!(cds.qualifiers[1].value, None);
        assert_eq!(cds.qualifiers[2].value.as_deref(), Some("MVRSYYRKTT"));
    }

    #[test]
    fn test_multiple_records_and_blank_lines() {
        let text = format!("{}\n\n{}", SAMPLE, SAMPLE.replace("NC_001422 ", "NC_999999 "));
        let records: Vec<_> = read_all(&text).into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "NC_999999");
    }

    #[test]
    fn test_record_without_features() {
        let text = "LOCUS       EMPTY 10 bp DNA linear SYN 01-JAN-2020\nORIGIN\n        1 acgtacgtac\n//\n";
        let records = read_all(text);
        let record = records[0].as_ref().unwrap();
        assert!(record.features.is_empty());
        assert_eq!(record.definition, None);
    }

    #[test]
    fn test_escaped_quotes() {
        let text = "\
LOCUS       Q 10 bp DNA linear SYN 01-JAN-2020
FEATURES             Location/Qualifiers
     misc_feature    1..10
                     /note=\"say \"\"hi\"\"\"
//
";
        let records = read_all(text);
        let record = records[0].as_ref().unwrap();
        assert_eq!(
            record.features[0].qualifiers[0].value.as_deref(),
            Some("say \"hi\"")
        );
    }

    #[test]
    fn test_truncated_record_is_an_error() {
        let text = "LOCUS       CUT 10 bp DNA linear SYN 01-JAN-2020\nDEFINITION  cut.\n";
        let records = read_all(text);
        assert_eq!(records.len(), 1);
        assert!(matches!(records[0], Err(Error::Parse { .. })));
    }

    #[test]
    fn test_garbage_before_locus() {
        let records = read_all("not a genbank file\n");
        match &records[0] {
            Err(Error::Parse { line, .. }) => assert_eq!(*line, 1),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_location_reports_feature_line() {
        let text = "\
LOCUS       BAD 10 bp DNA linear SYN 01-JAN-2020
FEATURES             Location/Qualifiers
     gene            join(1..5
//
";
        match &read_all(text)[0] {
            Err(Error::Parse { line, message }) => {
                assert_eq!(*line, 3);
                assert!(message.contains("gene"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_stops_after_error() {
        let text = format!("garbage\n{}", SAMPLE);
        let records = read_all(&text);
        assert_eq!(records.len(), 1);
        assert!(records[0].is_err());
    }

    #[test]
    fn test_non_ascii_keyword_line_is_an_error() {
        let text = "LOCUS       X 10 bp DNA\n\u{a0}X foo\n//\n";
        match &read_all(text)[0] {
            Err(Error::Parse { line, .. }) => assert_eq!(*line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_keyword_without_value() {
        let text = "LOCUS       BARE 10 bp DNA\nACCESSION\nKEYWORDS    .\n//\n";
        let records = read_all(text);
        let record = records[0].as_ref().unwrap();
        assert_eq!(record.accession, None);
    }

    #[test]
    fn test_locus_keyword_must_match_exactly() {
        let records = read_all("LOCUSX      NAME 10 bp DNA\n//\n");
        assert!(matches!(records[0], Err(Error::Parse { line: 1, .. })));
    }
}
