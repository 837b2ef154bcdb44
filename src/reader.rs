//! Record stream reader - opens a plain or gzip-compressed GenBank file

use crate::genbank::GenbankReader;
use crate::Result;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Record iterator over an opened file
pub type RecordStream = GenbankReader<BufReader<Box<dyn Read>>>;

/// True when the path carries a `.gz` suffix
pub fn is_gzipped(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

/// Open a file, routing `.gz` paths through a gzip decoder
fn open_file(path: &Path) -> std::io::Result<Box<dyn Read>> {
    let file = File::open(path)?;

    if is_gzipped(path) {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Open `path` and return a lazy, single-pass stream of its records.
///
/// Iterating again requires opening the file again.
pub fn iter_records(path: &Path) -> Result<RecordStream> {
    let reader = open_file(path)?;
    Ok(GenbankReader::new(BufReader::new(reader)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const RECORD: &str = "\
LOCUS       TINY 10 bp DNA linear SYN 01-JAN-2020
FEATURES             Location/Qualifiers
     gene            1..10
                     /gene=\"tiny\"
//
";

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("genome.gbk.gz")));
        assert!(!is_gzipped(Path::new("genome.gbk")));
        assert!(!is_gzipped(Path::new("genome.gz.gbk")));
    }

    #[test]
    fn test_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.gbk");
        std::fs::write(&path, RECORD.repeat(2)).unwrap();

        let records: Vec<_> = iter_records(&path).unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "TINY");
    }

    #[test]
    fn test_gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.gbk.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(RECORD.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let records: Vec<_> = iter_records(&path).unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].features[0].qualifiers[0].key, "gene");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = iter_records(Path::new("/nonexistent/missing.gbk")).err().unwrap();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_corrupt_gzip_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.gbk.gz");
        std::fs::write(&path, b"this is not gzip data").unwrap();

        let first = iter_records(&path).unwrap().next().unwrap();
        assert!(matches!(first, Err(Error::Io(_))));
    }
}
