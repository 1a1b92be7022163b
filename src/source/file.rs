//! File-backed record and stopword sources
//!
//! Records are tab-separated `identifier<TAB>primary_name[<TAB>secondary_name]`
//! lines; an empty third field means no secondary name. Stopwords are one
//! per line. Blank lines are ignored in both.

use async_trait::async_trait;
use futures::{future, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;

use super::{NameRecord, RecordStream, StopwordSource};
use crate::error::SourceError;

/// Tab-separated name record file
pub struct TsvRecordFile {
    path: PathBuf,
    reader: BufReader<File>,
}

impl TsvRecordFile {
    /// Open the file; failure here is a source-unavailable error
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).await.map_err(|e| SourceError::Unavailable {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            path,
            reader: BufReader::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the file as a record stream
    pub fn into_stream(self) -> RecordStream<'static> {
        LinesStream::new(self.reader.lines())
            .enumerate()
            .filter_map(|(index, line)| {
                future::ready(match line {
                    Ok(line) if line.trim().is_empty() => None,
                    Ok(line) => Some(parse_record_line(index + 1, &line)),
                    Err(e) => Some(Err(SourceError::from(e))),
                })
            })
            .boxed()
    }
}

/// Parse one tab-separated record line (1-based `line_no` for errors)
pub fn parse_record_line(line_no: usize, line: &str) -> Result<NameRecord, SourceError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fields: Vec<&str> = line.split('\t').collect();

    let (identifier, primary, secondary) = match fields.as_slice() {
        [identifier, primary] => (*identifier, *primary, None),
        [identifier, primary, secondary] => (*identifier, *primary, Some(*secondary)),
        _ => {
            return Err(SourceError::Malformed {
                line: line_no,
                reason: format!("expected 2 or 3 tab-separated fields, found {}", fields.len()),
            })
        }
    };

    if identifier.is_empty() {
        return Err(SourceError::Malformed {
            line: line_no,
            reason: "empty identifier".to_string(),
        });
    }

    Ok(NameRecord::new(
        identifier,
        primary,
        secondary.filter(|s| !s.is_empty()).map(str::to_string),
    ))
}

/// Newline-separated stopword file
#[derive(Debug, Clone)]
pub struct StopwordFile {
    path: PathBuf,
    label: String,
}

impl StopwordFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let label = path.display().to_string();
        Self { path, label }
    }
}

#[async_trait]
impl StopwordSource for StopwordFile {
    fn name(&self) -> &str {
        &self.label
    }

    async fn load_stopwords(&self) -> Result<HashSet<String>, SourceError> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| SourceError::Unavailable {
                    source_name: self.label.clone(),
                    reason: e.to_string(),
                })?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use std::io::Write;

    #[test]
    fn test_parse_record_line() {
        let record = parse_record_line(1, "123456789\tACME INC\tACME WIDGETS").unwrap();
        assert_eq!(record.identifier, "123456789");
        assert_eq!(record.primary_name, "ACME INC");
        assert_eq!(record.secondary_name.as_deref(), Some("ACME WIDGETS"));

        let record = parse_record_line(2, "42\tSOLO LLC").unwrap();
        assert_eq!(record.secondary_name, None);

        let record = parse_record_line(3, "42\tSOLO LLC\t\r").unwrap();
        assert_eq!(record.secondary_name, None);
    }

    #[test]
    fn test_parse_record_line_rejects_bad_shape() {
        let err = parse_record_line(7, "just-one-field").unwrap_err();
        assert!(matches!(err, SourceError::Malformed { line: 7, .. }));

        let err = parse_record_line(8, "1\ta\tb\tc").unwrap_err();
        assert!(matches!(err, SourceError::Malformed { line: 8, .. }));

        let err = parse_record_line(9, "\tNAME").unwrap_err();
        assert!(matches!(err, SourceError::Malformed { line: 9, .. }));
    }

    #[tokio::test]
    async fn test_record_file_stream() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1\tALPHA CORP\tALPHA").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "2\tBETA LLC").unwrap();
        file.flush().unwrap();

        let source = TsvRecordFile::open(file.path()).await.unwrap();
        let records: Vec<NameRecord> = source.into_stream().try_collect().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier, "1");
        assert_eq!(records[0].secondary_name.as_deref(), Some("ALPHA"));
        assert_eq!(records[1].primary_name, "BETA LLC");
    }

    #[tokio::test]
    async fn test_record_file_reports_line_number() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1\tALPHA CORP").unwrap();
        writeln!(file, "broken").unwrap();
        file.flush().unwrap();

        let source = TsvRecordFile::open(file.path()).await.unwrap();
        let result: Result<Vec<NameRecord>, SourceError> = source.into_stream().try_collect().await;
        assert!(matches!(result, Err(SourceError::Malformed { line: 2, .. })));
    }

    #[tokio::test]
    async fn test_record_file_counts_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "1\tALPHA CORP\r\n\n   \n4\tDELTA\tDELTA GROUP\n5\n").unwrap();
        file.flush().unwrap();

        let mut records = TsvRecordFile::open(file.path()).await.unwrap().into_stream();

        let first = records.next().await.unwrap().unwrap();
        assert_eq!(first.primary_name, "ALPHA CORP");
        let second = records.next().await.unwrap().unwrap();
        assert_eq!(second.identifier, "4");
        assert_eq!(second.secondary_name.as_deref(), Some("DELTA GROUP"));
        let err = records.next().await.unwrap().unwrap_err();
        assert!(matches!(err, SourceError::Malformed { line: 5, .. }));
        assert!(records.next().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_record_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = TsvRecordFile::open(dir.path().join("nope.tsv")).await;
        assert!(matches!(result, Err(SourceError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_stopword_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "CHURCH\r\nFAMILY\n\n  SMITH FAMILY  \n").unwrap();
        file.flush().unwrap();

        let stopwords = StopwordFile::new(file.path()).load_stopwords().await.unwrap();
        assert_eq!(stopwords.len(), 3);
        assert!(stopwords.contains("CHURCH"));
        assert!(stopwords.contains("FAMILY"));
        assert!(stopwords.contains("SMITH FAMILY"));
    }

    #[tokio::test]
    async fn test_missing_stopword_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = StopwordFile::new(dir.path().join("stopwords.txt"));
        let result = source.load_stopwords().await;
        assert!(matches!(result, Err(SourceError::Unavailable { .. })));
    }
}
