//! CSV corpus loader.
//!
//! Expects a header row with at least `question` and `answer` columns; any
//! other columns are ignored. Rows with an empty question or answer are
//! skipped with a warning.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use np_protocol::QaPair;

use crate::error::{CorpusError, CorpusResult};

const REQUIRED_COLUMNS: [&str; 2] = ["question", "answer"];

/// Load all question/answer pairs from a CSV file.
pub fn load_csv(path: impl AsRef<Path>) -> CorpusResult<Vec<QaPair>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CorpusError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let pairs = read_pairs(file)?;
    tracing::info!(path = %path.display(), pairs = pairs.len(), "corpus loaded");
    Ok(pairs)
}

/// Read question/answer pairs from any CSV source, in file order.
pub fn read_pairs(reader: impl Read) -> CorpusResult<Vec<QaPair>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(CorpusError::MissingColumn(column));
        }
    }

    let mut pairs = Vec::new();
    for (idx, row) in rdr.deserialize::<QaPair>().enumerate() {
        let pair = row?;
        if pair.question.is_empty() || pair.answer.is_empty() {
            tracing::warn!(row = idx + 1, "skipping corpus row with empty question or answer");
            continue;
        }
        pairs.push(pair);
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
question,answer
show interfaces,show ip int brief
what version is running,show version
\"show routes, all of them\",show route
";

    #[test]
    fn reads_pairs_in_order() {
        let pairs = read_pairs(SAMPLE.as_bytes()).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], QaPair::new("show interfaces", "show ip int brief"));
        assert_eq!(pairs[2].question, "show routes, all of them");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = "id,question,answer,platform\n1,show version,show version,iosxr\n";
        let pairs = read_pairs(csv.as_bytes()).unwrap();
        assert_eq!(pairs, vec![QaPair::new("show version", "show version")]);
    }

    #[test]
    fn missing_answer_column_rejected() {
        let csv = "question,command\nshow version,show version\n";
        let err = read_pairs(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CorpusError::MissingColumn("answer")));
    }

    #[test]
    fn blank_rows_skipped() {
        let csv = "question,answer\nshow version,\n , show clock\nshow clock,show clock\n";
        let pairs = read_pairs(csv.as_bytes()).unwrap();
        assert_eq!(pairs, vec![QaPair::new("show clock", "show clock")]);
    }

    #[test]
    fn fields_are_trimmed() {
        let csv = "question,answer\n  show version  ,  show version \n";
        let pairs = read_pairs(csv.as_bytes()).unwrap();
        assert_eq!(pairs[0], QaPair::new("show version", "show version"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let pairs = load_csv(file.path()).unwrap();
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_csv("/nonexistent/netpilot/sample.csv").unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/netpilot/sample.csv"));
    }
}
