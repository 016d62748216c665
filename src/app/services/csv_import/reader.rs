//! CSV tokenization for logger data files
//!
//! Turns CSV text into raw string rows for the structural validator. Rows keep
//! their own width (ragged rows are reported later, not rejected here) and cells
//! are never trimmed, so headers reach the inference engine byte for byte.

use crate::constants::CANDIDATE_DELIMITERS;
use crate::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Raw CSV rows as read from a file
pub type RawRows = Vec<Vec<String>>;

/// Read and tokenize a CSV file
///
/// The file is read asynchronously; tokenization happens once the content is in
/// memory. `delimiter` overrides sniffing.
pub async fn read_csv_file(path: &Path, delimiter: Option<u8>) -> Result<RawRows> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(format!("Failed to read CSV file {}", path.display()), e))?;

    read_csv_rows(&content, delimiter, &path.display().to_string())
}

/// Tokenize CSV text into rows
pub fn read_csv_rows(content: &str, delimiter: Option<u8>, source_name: &str) -> Result<RawRows> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(content));
    debug!(
        "Tokenizing {} with delimiter {:?}",
        source_name, delimiter as char
    );

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            Error::csv_parsing(
                source_name,
                format!("Failed to read record {}", index + 1),
                Some(e),
            )
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

/// Pick the delimiter that occurs most often on the first non-empty line
///
/// Occurrences inside double quotes are ignored. Ties go to the earlier entry of
/// the candidate list; a line without any candidate falls back to a comma.
pub fn sniff_delimiter(content: &str) -> u8 {
    let Some(first_line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return b',';
    };

    let mut counts = [0usize; 256];
    let mut in_quotes = false;
    for byte in first_line.bytes() {
        match byte {
            b'"' => in_quotes = !in_quotes,
            other if !in_quotes => counts[other as usize] += 1,
            _ => {}
        }
    }

    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .fold(None, |best: Option<(u8, usize)>, candidate| {
            let count = counts[candidate as usize];
            match best {
                Some((_, best_count)) if best_count >= count => best,
                _ if count > 0 => Some((candidate, count)),
                _ => best,
            }
        })
        .map(|(delimiter, _)| delimiter)
        .unwrap_or(b',')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("a,b,c\n1,2,3"), b',');
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3"), b';');
        assert_eq!(sniff_delimiter("a\tb\tc"), b'\t');
        assert_eq!(sniff_delimiter("\n\nsingle"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn test_sniff_ignores_quoted_delimiters() {
        assert_eq!(sniff_delimiter("\"a;b;c;d\",x,y"), b',');
    }

    #[test]
    fn test_sniff_tie_prefers_comma() {
        assert_eq!(sniff_delimiter("a,b;c"), b',');
    }

    #[test]
    fn test_rows_keep_width_and_whitespace() {
        let rows = read_csv_rows(
            "\u{feff}Timestamp, WS_80m \n2024-01-01 00:00,5.1,extra\n",
            None,
            "test.csv",
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["Timestamp", " WS_80m "]);
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_explicit_delimiter_overrides_sniffing() {
        let rows = read_csv_rows("a;b,c\n1;2,3", Some(b';'), "test.csv").unwrap();
        assert_eq!(rows[0], vec!["a", "b,c"]);
    }

    #[tokio::test]
    async fn test_read_csv_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Timestamp;WS_40m").unwrap();
        writeln!(file, "2024-01-01 00:00;5.2").unwrap();

        let rows = read_csv_file(file.path(), None).await.unwrap();
        assert_eq!(rows, vec![
            vec!["Timestamp".to_string(), "WS_40m".to_string()],
            vec!["2024-01-01 00:00".to_string(), "5.2".to_string()],
        ]);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let result = read_csv_file(Path::new("/nonexistent/logger.csv"), None).await;
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }
}
