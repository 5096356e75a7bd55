//! CSV adapter for comment datasets.
//!
//! The first row is the header. A leading UTF-8 byte order mark is ignored on
//! read and written on output, so files round-trip with spreadsheet tools:
//! ```csv
//! Author,Comment
//! someone,"add me on discord, cutie"
//! ```

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::dataset::field_value::FieldValue;
use crate::dataset::labeler::LabeledDataset;
use crate::dataset::record::{CommentDataset, CommentRecord};
use crate::error::{Result, RiskError};
use crate::scoring::tier::Tier;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads a CSV file into a [`CommentDataset`].
///
/// Cells are read with [`FieldValue::from_cell`] and keep their source text,
/// so a labeled copy reproduces every input cell exactly. Short rows are
/// padded with nulls when the reader is flexible.
#[derive(Debug, Clone)]
pub struct CsvCommentReader {
    /// CSV delimiter character (default: ',')
    delimiter: u8,
    /// Whether to allow rows with fewer fields than the header
    flexible: bool,
}

impl Default for CsvCommentReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvCommentReader {
    /// Create a new CSV reader with comma delimiter.
    pub fn new() -> Self {
        CsvCommentReader {
            delimiter: b',',
            flexible: false,
        }
    }

    /// Set a custom delimiter character.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to allow flexible field counts.
    pub fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    /// Read a dataset from a file.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<CommentDataset> {
        let file = File::open(path.as_ref())?;
        let dataset = self.read_from(file)?;
        log::info!(
            "Read {} records with {} columns from {}",
            dataset.len(),
            dataset.columns().len(),
            path.as_ref().display()
        );
        Ok(dataset)
    }

    /// Read a dataset from any reader.
    pub fn read_from<R: Read>(&self, input: R) -> Result<CommentDataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(self.flexible)
            .from_reader(input);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(RiskError::empty_dataset("CSV input has no header row"));
        }

        let mut dataset = CommentDataset::new(headers.clone());
        for row in reader.records() {
            let row = row?;
            let mut record = CommentRecord::new();
            for (i, header) in headers.iter().enumerate() {
                match row.get(i) {
                    Some(raw) => record.add_cell(header.as_str(), raw),
                    None => record.add_field(header.as_str(), FieldValue::Null),
                }
            }
            dataset.push(record);
        }

        Ok(dataset)
    }
}

/// Writes a [`LabeledDataset`] as CSV with a UTF-8 byte order mark.
#[derive(Debug, Clone)]
pub struct CsvCommentWriter {
    delimiter: u8,
    bom: bool,
}

impl Default for CsvCommentWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvCommentWriter {
    /// Create a new CSV writer with comma delimiter and a byte order mark.
    pub fn new() -> Self {
        CsvCommentWriter {
            delimiter: b',',
            bom: true,
        }
    }

    /// Set a custom delimiter character.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to prefix output with a byte order mark.
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    /// Write the labeled dataset to a file, replacing it.
    pub fn write<P: AsRef<Path>>(&self, path: P, dataset: &LabeledDataset) -> Result<()> {
        let file = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(file, dataset)?;
        log::info!(
            "Wrote {} labeled records to {}",
            dataset.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Write the labeled dataset to any writer.
    pub fn write_to<W: Write>(&self, mut output: W, dataset: &LabeledDataset) -> Result<()> {
        if self.bom {
            output.write_all(UTF8_BOM)?;
        }

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(output);

        writer.write_record(dataset.output_columns())?;
        for row in dataset.to_rows() {
            writer.write_record(&row)?;
        }
        writer.flush()?;

        Ok(())
    }
}

/// Extract `(text, tier)` training examples from a labeled dataset.
///
/// Rows missing either value are dropped and the count is logged. A label
/// that is not a tier name fails with [`RiskError::InvalidLabel`] carrying
/// the 1-based data row number.
pub fn training_examples(
    dataset: &CommentDataset,
    text_column: &str,
    label_column: &str,
) -> Result<Vec<(String, Tier)>> {
    for column in [text_column, label_column] {
        if !dataset.has_column(column) {
            return Err(RiskError::missing_column(column));
        }
    }

    let mut examples = Vec::with_capacity(dataset.len());
    let mut dropped = 0usize;

    for (i, record) in dataset.records().iter().enumerate() {
        let text = record.get_field(text_column).filter(|v| !v.is_null());
        let label = record.get_field(label_column).filter(|v| !v.is_null());

        let (Some(text), Some(label)) = (text, label) else {
            dropped += 1;
            continue;
        };

        let label = label.to_string();
        let tier = Tier::from_name(&label).ok_or_else(|| RiskError::InvalidLabel {
            value: label.clone(),
            row: i + 1,
        })?;
        examples.push((text.to_string(), tier));
    }

    if dropped > 0 {
        log::warn!("Dropped {dropped} rows with a missing '{text_column}' or '{label_column}'");
    }
    if examples.is_empty() {
        return Err(RiskError::empty_dataset("no rows with both text and label"));
    }

    Ok(examples)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::dataset::labeler::DatasetLabeler;
    use crate::scoring::scorer::LexicalScorer;
    use crate::scoring::vocabulary::Vocabulary;

    #[test]
    fn test_read_keeps_text_and_strips_bom() {
        let input = "\u{feff}Comment,Likes\n\"hello, world\",3\n,7\n";
        let dataset = CsvCommentReader::new().read_from(input.as_bytes()).unwrap();

        assert_eq!(dataset.columns(), &["Comment".to_string(), "Likes".to_string()]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(0).unwrap().get_text("Comment"), Some("hello, world"));
        assert_eq!(
            dataset.get(0).unwrap().get_field("Likes"),
            Some(&FieldValue::Text("3".to_string()))
        );
        assert!(dataset.get(1).unwrap().get_field("Comment").unwrap().is_null());
    }

    #[test]
    fn test_read_empty_input() {
        let result = CsvCommentReader::new().read_from("".as_bytes());
        assert!(matches!(result, Err(RiskError::EmptyDataset(_))));
    }

    #[test]
    fn test_flexible_rows_are_padded() {
        let input = "Comment,Likes\nshort\n";
        assert!(CsvCommentReader::new().read_from(input.as_bytes()).is_err());

        let dataset = CsvCommentReader::new()
            .with_flexible(true)
            .read_from(input.as_bytes())
            .unwrap();
        assert!(dataset.get(0).unwrap().get_field("Likes").unwrap().is_null());
    }

    #[test]
    fn test_write_then_read_labeled_file() {
        let vocabulary = Vocabulary::from_pairs(vec![("kill", 5), ("please", 1)]).unwrap();
        let labeler = DatasetLabeler::new(LexicalScorer::new(Arc::new(vocabulary)));
        let dataset = CommentDataset::from_texts("Comment", &["Please don't kill me", "hi"]);
        let labeled = labeler.label(&dataset).unwrap();

        let file = NamedTempFile::new().unwrap();
        CsvCommentWriter::new().write(file.path(), &labeled).unwrap();

        let bytes = std::fs::read(file.path()).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let reread = CsvCommentReader::new().read(file.path()).unwrap();
        assert_eq!(
            reread.columns(),
            &["Comment", "Score", "Status Level", "Triggered Keywords"].map(String::from)
        );
        let first = reread.get(0).unwrap();
        assert_eq!(first.get_text("Score"), Some("6"));
        assert_eq!(first.get_text("Status Level"), Some("Suspicious"));
        assert_eq!(first.get_text("Triggered Keywords"), Some("kill, please"));

        let examples = training_examples(&reread, "Comment", "Status Level").unwrap();
        assert_eq!(
            examples,
            vec![
                ("Please don't kill me".to_string(), Tier::Suspicious),
                ("hi".to_string(), Tier::Safe),
            ]
        );
    }

    #[test]
    fn test_labeled_copy_reproduces_input_cells() {
        let cells = ["Infinity", "007", "1e3", "1.50", "TRUE", "NaN", "kill, \"please\""];
        let mut input = String::from("Comment,Likes\n");
        for cell in cells {
            input.push_str(&format!("\"{}\",0010\n", cell.replace('"', "\"\"")));
        }
        let dataset = CsvCommentReader::new().read_from(input.as_bytes()).unwrap();

        let vocabulary = Vocabulary::from_pairs(vec![("kill", 5)]).unwrap();
        let labeler = DatasetLabeler::new(LexicalScorer::new(Arc::new(vocabulary)));
        let labeled = labeler.label(&dataset).unwrap();

        let mut output = Vec::new();
        CsvCommentWriter::new()
            .with_bom(false)
            .write_to(&mut output, &labeled)
            .unwrap();

        let mut reader = csv::Reader::from_reader(output.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        let comments: Vec<&str> = rows.iter().map(|r| &r[0]).collect();
        let likes: Vec<&str> = rows.iter().map(|r| &r[1]).collect();

        assert_eq!(comments, cells);
        assert!(likes.iter().all(|l| *l == "0010"));
        assert_eq!(&rows[6][2], "5");
        // A missing-value marker still scores as missing text
        assert_eq!(&rows[5][3], "Safe");
    }

    #[test]
    fn test_training_examples_drops_missing_rows() {
        let input = "Comment,Status Level\nhello,Safe\n,Safe\nbye,\nkill,Suspicious\n";
        let dataset = CsvCommentReader::new().read_from(input.as_bytes()).unwrap();

        let examples = training_examples(&dataset, "Comment", "Status Level").unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[1], ("kill".to_string(), Tier::Suspicious));
    }

    #[test]
    fn test_training_examples_invalid_label() {
        let input = "Comment,Status Level\nhello,Safe\nbye,Risky\n";
        let dataset = CsvCommentReader::new().read_from(input.as_bytes()).unwrap();

        let err = training_examples(&dataset, "Comment", "Status Level").unwrap_err();
        assert!(matches!(err, RiskError::InvalidLabel { ref value, row } if value == "Risky" && row == 2));
    }

    #[test]
    fn test_training_examples_missing_column() {
        let dataset = CommentDataset::from_texts("Comment", &["hello"]);
        assert!(matches!(
            training_examples(&dataset, "Comment", "Status Level"),
            Err(RiskError::MissingColumn(ref c)) if c == "Status Level"
        ));
    }
}
