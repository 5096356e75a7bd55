//! Comment records and datasets.
//!
//! A [`CommentRecord`] keeps its columns in input order so a labeled dataset
//! can be written back with the original column layout.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::dataset::field_value::FieldValue;

/// One named cell of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
    /// Cell text as read from the input file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Field {
    /// The cell as written to output: the source text when the field was read
    /// from a file, otherwise the rendered value.
    pub fn cell_text(&self) -> Cow<'_, str> {
        match &self.source {
            Some(source) => Cow::Borrowed(source.as_str()),
            None => Cow::Owned(self.value.to_string()),
        }
    }
}

/// One row of a comment dataset: fields in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    fields: Vec<Field>,
}

impl CommentRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        CommentRecord { fields: Vec::new() }
    }

    /// Add a field. A field with the same name replaces the earlier value in
    /// place.
    pub fn add_field<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        self.insert(Field {
            name: name.into(),
            value,
            source: None,
        });
    }

    /// Add a field read from a raw input cell, keeping the cell text.
    pub fn add_cell<S: Into<String>>(&mut self, name: S, raw: &str) {
        self.insert(Field {
            name: name.into(),
            value: FieldValue::from_cell(raw),
            source: Some(raw.to_string()),
        });
    }

    fn insert(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Get a field value by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.field(name).map(|f| &f.value)
    }

    /// Get a field as text. Missing fields and non-text values yield `None`.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get_field(name).and_then(FieldValue::as_text)
    }

    /// Output cell text of a field. See [`Field::cell_text`].
    pub fn cell_text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.field(name).map(Field::cell_text)
    }

    fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check if the record has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create a builder for constructing records.
    pub fn builder() -> CommentRecordBuilder {
        CommentRecordBuilder::new()
    }
}

/// A builder for constructing records in a fluent manner.
#[derive(Debug, Default)]
pub struct CommentRecordBuilder {
    record: CommentRecord,
}

impl CommentRecordBuilder {
    /// Create a new record builder.
    pub fn new() -> Self {
        CommentRecordBuilder {
            record: CommentRecord::new(),
        }
    }

    /// Add a text field.
    pub fn add_text<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.record.add_field(name, FieldValue::Text(value.into()));
        self
    }

    /// Add a field with a generic value.
    pub fn add_field<S: Into<String>>(mut self, name: S, value: FieldValue) -> Self {
        self.record.add_field(name, value);
        self
    }

    /// Build the final record.
    pub fn build(self) -> CommentRecord {
        self.record
    }
}

/// An ordered collection of comment records sharing a column layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentDataset {
    columns: Vec<String>,
    records: Vec<CommentRecord>,
}

impl CommentDataset {
    /// Create a dataset with the given columns and no records.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommentDataset {
            columns: columns.into_iter().map(Into::into).collect(),
            records: Vec::new(),
        }
    }

    /// Create a dataset from columns and records.
    pub fn with_records<I, S>(columns: I, records: Vec<CommentRecord>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dataset = Self::new(columns);
        dataset.records = records;
        dataset
    }

    /// Build a single-column dataset from plain texts.
    pub fn from_texts<S, T>(column: S, texts: &[T]) -> Self
    where
        S: Into<String>,
        T: AsRef<str>,
    {
        let column = column.into();
        let records = texts
            .iter()
            .map(|text| {
                CommentRecord::builder()
                    .add_text(column.clone(), text.as_ref())
                    .build()
            })
            .collect();
        Self::with_records([column], records)
    }

    /// Append a record.
    pub fn push(&mut self, record: CommentRecord) {
        self.records.push(record);
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Check if the dataset declares a column.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Records in order.
    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    /// Get a record by position.
    pub fn get(&self, index: usize) -> Option<&CommentRecord> {
        self.records.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_field_order() {
        let record = CommentRecord::builder()
            .add_text("Comment", "hello")
            .add_field("Likes", FieldValue::Integer(3))
            .add_text("Author", "someone")
            .build();

        let names: Vec<&str> = record.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Comment", "Likes", "Author"]);
        assert_eq!(record.get_text("Comment"), Some("hello"));
        assert_eq!(record.get_text("Likes"), None);
        assert_eq!(record.cell_text("Likes").as_deref(), Some("3"));
        assert!(!record.has_field("Missing"));
    }

    #[test]
    fn test_add_field_replaces_in_place() {
        let mut record = CommentRecord::new();
        record.add_field("a", FieldValue::Integer(1));
        record.add_cell("b", "2");
        record.add_field("a", FieldValue::Integer(3));

        assert_eq!(record.len(), 2);
        assert_eq!(record.fields()[0].value, FieldValue::Integer(3));
        assert_eq!(record.fields()[1].name, "b");
    }

    #[test]
    fn test_cell_keeps_source_text() {
        let mut record = CommentRecord::new();
        record.add_cell("Comment", "NaN");
        record.add_cell("Likes", "007");

        assert!(record.get_field("Comment").unwrap().is_null());
        assert_eq!(record.cell_text("Comment").as_deref(), Some("NaN"));
        assert_eq!(record.get_text("Likes"), Some("007"));
        assert_eq!(record.cell_text("Likes").as_deref(), Some("007"));
        assert_eq!(record.cell_text("Missing"), None);
    }

    #[test]
    fn test_dataset_from_texts() {
        let dataset = CommentDataset::from_texts("Comment", &["one", "two"]);
        assert_eq!(dataset.columns(), &["Comment".to_string()]);
        assert_eq!(dataset.len(), 2);
        assert!(dataset.has_column("Comment"));
        assert_eq!(dataset.get(1).and_then(|r| r.get_text("Comment")), Some("two"));
    }
}
