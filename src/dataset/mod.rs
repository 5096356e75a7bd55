//! Comment datasets: records, labeling, splitting and CSV input/output.

pub mod csv;
pub mod field_value;
pub mod labeler;
pub mod record;
pub mod split;

pub use self::csv::{CsvCommentReader, CsvCommentWriter, training_examples};
pub use field_value::FieldValue;
pub use labeler::{
    DEFAULT_TEXT_COLUMN, DatasetLabeler, KEYWORDS_COLUMN, LabeledDataset, SCORE_COLUMN,
    STATUS_COLUMN,
};
pub use record::{CommentDataset, CommentRecord, CommentRecordBuilder, Field};
pub use split::{DEFAULT_SEED, DEFAULT_TEST_SIZE, train_test_split};
