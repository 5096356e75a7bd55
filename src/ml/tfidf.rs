//! TF-IDF vectorizer for text feature extraction.
//!
//! Terms come from an [`Analyzer`]; the default is the
//! [`StandardAnalyzer`]: tokens of two or more word characters, lowercased,
//! English stop words removed. Weights use raw term counts, smoothed inverse
//! document frequency `ln((1 + n) / (1 + df)) + 1`, and each row is
//! L2-normalized.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::error::{Result, RiskError};

/// A sparse feature vector with sorted indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dimension: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// An all-zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Self {
        SparseVector {
            dimension,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build a vector from `(index, value)` pairs. Pairs are sorted by index;
    /// zero values are dropped.
    pub fn from_pairs(dimension: usize, mut pairs: Vec<(usize, f64)>) -> Result<Self> {
        pairs.sort_by_key(|(i, _)| *i);
        let mut indices = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());

        for (index, value) in pairs {
            if index >= dimension {
                return Err(RiskError::DimensionMismatch {
                    expected: dimension,
                    actual: index + 1,
                });
            }
            if indices.last() == Some(&index) {
                return Err(RiskError::invalid_operation(format!(
                    "duplicate index {index} in sparse vector"
                )));
            }
            if value != 0.0 {
                indices.push(index);
                values.push(value);
            }
        }

        Ok(SparseVector {
            dimension,
            indices,
            values,
        })
    }

    /// Number of dimensions.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored non-zero entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Check if every component is zero.
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// Value at `index`, zero when not stored.
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Iterate over stored `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product with a dense vector of the same dimension.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.iter().map(|(i, v)| v * dense[i]).sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Expand into a dense vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dimension];
        for (i, v) in self.iter() {
            dense[i] = v;
        }
        dense
    }
}

#[derive(Debug, Clone)]
struct FittedVocabulary {
    /// Term -> column index. Indices follow lexicographic term order.
    terms: HashMap<String, usize>,
    /// Inverse document frequency per column.
    idf: Vec<f64>,
    /// Number of documents seen during fitting.
    n_documents: usize,
}

/// TF-IDF vectorizer for text feature extraction.
///
/// A vectorizer is fitted exactly once; its vocabulary and IDF weights are
/// frozen afterwards.
///
/// # Examples
///
/// ```
/// use comment_risk::ml::tfidf::TfIdfVectorizer;
///
/// let mut vectorizer = TfIdfVectorizer::english().unwrap();
/// vectorizer.fit(&["add me on discord", "nice video"]).unwrap();
///
/// let vector = vectorizer.transform("discord discord").unwrap();
/// assert_eq!(vector.dimension(), vectorizer.vocabulary_size());
/// assert!((vector.norm() - 1.0).abs() < 1e-9);
/// ```
pub struct TfIdfVectorizer {
    analyzer: Arc<dyn Analyzer>,
    fitted: Option<FittedVocabulary>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary_size())
            .field(
                "n_documents",
                &self.fitted.as_ref().map(|v| v.n_documents).unwrap_or(0),
            )
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create a new TF-IDF vectorizer with the specified analyzer.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        TfIdfVectorizer {
            analyzer,
            fitted: None,
        }
    }

    /// Create a vectorizer using the [`StandardAnalyzer`] with English stop
    /// words.
    pub fn english() -> Result<Self> {
        Ok(Self::new(Arc::new(StandardAnalyzer::new()?)))
    }

    /// Learn the vocabulary and IDF weights from training documents.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        if self.fitted.is_some() {
            return Err(RiskError::invalid_operation(
                "vectorizer is already fitted",
            ));
        }
        if documents.is_empty() {
            return Err(RiskError::empty_dataset(
                "cannot fit vectorizer on zero documents",
            ));
        }

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique_terms: HashSet<String> =
                self.analyzer.analyze(doc.as_ref()).into_iter().collect();
            for term in unique_terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(RiskError::empty_dataset(
                "empty vocabulary; documents contain only stop words",
            ));
        }

        let n_documents = documents.len();
        let mut terms = HashMap::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());

        // BTreeMap iteration gives lexicographic column order
        for (idx, (term, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n_documents as f64) / (1.0 + df as f64)).ln() + 1.0);
            terms.insert(term, idx);
        }

        log::debug!(
            "Fitted TF-IDF vocabulary of {} terms on {} documents",
            terms.len(),
            n_documents
        );

        self.fitted = Some(FittedVocabulary {
            terms,
            idf,
            n_documents,
        });

        Ok(())
    }

    /// Transform a document into an L2-normalized TF-IDF vector.
    ///
    /// Terms outside the fitted vocabulary are ignored; a document with no
    /// known terms yields the zero vector.
    pub fn transform(&self, document: &str) -> Result<SparseVector> {
        let fitted = self.fitted()?;
        let dimension = fitted.idf.len();

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyzer.analyze(document) {
            if let Some(&idx) = fitted.terms.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut pairs: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * fitted.idf[idx]))
            .collect();

        let norm = pairs.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut pairs {
                *w /= norm;
            }
        }

        SparseVector::from_pairs(dimension, pairs)
    }

    /// Transform many documents.
    pub fn transform_batch<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<SparseVector>> {
        documents
            .iter()
            .map(|doc| self.transform(doc.as_ref()))
            .collect()
    }

    /// Fit on the documents, then transform them.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<Vec<SparseVector>> {
        self.fit(documents)?;
        self.transform_batch(documents)
    }

    /// Check whether the vectorizer has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Get the size of the vocabulary. Zero before fitting.
    pub fn vocabulary_size(&self) -> usize {
        self.fitted.as_ref().map(|v| v.idf.len()).unwrap_or(0)
    }

    /// Column index of a term.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.fitted.as_ref().and_then(|v| v.terms.get(term).copied())
    }

    /// IDF weight of a term.
    pub fn idf(&self, term: &str) -> Option<f64> {
        let fitted = self.fitted.as_ref()?;
        fitted.terms.get(term).map(|&idx| fitted.idf[idx])
    }

    fn fitted(&self) -> Result<&FittedVocabulary> {
        self.fitted
            .as_ref()
            .ok_or_else(|| RiskError::not_fitted("TF-IDF vectorizer has not been fitted"))
    }
}
