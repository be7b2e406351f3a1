//! Term-frequency bundle: vocabulary vectorizer and multinomial Naive Bayes.
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{
    InferenceError, SparseClassifier, SparseVector, TextVectorizer, ensure_finite, l2_normalize,
};

/// Words of two or more characters.
static DEFAULT_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("default token pattern"));

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct TermVectorizerSpec {
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    idf: Vec<f32>,
    #[serde(default = "default_true")]
    lowercase: bool,
    #[serde(default)]
    token_pattern: Option<String>,
}

/// Maps text onto vocabulary columns.
///
/// Produces raw counts, or L2-normalized tf-idf weights when `idf` is present.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "TermVectorizerSpec")]
pub struct TermVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    lowercase: bool,
    token_pattern: Regex,
}

impl TryFrom<TermVectorizerSpec> for TermVectorizer {
    type Error = String;

    fn try_from(spec: TermVectorizerSpec) -> Result<Self, Self::Error> {
        let token_pattern = match spec.token_pattern {
            Some(pattern) => {
                Regex::new(&pattern).map_err(|e| format!("invalid token_pattern: {e}"))?
            }
            None => DEFAULT_TOKEN_PATTERN.clone(),
        };
        Ok(Self {
            vocabulary: spec.vocabulary,
            idf: spec.idf,
            lowercase: spec.lowercase,
            token_pattern,
        })
    }
}

impl TermVectorizer {
    #[must_use]
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f32>) -> Self {
        Self {
            vocabulary,
            idf,
            lowercase: true,
            token_pattern: DEFAULT_TOKEN_PATTERN.clone(),
        }
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    fn validate(&self) -> Result<()> {
        let n = self.n_features();
        anyhow::ensure!(n > 0, "vectorizer vocabulary is empty");
        for (term, &column) in &self.vocabulary {
            anyhow::ensure!(
                column < n,
                "vocabulary column {column} for {term:?} exceeds {n} features"
            );
        }
        if !self.idf.is_empty() {
            anyhow::ensure!(
                self.idf.len() == n,
                "idf length {} does not match vocabulary size {n}",
                self.idf.len()
            );
        }
        Ok(())
    }
}

impl TextVectorizer for TermVectorizer {
    fn transform(&self, text: &str) -> Result<SparseVector, InferenceError> {
        let lowered;
        let haystack = if self.lowercase {
            lowered = text.to_lowercase();
            lowered.as_str()
        } else {
            text
        };

        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        for token in self.token_pattern.find_iter(haystack) {
            if let Some(&column) = self.vocabulary.get(token.as_str()) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        if self.idf.is_empty() {
            return Ok(counts.into_iter().collect());
        }

        let mut columns = Vec::with_capacity(counts.len());
        let mut weights = Vec::with_capacity(counts.len());
        for (column, tf) in counts {
            let idf = self.idf.get(column).ok_or(InferenceError::IndexOutOfRange {
                index: column,
                len: self.idf.len(),
            })?;
            columns.push(column);
            weights.push(tf * idf);
        }
        l2_normalize(&mut weights);
        Ok(columns.into_iter().zip(weights).collect())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultinomialNaiveBayes {
    class_log_prior: Vec<f32>,
    feature_log_prob: Vec<Vec<f32>>,
}

impl MultinomialNaiveBayes {
    #[must_use]
    pub fn new(class_log_prior: Vec<f32>, feature_log_prob: Vec<Vec<f32>>) -> Self {
        Self {
            class_log_prior,
            feature_log_prob,
        }
    }

    fn n_features(&self) -> usize {
        self.feature_log_prob.first().map_or(0, Vec::len)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.class_log_prior.len() == 2,
            "expected 2 class priors, got {}",
            self.class_log_prior.len()
        );
        anyhow::ensure!(
            self.feature_log_prob.len() == 2,
            "expected 2 feature_log_prob rows, got {}",
            self.feature_log_prob.len()
        );
        anyhow::ensure!(
            self.feature_log_prob[0].len() == self.feature_log_prob[1].len(),
            "feature_log_prob rows differ in length"
        );
        Ok(())
    }

    fn joint_log_likelihood(
        &self,
        class: usize,
        features: &[(usize, f32)],
    ) -> Result<f64, InferenceError> {
        let row = &self.feature_log_prob[class];
        let mut score = f64::from(self.class_log_prior[class]);
        for &(column, weight) in features {
            let log_prob = row.get(column).ok_or(InferenceError::IndexOutOfRange {
                index: column,
                len: row.len(),
            })?;
            score += f64::from(weight) * f64::from(*log_prob);
        }
        ensure_finite(score)
    }
}

impl SparseClassifier for MultinomialNaiveBayes {
    fn predict_proba(&self, features: &[(usize, f32)]) -> Result<f64, InferenceError> {
        let ham = self.joint_log_likelihood(0, features)?;
        let spam = self.joint_log_likelihood(1, features)?;
        let max = ham.max(spam);
        let log_norm = max + ((ham - max).exp() + (spam - max).exp()).ln();
        Ok((spam - log_norm).exp())
    }
}

/// The serialized lexical bundle.
#[derive(Debug, Deserialize)]
pub struct LexicalBundle {
    pub vectorizer: TermVectorizer,
    pub nb_clf: MultinomialNaiveBayes,
}

impl LexicalBundle {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read lexical bundle {:?}", path.as_ref()))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let bundle: Self =
            serde_json::from_str(raw).context("failed to parse lexical bundle json")?;
        bundle.vectorizer.validate()?;
        bundle.nb_clf.validate()?;
        anyhow::ensure!(
            bundle.nb_clf.n_features() == bundle.vectorizer.n_features(),
            "classifier expects {} features but vectorizer produces {}",
            bundle.nb_clf.n_features(),
            bundle.vectorizer.n_features()
        );
        Ok(bundle)
    }
}
