use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const MAX_VOCABULARY: usize = 1000;
const MIN_DIMENSIONS: usize = 100;

/// TF-IDF embedder fitted on the document corpus.
///
/// Queries must be embedded with the same fitted instance as the corpus so
/// the vector dimensions line up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingService {
    vocabulary: HashMap<String, usize>,
    idf_scores: HashMap<String, f32>,
}

impl EmbeddingService {
    pub fn fit<S: AsRef<str>>(texts: &[S]) -> Self {
        log::info!("Fitting TF-IDF vocabulary on {} documents...", texts.len());

        let mut word_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_frequencies: HashMap<String, usize> = HashMap::new();
        let total_docs = texts.len();

        for text in texts {
            let words = tokenize(text.as_ref());
            let unique_words: HashSet<&String> = words.iter().collect();

            for word in &words {
                *word_counts.entry(word.clone()).or_insert(0) += 1;
            }
            for word in unique_words {
                *doc_frequencies.entry(word.clone()).or_insert(0) += 1;
            }
        }

        // Smoothed so a term present everywhere still carries some weight.
        let idf_scores: HashMap<String, f32> = doc_frequencies
            .iter()
            .map(|(word, df)| {
                let idf = ((1 + total_docs) as f32 / (1 + *df) as f32).ln() + 1.0;
                (word.clone(), idf)
            })
            .collect();

        // Ties broken alphabetically so refits give the same layout.
        let mut word_freq_pairs: Vec<_> = word_counts.into_iter().collect();
        word_freq_pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let vocabulary: HashMap<String, usize> = word_freq_pairs
            .into_iter()
            .take(MAX_VOCABULARY)
            .enumerate()
            .map(|(idx, (word, _))| (word, idx))
            .collect();

        log::info!("Vocabulary size: {}", vocabulary.len());

        Self {
            vocabulary,
            idf_scores,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.vocabulary.len().max(MIN_DIMENSIONS)
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimensions()];
        let words = tokenize(text);
        if words.is_empty() {
            return embedding;
        }
        let total_words = words.len() as f32;

        for (word, count) in count_words(&words) {
            if let Some(&idx) = self.vocabulary.get(&word) {
                let tf = count as f32 / total_words;
                let idf = self.idf_scores.get(&word).copied().unwrap_or(1.0);
                embedding[idx] = tf * idf;
            }
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in embedding.iter_mut() {
                *value /= norm;
            }
        }

        embedding
    }

    pub fn embed_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Vec<f32>> {
        texts.par_iter().map(|t| self.embed(t.as_ref())).collect()
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let min_len = a.len().min(b.len());

    let dot_product: f32 = a[..min_len]
        .iter()
        .zip(b[..min_len].iter())
        .map(|(x, y)| x * y)
        .sum();

    let norm_a: f32 = a[..min_len].iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b[..min_len].iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|word| word.chars().count() > 2)
        .collect()
}

fn count_words(words: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in words {
        *counts.entry(word.clone()).or_insert(0) += 1;
    }
    counts
}
