//! In-memory inverted index over weighted document fields
//!
//! The index is two nested map families: `inv[field][term][doc_id]`
//! counts term occurrences per document field, and `tf[field][term]`
//! keeps the total count across all documents so scoring can divide
//! by it without a second pass. The field set is seeded once at
//! construction and never changes.
//!
//! The index itself is not synchronized; the owning service keeps it
//! behind a readers-writer lock together with the document map.

use std::collections::HashMap;

use crate::note::{Field, NoteDocument};
use crate::text::{analyze, Term};

/// A matching document with its raw (unsorted) score
#[derive(Debug, Clone)]
pub struct Hit {
    /// Document id
    pub id: String,
    /// Sum over fields and query terms of `count / total * weight`
    pub score: f64,
    /// The analyzed query terms that produced the score
    pub terms: Vec<Term>,
    /// Tag list the caller extracted from the query, echoed per hit
    pub tags: Vec<String>,
}

/// Inverted index mapping field terms to per-document counts
#[derive(Debug)]
pub struct InvertedIndex {
    /// Field -> term -> document id -> count in that document field
    inv: HashMap<Field, HashMap<String, HashMap<String, usize>>>,
    /// Field -> term -> total count across all documents
    tf: HashMap<Field, HashMap<String, usize>>,
}

impl InvertedIndex {
    /// Create an empty index with the full field schema seeded
    pub fn new() -> Self {
        let mut inv = HashMap::new();
        let mut tf = HashMap::new();
        for field in Field::ALL {
            inv.insert(field, HashMap::new());
            tf.insert(field, HashMap::new());
        }
        InvertedIndex { inv, tf }
    }

    fn bump(&mut self, field: Field, term: &str, doc_id: &str, count: usize) {
        *self
            .inv
            .entry(field)
            .or_default()
            .entry(term.to_string())
            .or_default()
            .entry(doc_id.to_string())
            .or_default() += count;
        *self
            .tf
            .entry(field)
            .or_default()
            .entry(term.to_string())
            .or_default() += count;
    }

    /// Add a document to the index.
    ///
    /// Every analyzed term of each field's content is counted, plus
    /// the field's verbatim extra terms. Adding the same document
    /// twice double-counts; delete before re-adding.
    pub fn add(&mut self, doc: &NoteDocument) {
        for field in Field::ALL {
            let view = doc.field(field);
            for term in analyze(&view.content) {
                self.bump(field, &term.text, doc.id(), 1);
            }
            for term in &view.extra_terms {
                self.bump(field, term, doc.id(), 1);
            }
        }
    }

    /// Remove a document from every posting list, keeping the total
    /// frequencies in step.
    pub fn delete(&mut self, doc_id: &str) {
        for (field, terms) in self.inv.iter_mut() {
            let totals = self.tf.entry(*field).or_default();
            for (term, postings) in terms.iter_mut() {
                if let Some(count) = postings.remove(doc_id) {
                    if let Some(total) = totals.get_mut(term) {
                        *total = total.saturating_sub(count);
                    }
                }
            }
        }
    }

    /// Query the index.
    ///
    /// Returns one hit per document whose score is strictly positive;
    /// ordering is left to the caller. `tags` is carried through to
    /// the hits unchanged.
    pub fn search(&self, query: &str, tags: &[String]) -> Vec<Hit> {
        let query_terms: Vec<Term> = analyze(query).collect();

        let mut scores: HashMap<String, f64> = HashMap::new();
        for field in Field::ALL {
            let (Some(terms), Some(totals)) = (self.inv.get(&field), self.tf.get(&field)) else {
                continue;
            };
            for term in &query_terms {
                let Some(postings) = terms.get(&term.text) else {
                    continue;
                };
                let total = totals.get(&term.text).copied().unwrap_or(0);
                if total == 0 {
                    continue;
                }
                for (doc_id, count) in postings {
                    *scores.entry(doc_id.clone()).or_insert(0.0) +=
                        *count as f64 / total as f64 * field.weight();
                }
            }
        }

        scores
            .into_iter()
            .map(|(id, score)| Hit {
                id,
                score,
                terms: query_terms.clone(),
                tags: tags.to_vec(),
            })
            .collect()
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        for field in Field::ALL {
            let terms = &self.inv[&field];
            let totals = &self.tf[&field];
            for (term, postings) in terms {
                let sum: usize = postings.values().sum();
                assert_eq!(
                    totals.get(term).copied().unwrap_or(0),
                    sum,
                    "tf out of step for {field:?}/{term}"
                );
            }
        }
    }
}
