//! Corpus domain entities — read-only retrieval-grounding documents

use serde::{Deserialize, Serialize};

/// An addressable slice of a domain document: rules reference, meta
/// doctrine, or scenario entry. Chunks are read-only during a request
/// (spec §3 Ownership).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusChunk {
    pub source_id: String,
    pub section_path: String,
    pub text: String,
    /// Pre-computed embedding, if the corpus backing has one. A `None`
    /// means this chunk participates only in lexical retrieval.
    pub embedding: Option<Vec<f32>>,
}

impl CorpusChunk {
    pub fn key(&self) -> (&str, &str) {
        (&self.source_id, &self.section_path)
    }
}

/// A chunk plus the combined retrieval score that ranked it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: CorpusChunk,
    pub lexical_score: f32,
    pub semantic_score: f32,
}

impl ScoredChunk {
    pub fn combined_score(&self, lexical_weight: f32, semantic_weight: f32) -> f32 {
        self.lexical_score * lexical_weight + self.semantic_score * semantic_weight
    }
}

/// Filters passed to both retrieval operations (spec §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalFilters {
    pub source_ids: Vec<String>,
    /// When set, chunks whose section path matches this investigator's
    /// rules get a tiebreak boost over generic rules (spec §4.3).
    pub investigator_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_score_blends_lexical_and_semantic() {
        let scored = ScoredChunk {
            chunk: CorpusChunk {
                source_id: "rules".into(),
                section_path: "deckbuilding".into(),
                text: "text".into(),
                embedding: None,
            },
            lexical_score: 1.0,
            semantic_score: 0.0,
        };
        assert_eq!(scored.combined_score(0.5, 0.5), 0.5);
    }

    #[test]
    fn dedup_key_is_source_and_section() {
        let a = CorpusChunk {
            source_id: "rules".into(),
            section_path: "deckbuilding".into(),
            text: "a".into(),
            embedding: None,
        };
        let b = CorpusChunk {
            source_id: "rules".into(),
            section_path: "deckbuilding".into(),
            text: "b".into(),
            embedding: None,
        };
        assert_eq!(a.key(), b.key());
    }
}
