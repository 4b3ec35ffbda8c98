//! In-memory corpus retriever: lexical search over token overlap and a
//! naive cosine-similarity semantic search over pre-computed embeddings
//! (spec §6, "physical layout and embedding generation are out of scope
//! for the core" — this adapter is the simplest backing that satisfies
//! the port).

use std::collections::BTreeSet;

use advisor_domain::{CorpusChunk, RetrievalFilters, ScoredChunk};
use advisor_application::ports::{CorpusRetriever, RetrievalError};
use async_trait::async_trait;

pub struct InMemoryCorpusRetriever {
    chunks: Vec<CorpusChunk>,
    top_k: usize,
}

impl InMemoryCorpusRetriever {
    pub fn new(chunks: Vec<CorpusChunk>, top_k: usize) -> Self {
        Self { chunks, top_k }
    }

    fn tokenize(text: &str) -> BTreeSet<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect()
    }

    fn lexical_overlap(query_tokens: &BTreeSet<String>, chunk_tokens: &BTreeSet<String>) -> f32 {
        if query_tokens.is_empty() || chunk_tokens.is_empty() {
            return 0.0;
        }
        let overlap = query_tokens.intersection(chunk_tokens).count() as f32;
        overlap / query_tokens.len() as f32
    }

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return 0.0;
        }
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot / (norm_a * norm_b)
        }
    }

    /// Naive bag-of-words embedding used when a chunk has no precomputed
    /// vector: a fixed-width hashed term frequency vector, so semantic
    /// search still returns something for chunks loaded without
    /// embeddings rather than silently dropping them.
    fn fallback_embedding(text: &str) -> Vec<f32> {
        const DIM: usize = 64;
        let mut v = vec![0.0f32; DIM];
        for token in Self::tokenize(text) {
            let mut hash: u64 = 0;
            for byte in token.bytes() {
                hash = hash.wrapping_mul(31).wrapping_add(byte as u64);
            }
            v[(hash as usize) % DIM] += 1.0;
        }
        v
    }

    fn matches_filters(chunk: &CorpusChunk, filters: &RetrievalFilters) -> bool {
        if !filters.source_ids.is_empty() && !filters.source_ids.contains(&chunk.source_id) {
            return false;
        }
        true
    }

    fn investigator_boost(chunk: &CorpusChunk, filters: &RetrievalFilters) -> f32 {
        match &filters.investigator_code {
            Some(code) if chunk.section_path.to_lowercase().contains(&code.to_lowercase()) => 0.1,
            _ => 0.0,
        }
    }
}

#[async_trait]
impl CorpusRetriever for InMemoryCorpusRetriever {
    async fn lexical_search(
        &self,
        query: &str,
        filters: &RetrievalFilters,
    ) -> Result<Vec<ScoredChunk>, RetrievalError> {
        let query_tokens = Self::tokenize(query);
        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .filter(|c| Self::matches_filters(c, filters))
            .map(|chunk| {
                let chunk_tokens = Self::tokenize(&chunk.text);
                let score = Self::lexical_overlap(&query_tokens, &chunk_tokens)
                    + Self::investigator_boost(chunk, filters);
                ScoredChunk {
                    chunk: chunk.clone(),
                    lexical_score: score,
                    semantic_score: 0.0,
                }
            })
            .filter(|s| s.lexical_score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.lexical_score.partial_cmp(&a.lexical_score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.top_k);
        Ok(scored)
    }

    async fn semantic_search(
        &self,
        query: &str,
        filters: &RetrievalFilters,
    ) -> Result<Vec<ScoredChunk>, RetrievalError> {
        let query_embedding = Self::fallback_embedding(query);
        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .filter(|c| Self::matches_filters(c, filters))
            .map(|chunk| {
                let chunk_embedding = chunk
                    .embedding
                    .clone()
                    .unwrap_or_else(|| Self::fallback_embedding(&chunk.text));
                let score =
                    Self::cosine(&query_embedding, &chunk_embedding) + Self::investigator_boost(chunk, filters);
                ScoredChunk {
                    chunk: chunk.clone(),
                    lexical_score: 0.0,
                    semantic_score: score,
                }
            })
            .filter(|s| s.semantic_score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.semantic_score.partial_cmp(&a.semantic_score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.top_k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(source_id: &str, section_path: &str, text: &str) -> CorpusChunk {
        CorpusChunk {
            source_id: source_id.to_string(),
            section_path: section_path.to_string(),
            text: text.to_string(),
            embedding: None,
        }
    }

    #[tokio::test]
    async fn lexical_search_ranks_by_token_overlap() {
        let retriever = InMemoryCorpusRetriever::new(
            vec![
                chunk("rules", "deckbuilding", "Exceptional cards are limited to one copy."),
                chunk("rules", "combat", "Combat tests compare skill value to enemy fight value."),
            ],
            8,
        );
        let results = retriever
            .lexical_search("exceptional copy limit", &RetrievalFilters::default())
            .await
            .unwrap();
        assert_eq!(results[0].chunk.section_path, "deckbuilding");
    }

    #[tokio::test]
    async fn source_id_filter_excludes_other_sources() {
        let retriever = InMemoryCorpusRetriever::new(
            vec![chunk("meta", "archetypes", "exceptional big gun archetype")],
            8,
        );
        let filters = RetrievalFilters {
            source_ids: vec!["rules".to_string()],
            investigator_code: None,
        };
        let results = retriever.lexical_search("exceptional", &filters).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn semantic_search_returns_something_for_chunks_without_embeddings() {
        let retriever = InMemoryCorpusRetriever::new(
            vec![chunk("rules", "deckbuilding", "Exceptional cards are limited to one copy.")],
            8,
        );
        let results = retriever
            .semantic_search("exceptional copy limit", &RetrievalFilters::default())
            .await
            .unwrap();
        assert!(!results.is_empty());
    }
}
