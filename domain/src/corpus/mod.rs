//! Corpus domain model

pub mod entities;

pub use entities::{CorpusChunk, RetrievalFilters, ScoredChunk};
