//! Corpus retrieval adapter (spec §6)

mod in_memory;

pub use in_memory::InMemoryCorpusRetriever;
