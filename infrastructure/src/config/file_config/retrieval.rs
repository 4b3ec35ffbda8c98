//! Corpus retrieval blend weights from TOML (`[retrieval]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    pub top_k: usize,
    pub lexical_weight: f32,
    pub semantic_weight: f32,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 8,
            lexical_weight: 0.5,
            semantic_weight: 0.5,
        }
    }
}
