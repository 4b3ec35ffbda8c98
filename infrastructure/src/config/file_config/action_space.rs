//! Candidate-search scoring weights from TOML (`[action_space]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileActionSpaceConfig {
    pub top_k: usize,
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
    pub delta: f32,
}

impl Default for FileActionSpaceConfig {
    fn default() -> Self {
        Self {
            top_k: 25,
            alpha: 0.45,
            beta: 0.20,
            gamma: 0.20,
            delta: 0.15,
        }
    }
}
