//! Monte Carlo simulator defaults from TOML (`[simulator]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSimulatorConfig {
    pub default_trials: u32,
    pub default_turns: u32,
    pub default_mulligan_strategy: String,
}

impl Default for FileSimulatorConfig {
    fn default() -> Self {
        Self {
            default_trials: 1000,
            default_turns: 5,
            default_mulligan_strategy: "aggressive".to_string(),
        }
    }
}

impl FileSimulatorConfig {
    pub fn parse_mulligan_strategy(&self) -> advisor_domain::MulliganStrategy {
        self.default_mulligan_strategy.parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_strategy_falls_back_to_default() {
        let config = FileSimulatorConfig {
            default_mulligan_strategy: "bogus".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.parse_mulligan_strategy(),
            advisor_domain::MulliganStrategy::default()
        );
    }
}
