//! Deck simulation adapters (spec §4.7)

mod monte_carlo;

pub use monte_carlo::MonteCarloSimulator;
