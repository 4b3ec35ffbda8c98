//! Card/investigator store adapter and its JSON pool loader (spec §6)

mod in_memory;
mod loader;

pub use in_memory::InMemoryCardStore;
pub use loader::{load_card_pool, CardPool, CardPoolLoadError};
