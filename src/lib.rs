//! lorekeeper: the local persisted data layer of a collectible-card-game
//! companion app. Registries for mutators, tags, roster champions and
//! monthly-challenge commitments over a JSON key-value store, plus the
//! spreadsheet import/export bridge and a small HTTP surface for the UI.

pub mod cli;
pub mod data;
pub mod server;
