//! The persisted data layer: storage adapter, entity registries, the
//! monthly-challenge commit tracker, and the workbook import/export bridge.

pub mod commits;
pub mod companion;
pub mod datastore;
pub mod export;
pub mod mutator;
pub mod roster;
pub mod store;
pub mod tag;
pub mod validate;
pub mod workbook;
