//! Item store
//!
//! JSON-file-backed record store with an explicit dirty flag. Queries and
//! mutations go through the mapping-like contract (`find`/`get`/`insert`/
//! `update`); persistence is an explicit `save` so batch operations commit
//! once.

mod json_store;

pub use json_store::JsonStore;
