//! Season replay engine.
//!
//! `replay` turns one season's week-by-week history into ratings and
//! standings; `processor` drives a full pass per configured tournament and
//! persists the resulting snapshots.

pub mod processor;
pub mod replay;
