//! FORMBOOK — Season Simulation & Ranking Engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod standings;
pub mod ratings;
pub mod engine;
pub mod data;
pub mod storage;
pub mod strategy;
