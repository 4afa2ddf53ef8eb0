//! Helpers shared by several puzzles

pub mod bitmap;
pub mod dp_cache;
pub mod elimination;
