//! Advent of Code 2020 puzzle solutions with automatic registration
//!
//! Each day lives in its own module under [`year_2020`] and registers itself
//! through `#[derive(AutoRegisterSolver)]`; linking this crate is enough for
//! `RegistryBuilder::register_all_plugins` to see every day.

pub mod utils;
pub mod year_2020;
