//! Solutions for the 2020 event

pub mod day_07;
pub mod day_08;
pub mod day_10;
pub mod day_11;
pub mod day_16;
pub mod day_17;
pub mod day_18;
pub mod day_19;
pub mod day_20;
pub mod day_21;
pub mod day_22;
pub mod day_24;
