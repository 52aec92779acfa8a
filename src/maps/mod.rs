//! Built-in maps.

mod sample;

pub use sample::{sample_board, SAMPLE_PRISON};
