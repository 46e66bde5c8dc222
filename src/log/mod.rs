//! Loading the benchmark timing log (perf.csv).

pub mod parse;
pub mod row;

pub use parse::{parse_timing_file, parse_timing_reader};
pub use row::{LongTable, TimingRecord};
