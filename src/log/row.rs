use serde::{Deserialize, Serialize};

/// A single measurement line from the timing log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingRecord {
    pub ix: i64,
    pub tag: String,
    pub time: f64,
}

impl TimingRecord {
    pub fn new(ix: i64, tag: impl Into<String>, time: f64) -> Self {
        Self {
            ix,
            tag: tag.into(),
            time,
        }
    }
}

/// Records in file order; (ix, tag) pairs are not deduplicated here.
pub type LongTable = Vec<TimingRecord>;
