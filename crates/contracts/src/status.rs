//! StreamStatus - Stream Summary Writer payload
//!
//! Two booleans, four possible bodies.

use serde::{Deserialize, Serialize};

/// Status artifact describing one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStatus {
    /// Terminal marker observed (or forced at the recovery stop point)
    #[serde(rename = "has_EOF")]
    pub has_eof: bool,

    /// A sequence-number discontinuity was seen at least once
    #[serde(rename = "miss_seq_num")]
    pub miss_seq_num: bool,
}

impl StreamStatus {
    pub fn new(has_eof: bool, miss_seq_num: bool) -> Self {
        Self {
            has_eof,
            miss_seq_num,
        }
    }

    /// Literal document body
    pub fn body(&self) -> &'static str {
        match (self.has_eof, self.miss_seq_num) {
            (true, true) => r#"{"has_EOF":true,"miss_seq_num":true}"#,
            (true, false) => r#"{"has_EOF":true,"miss_seq_num":false}"#,
            (false, true) => r#"{"has_EOF":false,"miss_seq_num":true}"#,
            (false, false) => r#"{"has_EOF":false,"miss_seq_num":false}"#,
        }
    }
}
