//! # Dispatcher
//!
//! 输出分发模块。
//!
//! 负责：
//! - 按 entry kind 将载荷写入对应输出目标
//! - append / overwrite / discard 三种写入方式
//! - 恢复前重置所有输出文件
//! - 写入 stream 状态文件

pub mod error;
pub mod handle;
pub mod metrics;
pub mod outputs;
pub mod sinks;
pub mod status;

pub use contracts::{OutputSink, StreamStatus};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use outputs::{reset_outputs, OutputSinks};
pub use sinks::{AppendSink, DiscardSink, OverwriteSink};
pub use status::write_status;
