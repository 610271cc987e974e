//! # Demux Engine
//!
//! 录制流解复用引擎。
//!
//! 负责：
//! - 逐条解码记录并按 entry kind 路由到输出目标
//! - 序号连续性检查 (缺失/回退只告警，不中止)
//! - 终止标记与损坏检测
//! - 流不完整时回放至最后一个 checkpoint
//!
//! ## 使用示例
//!
//! ```ignore
//! use demux_engine::RecoveryDriver;
//! use ingestion::FileSource;
//!
//! let layout = contracts::StreamLayout::pipeline();
//! let table = layout.to_route_table()?;
//! let mut source = FileSource::new("stream.bin");
//!
//! let report = RecoveryDriver::new(&table, &layout.stream, "out").run(&mut source)?;
//! println!("{:?}", report.outcome);
//! ```

mod engine;
mod recovery;
mod report;
mod scan;
mod state;

// Re-exports
pub use engine::Demultiplexer;
pub use recovery::RecoveryDriver;
pub use report::{PassEnd, PassReport, RunOutcome, RunReport};
pub use scan::{scan, ScanReport, ScanVerdict};
