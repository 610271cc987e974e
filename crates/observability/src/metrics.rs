//! Demultiplexer 指标收集模块
//!
//! `metrics` 计数器 (Prometheus 导出) 与内存中的载荷统计。

use std::collections::BTreeMap;

use contracts::EntryKind;
use metrics::{counter, describe_counter, describe_gauge, gauge, Unit};

/// 为 Prometheus 导出登记各指标的说明
pub fn describe_metrics() {
    describe_counter!("stream_demux_records_total", "Records routed, by entry kind");
    describe_counter!(
        "stream_demux_payload_bytes_total",
        Unit::Bytes,
        "Payload bytes routed"
    );
    describe_counter!(
        "stream_demux_sequence_gaps_total",
        "Records whose sequence number differed from the expected one"
    );
    describe_counter!(
        "stream_demux_sequence_regressions_total",
        "Records whose sequence number went backwards"
    );
    describe_counter!("stream_demux_staging_grows_total", "Staging buffer reallocations");
    describe_gauge!(
        "stream_demux_staging_capacity_bytes",
        Unit::Bytes,
        "Staging buffer size after the last grow"
    );
    describe_counter!("stream_demux_passes_total", "Finished passes, by pass and outcome");
    describe_counter!("stream_demux_recoveries_total", "Checkpoint replays started");
    describe_gauge!(
        "stream_demux_last_recovery_stop_sequence",
        "Stop sequence of the latest replay"
    );
}

/// 记录一条已路由的记录
pub fn record_routed(kind: EntryKind, payload_len: usize) {
    counter!("stream_demux_records_total", "kind" => kind.to_string()).increment(1);
    counter!("stream_demux_payload_bytes_total").increment(payload_len as u64);
}

/// 记录序号不连续
pub fn record_sequence_gap() {
    counter!("stream_demux_sequence_gaps_total").increment(1);
}

/// 记录序号回退
pub fn record_sequence_regression() {
    counter!("stream_demux_sequence_regressions_total").increment(1);
}

/// 记录 staging buffer 扩容
pub fn record_staging_grow(new_capacity: usize) {
    counter!("stream_demux_staging_grows_total").increment(1);
    gauge!("stream_demux_staging_capacity_bytes").set(new_capacity as f64);
}

/// 记录一次 pass 结束
///
/// `outcome`: terminated / stopped_at_checkpoint / incomplete / failed
pub fn record_pass(recovery: bool, outcome: &'static str) {
    let pass = if recovery { "recovery" } else { "first" };
    counter!(
        "stream_demux_passes_total",
        "pass" => pass,
        "outcome" => outcome
    )
    .increment(1);
}

/// 记录一次恢复
pub fn record_recovery(stop_sequence: u32) {
    counter!("stream_demux_recoveries_total").increment(1);
    gauge!("stream_demux_last_recovery_stop_sequence").set(f64::from(stop_sequence));
}

/// 载荷大小聚合器
///
/// 按 entry kind 聚合载荷长度，用于 scan 报告。
#[derive(Debug, Clone, Default)]
pub struct PayloadStats {
    /// 各 kind 载荷长度统计
    pub per_kind: BTreeMap<EntryKind, RunningStats>,

    /// 全部载荷长度统计
    pub overall: RunningStats,
}

impl PayloadStats {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, kind: EntryKind, payload_len: usize) {
        let len = payload_len as f64;
        self.per_kind.entry(kind).or_default().push(len);
        self.overall.push(len);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> PayloadSummary {
        PayloadSummary {
            overall: StatsSummary::from(&self.overall),
            per_kind: self
                .per_kind
                .iter()
                .map(|(kind, stats)| (*kind, StatsSummary::from(stats)))
                .collect(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 载荷统计摘要
#[derive(Debug, Clone, Default)]
pub struct PayloadSummary {
    pub overall: StatsSummary,
    pub per_kind: BTreeMap<EntryKind, StatsSummary>,
}

impl std::fmt::Display for PayloadSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Payload Size Summary (bytes) ===")?;
        writeln!(f, "All records: {}", self.overall)?;
        for (kind, stats) in &self.per_kind {
            writeln!(f, "  kind {kind:>3}: {stats}")?;
        }
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
