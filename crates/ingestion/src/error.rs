//! Ingestion 错误类型

use contracts::DemuxError;
use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 4 字节字段不完整
    #[error("truncated frame at offset {offset}: {field} has {available} of 4 bytes")]
    TruncatedFrame {
        /// 字节偏移
        offset: u64,
        /// 字段名
        field: &'static str,
        /// 可用字节数
        available: usize,
    },

    /// 载荷不完整
    #[error("truncated payload at offset {offset}: {available} of {expected} bytes")]
    TruncatedPayload {
        /// 字节偏移
        offset: u64,
        /// 长度字段声明的字节数
        expected: u32,
        /// 可用字节数
        available: usize,
    },

    /// 底层读取失败
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IngestionError> for DemuxError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::TruncatedFrame {
                offset,
                field,
                available,
            } => DemuxError::TruncatedFrame {
                offset,
                field,
                available,
            },
            IngestionError::TruncatedPayload {
                offset,
                expected,
                available,
            } => DemuxError::TruncatedPayload {
                offset,
                expected,
                available,
            },
            IngestionError::Io(e) => DemuxError::Io(e),
        }
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
