use thiserror::Error;

/// 空间索引错误类型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndexError {
    /// 坐标包含 NaN 或 ±Inf，无法放入树中
    #[error("Item '{id}' has a non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { id: String, x: f64, y: f64 },

    #[error("Node capacity must be at least 4, got {max_items}")]
    InvalidCapacity { max_items: usize },

    #[error("Lock was poisoned by a panicked thread")]
    LockPoisoned,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type IndexResult<T> = std::result::Result<T, IndexError>;
