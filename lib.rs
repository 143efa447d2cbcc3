pub mod client;
pub mod config;
pub mod error;
pub mod index;
pub mod rtree;

use std::error::Error;

// 重新导出主要的公共接口
pub use rtree::{BoundingBox, ConcurrentRTree, Item, Neighbor, Point, RTree, TreeStats};
pub use index::{EquipmentEntry, IndexStatistics, RoomEntry, SpatialIndex};
pub use error::{IndexError, IndexResult};
pub use crate::config::IndexConfig;

// 重新导出常用类型，便于二进制文件使用
pub use client::{CliArgs, OutputFormatter, Snapshot};

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;
