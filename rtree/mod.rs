pub mod algorithms;
pub mod node;
pub mod rectangle;
#[allow(clippy::module_inception)]
pub mod rtree;

// 重新导出主要类型
pub use algorithms::concurrent::ConcurrentRTree;
pub use algorithms::debug::{InvariantViolation, TreeStats};
pub use algorithms::knn::Neighbor;
pub use node::{Item, Node, NodeKind};
pub use rectangle::{BoundingBox, Point};
pub use rtree::{RTree, DEFAULT_MAX_ITEMS, MIN_CAPACITY};
