use super::super::node::{Item, Node, NodeKind};
use super::super::rectangle::{BoundingBox, Point};
use super::super::rtree::RTree;
use tracing::warn;

/// 搜索操作相关算法
impl<T> RTree<T> {
    /// 范围查询：返回点落在查询矩形内（含边界）的所有条目
    ///
    /// 结果无序，每个条目只出现一次。查询矩形含非有限坐标时返回空结果。
    pub fn search(&self, query: &BoundingBox) -> Vec<&Item<T>> {
        let mut results = Vec::new();
        if !query.is_finite() {
            warn!(%query, "ignoring range query with non-finite bounds");
            return results;
        }

        search_recursive(self.root_ref(), query, &mut results);
        results
    }

    /// 半径查询：返回与 `(x, y)` 欧氏距离不超过 `radius` 的所有条目
    ///
    /// 先用外接正方形做范围查询，再对候选条目做精确距离过滤。
    /// `radius <= 0` 时只返回与查询点重合的条目。
    pub fn find_within_radius(&self, x: f64, y: f64, radius: f64) -> Vec<&Item<T>> {
        let center = Point::new(x, y);
        if !center.is_finite() || !radius.is_finite() {
            warn!(x, y, radius, "ignoring radius query with non-finite input");
            return Vec::new();
        }

        let radius = radius.max(0.0);
        self.search(&BoundingBox::around(&center, radius))
            .into_iter()
            .filter(|item| center.distance(&item.location) <= radius)
            .collect()
    }
}

/// 递归搜索 - 遵循论文Search算法
fn search_recursive<'a, T>(node: &'a Node<T>, query: &BoundingBox, results: &mut Vec<&'a Item<T>>) {
    // S1: 节点MBR与查询矩形不相交时剪掉整棵子树
    if !node.bbox.intersects(query) {
        return;
    }

    match &node.kind {
        // S2: 叶子节点，收集相交的数据条目
        NodeKind::Leaf(items) => {
            results.extend(items.iter().filter(|item| item.bbox.intersects(query)));
        }
        NodeKind::Internal(children) => {
            for child in children {
                search_recursive(child, query, results);
            }
        }
    }
}
