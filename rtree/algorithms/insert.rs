use super::super::node::{Item, Node, NodeKind};
use super::super::rectangle::BoundingBox;
use super::super::rtree::RTree;
use super::split::quadratic_split;
use crate::error::{IndexError, IndexResult};
use tracing::{debug, warn};

/// 插入操作相关算法
impl<T> RTree<T> {
    /// 插入新的数据条目 - 遵循论文Algorithm Insert
    ///
    /// id 不做唯一性检查，相同 id 的条目可以共存。
    ///
    /// # 返回值
    /// - `Ok(())` - 插入成功，所有祖先的MBR都包含新条目，没有叶子超过 `max_items`
    /// - `Err(IndexError::NonFiniteCoordinate)` - 坐标包含 NaN 或 ±Inf，树保持不变
    pub fn insert(&mut self, id: impl Into<String>, x: f64, y: f64, payload: T) -> IndexResult<()> {
        let id = id.into();
        if !x.is_finite() || !y.is_finite() {
            warn!(%id, x, y, "rejecting item with non-finite coordinate");
            return Err(IndexError::NonFiniteCoordinate { id, x, y });
        }

        // I1: 构造点条目
        let item = Item::new(id, x, y, payload);
        let max_items = self.max_items();
        let min_items = self.min_items();

        // I2-I3: 沿选择路径下降并插入，分裂在递归返回时向上传播
        if let Some(sibling) = insert_recursive(self.root_mut(), item, max_items, min_items) {
            // I4: 根节点分裂 - 用两个分裂结果创建新的根节点，树长高一层
            let old_root = std::mem::take(self.root_mut());
            *self.root_mut() = Node::internal(vec![old_root, sibling]);
            debug!(height = self.height(), "root split, tree grew one level");
        }

        self.size += 1;
        Ok(())
    }
}

/// 递归插入
///
/// 条目落入 ChooseLeaf 选出的叶子；任何溢出的节点都会被二次分裂，
/// 新的兄弟节点返回给调用方，由父节点接收并再次检查溢出。
/// 返回前总是重新计算当前节点的MBR（AdjustTree）。
fn insert_recursive<T>(
    node: &mut Node<T>,
    item: Item<T>,
    max_items: usize,
    min_items: usize,
) -> Option<Node<T>> {
    let sibling = match &mut node.kind {
        NodeKind::Leaf(items) => {
            items.push(item);
            if items.len() > max_items {
                let (group1, group2) = quadratic_split(std::mem::take(items), min_items);
                debug!(kept = group1.len(), moved = group2.len(), "leaf split");
                *items = group1;
                Some(Node::leaf(group2))
            } else {
                None
            }
        }
        NodeKind::Internal(children) => {
            // CL3: 选择扩大面积最小的子树
            let best = choose_subtree(children, &item.bbox);
            match insert_recursive(&mut children[best], item, max_items, min_items) {
                Some(split_off) => {
                    children.push(split_off);
                    if children.len() > max_items {
                        let (group1, group2) =
                            quadratic_split(std::mem::take(children), min_items);
                        debug!(kept = group1.len(), moved = group2.len(), "internal node split");
                        *children = group1;
                        Some(Node::internal(group2))
                    } else {
                        None
                    }
                }
                None => None,
            }
        }
    };

    node.update_bbox();
    sibling
}

/// 选择子树 - 计算扩大面积最小的子节点
///
/// 扩大面积相同时依次比较周长扩大量和当前面积，仍相同则取先遍历到的子节点。
pub(crate) fn choose_subtree<T>(children: &[Node<T>], rect: &BoundingBox) -> usize {
    let mut best_index = 0;
    let mut best_cost = (f64::INFINITY, f64::INFINITY, f64::INFINITY);

    for (i, child) in children.iter().enumerate() {
        let cost = (
            child.bbox.enlargement(rect),
            child.bbox.margin_enlargement(rect),
            child.bbox.area(),
        );
        if cost < best_cost {
            best_cost = cost;
            best_index = i;
        }
    }

    best_index
}
