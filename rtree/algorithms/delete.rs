use super::super::node::{Item, Node, NodeKind};
use super::super::rtree::RTree;
use tracing::debug;

/// R-tree删除算法实现
impl<T> RTree<T> {
    /// 删除第一个 id 匹配的数据条目
    ///
    /// id 不携带空间信息，所以查找时遍历所有子树而不做MBR剪枝。
    /// 删除后沿返回路径重新计算MBR；完全变空的子节点会从父节点中移除，
    /// 但不做最小条目数的重插入，叶子可以保持未满状态。
    ///
    /// # 返回值
    /// - `true` - 删除了一个条目
    /// - `false` - 树中不存在该 id，树保持不变
    pub fn delete(&mut self, id: &str) -> bool {
        let removed = self.remove(id).is_some();
        if removed {
            debug!(%id, "item deleted");
        }
        removed
    }

    /// 删除并返回第一个 id 匹配的数据条目
    pub fn remove(&mut self, id: &str) -> Option<Item<T>> {
        // D1-D2: 找到包含目标条目的叶子并删除
        let removed = delete_recursive(self.root_mut(), id);

        // D3: 根节点的子节点全部被移除时，退化为空叶子
        let root = self.root_mut();
        if !root.is_leaf() && root.is_empty() {
            *root = Node::new_leaf();
        }

        if removed.is_some() {
            self.size -= 1;
        }
        removed
    }
}

/// 递归删除
///
/// 只有真正删除了条目的路径上的节点会重新计算MBR，
/// 未命中的子树保持原样。
fn delete_recursive<T>(node: &mut Node<T>, id: &str) -> Option<Item<T>> {
    let removed = match &mut node.kind {
        NodeKind::Leaf(items) => {
            let position = items.iter().position(|item| item.id == id)?;
            Some(items.remove(position))
        }
        NodeKind::Internal(children) => {
            let mut found = None;
            for i in 0..children.len() {
                if let Some(item) = delete_recursive(&mut children[i], id) {
                    // 子节点变空后直接移除，避免空节点的退化MBR污染父节点
                    if children[i].is_empty() {
                        children.remove(i);
                    }
                    found = Some(item);
                    break;
                }
            }
            found
        }
    };

    if removed.is_some() {
        node.update_bbox();
    }
    removed
}
