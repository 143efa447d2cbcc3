use super::super::node::{union_of, Node, NodeKind};
use super::super::rectangle::BoundingBox;
use super::super::rtree::RTree;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 树的统计信息，只用于诊断和测试
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[display(
    fmt = "nodes={} leaves={} items={} height={} leaf_items=[{}, {}]",
    total_nodes,
    leaf_nodes,
    total_items,
    height,
    min_items_per_leaf,
    max_items_per_leaf
)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub leaf_nodes: usize,
    pub internal_nodes: usize,
    pub total_items: usize,
    /// 根到最深叶子的边数
    pub height: usize,
    pub min_items_per_leaf: usize,
    pub max_items_per_leaf: usize,
}

/// 用于JSON序列化的简化树结构
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeVisualization {
    pub root: NodeVisualization,
    pub config: TreeConfig,
}

/// 用于JSON序列化的树配置
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeConfig {
    pub max_items: usize,
    pub min_items: usize,
}

/// 用于JSON序列化的节点结构
#[derive(Debug, Serialize, Deserialize)]
pub struct NodeVisualization {
    pub bbox: BoundingBox,
    pub is_leaf: bool,
    /// 节点深度，根为 0
    pub depth: usize,
    /// 数据条目 id（仅叶子节点）
    pub item_ids: Vec<String>,
    /// 子节点（仅索引节点）
    pub children: Vec<NodeVisualization>,
}

/// R-tree不变量被破坏时的描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// 从根出发的子节点下标路径
    pub path: Vec<usize>,
    pub reason: String,
}

/// R-tree调试功能实现
impl<T> RTree<T> {
    /// 遍历整棵树统计节点数、条目数、高度和叶子条目数范围
    pub fn statistics(&self) -> TreeStats {
        let mut stats = TreeStats {
            min_items_per_leaf: usize::MAX,
            ..TreeStats::default()
        };
        collect_stats(self.root_ref(), 0, &mut stats);

        if stats.leaf_nodes == 0 {
            stats.min_items_per_leaf = 0;
        }
        stats
    }

    /// 检查包含关系、紧致MBR和容量不变量
    ///
    /// - 每个节点的MBR恰好是直接内容MBR的并集
    /// - 每个叶子最多 `max_items` 个条目，每个索引节点最多 `max_items` 个子节点
    /// - 除根以外不存在空节点
    /// - 所有叶子位于同一深度
    /// - 记录的条目数与树中实际条目数一致
    pub fn validate_invariants(&self) -> Result<(), InvariantViolation> {
        let mut leaf_depth = None;
        let mut path = Vec::new();
        validate_node(self.root_ref(), self.max_items(), true, 0, &mut leaf_depth, &mut path)?;

        let counted = self.iter().count();
        if counted != self.len() {
            return Err(violation(
                &[],
                format!("item count {} does not match {} items in the tree", self.len(), counted),
            ));
        }
        Ok(())
    }

    /// 导出树结构为JSON格式
    ///
    /// 返回包含完整树结构的JSON字符串，用于可视化和排查问题
    pub fn export_to_json(&self) -> Result<String, serde_json::Error> {
        let visualization = TreeVisualization {
            root: visualize(self.root_ref(), 0),
            config: TreeConfig {
                max_items: self.max_items(),
                min_items: self.min_items(),
            },
        };
        serde_json::to_string_pretty(&visualization)
    }
}

fn collect_stats<T>(node: &Node<T>, depth: usize, stats: &mut TreeStats) {
    stats.total_nodes += 1;
    stats.height = stats.height.max(depth);

    match &node.kind {
        NodeKind::Leaf(items) => {
            stats.leaf_nodes += 1;
            stats.total_items += items.len();
            stats.min_items_per_leaf = stats.min_items_per_leaf.min(items.len());
            stats.max_items_per_leaf = stats.max_items_per_leaf.max(items.len());
        }
        NodeKind::Internal(children) => {
            stats.internal_nodes += 1;
            for child in children {
                collect_stats(child, depth + 1, stats);
            }
        }
    }
}

fn validate_node<T>(
    node: &Node<T>,
    max_items: usize,
    is_root: bool,
    depth: usize,
    leaf_depth: &mut Option<usize>,
    path: &mut Vec<usize>,
) -> Result<(), InvariantViolation> {
    if node.len() > max_items {
        return Err(violation(path, format!("{} entries exceed capacity {}", node.len(), max_items)));
    }
    if node.is_empty() {
        if is_root && node.is_leaf() {
            return Ok(());
        }
        return Err(violation(path, "empty non-root node".to_string()));
    }

    let expected = match &node.kind {
        NodeKind::Leaf(items) => union_of(items),
        NodeKind::Internal(children) => union_of(children),
    };
    if expected != Some(node.bbox) {
        return Err(violation(
            path,
            format!("bbox {} is not the union of its contents {:?}", node.bbox, expected),
        ));
    }

    match &node.kind {
        NodeKind::Leaf(_) => match *leaf_depth {
            Some(d) if d != depth => Err(violation(
                path,
                format!("leaf at depth {} but other leaves at depth {}", depth, d),
            )),
            _ => {
                *leaf_depth = Some(depth);
                Ok(())
            }
        },
        NodeKind::Internal(children) => {
            for (i, child) in children.iter().enumerate() {
                if !node.bbox.contains(&child.bbox) {
                    return Err(violation(path, format!("child {} escapes parent bbox", i)));
                }
                path.push(i);
                validate_node(child, max_items, false, depth + 1, leaf_depth, path)?;
                path.pop();
            }
            Ok(())
        }
    }
}

fn violation(path: &[usize], reason: String) -> InvariantViolation {
    InvariantViolation {
        path: path.to_vec(),
        reason,
    }
}

/// 递归创建节点的可视化结构
fn visualize<T>(node: &Node<T>, depth: usize) -> NodeVisualization {
    let (item_ids, children) = match &node.kind {
        NodeKind::Leaf(items) => (items.iter().map(|item| item.id.clone()).collect(), Vec::new()),
        NodeKind::Internal(children) => (
            Vec::new(),
            children.iter().map(|child| visualize(child, depth + 1)).collect(),
        ),
    };

    NodeVisualization {
        bbox: node.bbox,
        is_leaf: node.is_leaf(),
        depth,
        item_ids,
        children,
    }
}
