use super::rectangle::{BoundingBox, Point};
use serde::Serialize;

/// 拥有边界框的条目
///
/// 叶子中的数据条目和索引节点中的子节点都实现它，二次分裂算法只依赖这个接口。
pub trait Bounded {
    fn bbox(&self) -> &BoundingBox;
}

/// 数据条目：调用方插入的一个点对象
///
/// `id` 只用于和 payload 关联，不要求唯一。插入后不会被修改，只能被删除。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item<T> {
    pub id: String,
    pub location: Point,
    pub bbox: BoundingBox,
    pub payload: T,
}

impl<T> Item<T> {
    pub fn new(id: impl Into<String>, x: f64, y: f64, payload: T) -> Self {
        Item {
            id: id.into(),
            location: Point::new(x, y),
            bbox: BoundingBox::from_point(x, y),
            payload,
        }
    }
}

impl<T> Bounded for Item<T> {
    fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

/// 节点内容
///
/// - Leaf：叶子节点，直接存放数据条目
/// - Internal：索引节点，只存放子节点，从不直接存放数据条目
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<T> {
    Leaf(Vec<Item<T>>),
    Internal(Vec<Node<T>>),
}

/// R-tree节点
///
/// 每个节点独占自己的子节点，没有指向父节点的引用。
/// `bbox` 始终是所有直接内容边界框的紧致并集。
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub bbox: BoundingBox,
    pub kind: NodeKind<T>,
}

impl<T> Bounded for Node<T> {
    fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Node::new_leaf()
    }
}

impl<T> Node<T> {
    /// 创建空的叶子节点
    pub fn new_leaf() -> Self {
        Node {
            bbox: BoundingBox::default(),
            kind: NodeKind::Leaf(Vec::new()),
        }
    }

    /// 由一组数据条目创建叶子节点
    pub fn leaf(items: Vec<Item<T>>) -> Self {
        let mut node = Node {
            bbox: BoundingBox::default(),
            kind: NodeKind::Leaf(items),
        };
        node.update_bbox();
        node
    }

    /// 由一组子节点创建索引节点
    pub fn internal(children: Vec<Node<T>>) -> Self {
        let mut node = Node {
            bbox: BoundingBox::default(),
            kind: NodeKind::Internal(children),
        };
        node.update_bbox();
        node
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// 直接内容的数量（叶子为条目数，索引节点为子节点数）
    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(items) => items.len(),
            NodeKind::Internal(children) => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 重新计算MBR以紧致包含所有直接内容
    ///
    /// 空节点的MBR退化为原点，调用方不会用它参与剪枝。
    pub fn update_bbox(&mut self) {
        self.bbox = match &self.kind {
            NodeKind::Leaf(items) => union_of(items),
            NodeKind::Internal(children) => union_of(children),
        }
        .unwrap_or_default();
    }
}

/// 计算一组条目的最小边界矩形，空集合返回 None
pub(crate) fn union_of<E: Bounded>(entries: &[E]) -> Option<BoundingBox> {
    let (first, rest) = entries.split_first()?;
    Some(
        rest.iter()
            .fold(*first.bbox(), |acc, entry| acc.union(entry.bbox())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_has_point_bbox() {
        let item = Item::new("ahu-1", 3.0, 4.0, ());
        assert!(item.bbox.is_point());
        assert_eq!(item.location, Point::new(3.0, 4.0));
        assert_eq!(item.bbox, BoundingBox::from_point(3.0, 4.0));
    }

    #[test]
    fn test_leaf_bbox_is_tight_union() {
        let node = Node::leaf(vec![
            Item::new("1", 0.0, 5.0, ()),
            Item::new("2", 8.0, 1.0, ()),
            Item::new("3", 4.0, 3.0, ()),
        ]);
        assert!(node.is_leaf());
        assert_eq!(node.len(), 3);
        assert_eq!(node.bbox, BoundingBox::new(0.0, 1.0, 8.0, 5.0));
    }

    #[test]
    fn test_internal_bbox_covers_children() {
        let left = Node::leaf(vec![Item::new("a", 0.0, 0.0, ()), Item::new("b", 1.0, 1.0, ())]);
        let right = Node::leaf(vec![Item::new("c", 10.0, 10.0, ())]);
        let parent = Node::internal(vec![left, right]);

        assert!(!parent.is_leaf());
        assert_eq!(parent.len(), 2);
        assert_eq!(parent.bbox, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_empty_node() {
        let node: Node<()> = Node::new_leaf();
        assert!(node.is_empty());
        assert!(union_of::<Item<()>>(&[]).is_none());
    }
}
