use super::node::{Item, Node, NodeKind};
use super::rectangle::BoundingBox;
use crate::error::{IndexError, IndexResult};

/// 节点容量下限，低于这个值二次分裂没有意义
pub const MIN_CAPACITY: usize = 4;

/// 默认节点容量（M=10, m=5）
pub const DEFAULT_MAX_ITEMS: usize = 10;

/// R-tree主结构
///
/// 整棵树完全在内存中，由调用方独占。写操作需要 `&mut self`，
/// 因此同一时刻只能有一个写者；需要跨线程共享时使用
/// [`ConcurrentRTree`](super::algorithms::concurrent::ConcurrentRTree)。
#[derive(Debug, Clone)]
pub struct RTree<T> {
    /// 根节点，初始为空叶子
    root: Node<T>,
    /// 最大条目数M
    max_items: usize,
    /// 最小条目数m（M/2）
    min_items: usize,
    /// 数据条目总数，由插入和删除维护
    pub(super) size: usize,
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        RTree {
            root: Node::new_leaf(),
            max_items: DEFAULT_MAX_ITEMS,
            min_items: DEFAULT_MAX_ITEMS / 2,
            size: 0,
        }
    }
}

impl<T> RTree<T> {
    /// 创建新的R-tree，`max_items` 至少为 4
    pub fn new(max_items: usize) -> IndexResult<Self> {
        if max_items < MIN_CAPACITY {
            return Err(IndexError::InvalidCapacity { max_items });
        }

        Ok(RTree {
            root: Node::new_leaf(),
            max_items,
            min_items: max_items / 2,
            size: 0,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// 根节点MBR，空树返回 None
    pub fn root_bbox(&self) -> Option<&BoundingBox> {
        if self.is_empty() {
            None
        } else {
            Some(&self.root.bbox)
        }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn min_items(&self) -> usize {
        self.min_items
    }

    /// 树高：根到叶子的边数，只有根叶子时为 0
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = &self.root;
        while let NodeKind::Internal(children) = &current.kind {
            match children.first() {
                Some(child) => current = child,
                None => break,
            }
            height += 1;
        }
        height
    }

    /// 获取总的条目数量
    pub fn len(&self) -> usize {
        self.size
    }

    /// 清空整棵树
    pub fn clear(&mut self) {
        self.root = Node::new_leaf();
        self.size = 0;
    }

    /// 按 id 查找第一个匹配的条目
    ///
    /// id 不携带空间信息，只能遍历整棵树。
    pub fn get(&self, id: &str) -> Option<&Item<T>> {
        self.iter().find(|item| item.id == id)
    }

    /// 深度优先遍历所有数据条目
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: vec![&self.root],
            items: std::slice::Iter::default(),
        }
    }

    /// 内部方法：获取根节点的引用
    pub(crate) fn root_ref(&self) -> &Node<T> {
        &self.root
    }

    /// 内部方法：获取根节点的可变引用
    pub(crate) fn root_mut(&mut self) -> &mut Node<T> {
        &mut self.root
    }
}

/// 数据条目迭代器，顺序与叶子在树中的位置一致
#[derive(Debug)]
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    items: std::slice::Iter<'a, Item<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Item<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.items.next() {
                return Some(item);
            }
            let node = self.stack.pop()?;
            match &node.kind {
                NodeKind::Leaf(items) => self.items = items.iter(),
                NodeKind::Internal(children) => self.stack.extend(children.iter().rev()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtree_creation() {
        let rtree: RTree<()> = RTree::new(10).unwrap();
        assert_eq!(rtree.max_items(), 10);
        assert_eq!(rtree.min_items(), 5);
        assert!(rtree.is_empty());
        assert_eq!(rtree.height(), 0);
        assert!(rtree.root_bbox().is_none());
    }

    #[test]
    fn test_rtree_rejects_small_capacity() {
        let err = RTree::<()>::new(3).unwrap_err();
        assert_eq!(err, IndexError::InvalidCapacity { max_items: 3 });
    }

    #[test]
    fn test_rtree_default() {
        let rtree: RTree<u32> = RTree::default();
        assert_eq!(rtree.max_items(), DEFAULT_MAX_ITEMS);
        assert_eq!(rtree.min_items(), DEFAULT_MAX_ITEMS / 2);
    }

    #[test]
    fn test_iter_and_get() {
        let mut rtree = RTree::new(4).unwrap();
        for i in 0..20 {
            rtree.insert(i.to_string(), i as f64, (i * 2) as f64, i).unwrap();
        }

        assert_eq!(rtree.len(), 20);
        assert_eq!(rtree.iter().count(), 20);
        let mut payloads: Vec<i32> = rtree.iter().map(|item| item.payload).collect();
        payloads.sort();
        assert_eq!(payloads, (0..20).collect::<Vec<_>>());

        let item = rtree.get("7").unwrap();
        assert_eq!(item.payload, 7);
        assert_eq!(item.location.y, 14.0);
        assert!(rtree.get("missing").is_none());
    }

    #[test]
    fn test_clear() {
        let mut rtree = RTree::new(4).unwrap();
        for i in 0..10 {
            rtree.insert(i.to_string(), i as f64, 0.0, ()).unwrap();
        }
        assert!(rtree.height() > 0);

        rtree.clear();
        assert!(rtree.is_empty());
        assert_eq!(rtree.len(), 0);
        assert_eq!(rtree.height(), 0);
    }
}
