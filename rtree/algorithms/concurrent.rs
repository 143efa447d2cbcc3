use super::super::node::Item;
use super::super::rectangle::BoundingBox;
use super::super::rtree::RTree;
use super::debug::TreeStats;
use crate::error::{IndexError, IndexResult};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 并发安全的R-tree实现
///
/// 包装标准的 [`RTree`]，用读写锁协调访问：
/// - 读操作（search, nearest_neighbors, find_within_radius, statistics）可以并发执行
/// - 写操作（insert, delete, clear）需要独占访问
///
/// 查询结果在持锁期间克隆出来，锁不会泄漏给调用方。
///
/// # 示例
///
/// ```
/// use bim_spatial::ConcurrentRTree;
/// use std::thread;
///
/// let rtree = ConcurrentRTree::new(4).unwrap();
///
/// let handles: Vec<_> = (0..4)
///     .map(|i| {
///         let rtree = rtree.clone();
///         thread::spawn(move || {
///             rtree.insert(format!("sensor-{}", i), i as f64, i as f64, i).unwrap();
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(rtree.len().unwrap(), 4);
/// ```
#[derive(Debug)]
pub struct ConcurrentRTree<T> {
    inner: Arc<RwLock<RTree<T>>>,
}

impl<T> Clone for ConcurrentRTree<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> From<RTree<T>> for ConcurrentRTree<T> {
    fn from(rtree: RTree<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(rtree)),
        }
    }
}

impl<T: Clone> ConcurrentRTree<T> {
    /// 创建新的并发R-tree
    pub fn new(max_items: usize) -> IndexResult<Self> {
        Ok(Self::from(RTree::new(max_items)?))
    }

    pub fn insert(&self, id: impl Into<String>, x: f64, y: f64, payload: T) -> IndexResult<()> {
        self.write()?.insert(id, x, y, payload)
    }

    pub fn delete(&self, id: &str) -> IndexResult<bool> {
        Ok(self.write()?.delete(id))
    }

    pub fn clear(&self) -> IndexResult<()> {
        self.write()?.clear();
        Ok(())
    }

    pub fn search(&self, query: &BoundingBox) -> IndexResult<Vec<Item<T>>> {
        Ok(self.read()?.search(query).into_iter().cloned().collect())
    }

    /// 最近的 `k` 个条目及其距离，按距离升序
    pub fn nearest_neighbors(&self, x: f64, y: f64, k: usize) -> IndexResult<Vec<(Item<T>, f64)>> {
        Ok(self
            .read()?
            .nearest_neighbors(x, y, k)
            .into_iter()
            .map(|neighbor| (neighbor.item.clone(), neighbor.distance))
            .collect())
    }

    pub fn find_within_radius(&self, x: f64, y: f64, radius: f64) -> IndexResult<Vec<Item<T>>> {
        Ok(self
            .read()?
            .find_within_radius(x, y, radius)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn statistics(&self) -> IndexResult<TreeStats> {
        Ok(self.read()?.statistics())
    }

    pub fn len(&self) -> IndexResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> IndexResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// 在读锁下执行任意只读操作
    pub fn with_read<R>(&self, f: impl FnOnce(&RTree<T>) -> R) -> IndexResult<R> {
        let guard = self.read()?;
        Ok(f(&guard))
    }

    /// 在写锁下执行任意修改操作
    pub fn with_write<R>(&self, f: impl FnOnce(&mut RTree<T>) -> R) -> IndexResult<R> {
        let mut guard = self.write()?;
        Ok(f(&mut guard))
    }

    fn read(&self) -> IndexResult<RwLockReadGuard<'_, RTree<T>>> {
        self.inner.read().map_err(|_| IndexError::LockPoisoned)
    }

    fn write(&self) -> IndexResult<RwLockWriteGuard<'_, RTree<T>>> {
        self.inner.write().map_err(|_| IndexError::LockPoisoned)
    }
}
