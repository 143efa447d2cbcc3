use super::records::{EquipmentEntry, RoomEntry};
use crate::config::IndexConfig;
use crate::error::IndexResult;
use crate::rtree::{BoundingBox, RTree, TreeStats};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 两棵树各自的统计信息
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[display(fmt = "equipment: {}\nrooms: {}", equipment, rooms)]
pub struct IndexStatistics {
    pub equipment: TreeStats,
    pub rooms: TreeStats,
}

/// 建筑空间索引
///
/// 持有两棵相互独立的R-tree：一棵存放设备位置，一棵存放房间中心点。
/// 查询结果按 payload 返回，调用方不需要接触树内部的条目结构。
///
/// 设备邻近查询统一走这里，不再通过数据库的距离计算重复实现。
///
/// # 示例
///
/// ```
/// use bim_spatial::{EquipmentEntry, SpatialIndex};
///
/// let mut index: SpatialIndex<&str, ()> = SpatialIndex::new(10, 10).unwrap();
/// index
///     .index_equipment(vec![
///         EquipmentEntry::new("ahu-1", 0.0, 0.0, "AHU-1"),
///         EquipmentEntry::new("vav-2", 12.0, 3.0, "VAV-2"),
///     ])
///     .unwrap();
///
/// assert_eq!(index.find_nearby_equipment(1.0, 1.0, 5.0), vec![&"AHU-1"]);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialIndex<E, R> {
    equipment: RTree<E>,
    rooms: RTree<R>,
}

impl<E, R> Default for SpatialIndex<E, R> {
    fn default() -> Self {
        SpatialIndex {
            equipment: RTree::default(),
            rooms: RTree::default(),
        }
    }
}

impl<E, R> SpatialIndex<E, R> {
    pub fn new(equipment_max_items: usize, room_max_items: usize) -> IndexResult<Self> {
        Ok(SpatialIndex {
            equipment: RTree::new(equipment_max_items)?,
            rooms: RTree::new(room_max_items)?,
        })
    }

    pub fn from_config(config: &IndexConfig) -> IndexResult<Self> {
        Self::new(config.index.equipment_max_items, config.index.room_max_items)
    }

    /// 批量索引设备，返回本次插入的条目数
    ///
    /// 插入前先检查整批数据，只要有一个条目坐标非有限就拒绝整批，索引保持不变。
    pub fn index_equipment<I>(&mut self, entries: I) -> IndexResult<usize>
    where
        I: IntoIterator<Item = EquipmentEntry<E>>,
    {
        let entries: Vec<EquipmentEntry<E>> = entries.into_iter().collect();
        for entry in &entries {
            entry.check_finite()?;
        }

        let count = entries.len();
        for entry in entries {
            self.equipment.insert(entry.id, entry.x, entry.y, entry.payload)?;
        }

        info!(
            indexed = count,
            total = self.equipment.len(),
            height = self.equipment.height(),
            "equipment indexed"
        );
        Ok(count)
    }

    /// 批量索引房间中心点，规则同 [`index_equipment`](Self::index_equipment)
    pub fn index_rooms<I>(&mut self, entries: I) -> IndexResult<usize>
    where
        I: IntoIterator<Item = RoomEntry<R>>,
    {
        let entries: Vec<RoomEntry<R>> = entries.into_iter().collect();
        for entry in &entries {
            entry.check_finite()?;
        }

        let count = entries.len();
        for entry in entries {
            self.rooms
                .insert(entry.id, entry.centroid_x, entry.centroid_y, entry.payload)?;
        }

        info!(
            indexed = count,
            total = self.rooms.len(),
            height = self.rooms.height(),
            "rooms indexed"
        );
        Ok(count)
    }

    /// 与 `(x, y)` 距离不超过 `radius` 的设备，顺序不保证
    pub fn find_nearby_equipment(&self, x: f64, y: f64, radius: f64) -> Vec<&E> {
        self.equipment
            .find_within_radius(x, y, radius)
            .into_iter()
            .map(|item| &item.payload)
            .collect()
    }

    /// 最近的 `k` 个设备，由近到远
    pub fn find_nearest_equipment(&self, x: f64, y: f64, k: usize) -> Vec<&E> {
        self.equipment
            .nearest_neighbors(x, y, k)
            .into_iter()
            .map(|neighbor| &neighbor.item.payload)
            .collect()
    }

    /// 满足 `predicate` 的最近 `k` 个设备，由近到远
    ///
    /// 典型用法是按设备类型过滤，例如找最近的水泵。
    pub fn find_nearest_equipment_matching<F>(&self, x: f64, y: f64, k: usize, predicate: F) -> Vec<&E>
    where
        F: Fn(&E) -> bool,
    {
        self.equipment
            .nearest_neighbors_where(x, y, k, |item| predicate(&item.payload))
            .into_iter()
            .map(|neighbor| &neighbor.item.payload)
            .collect()
    }

    /// 位于矩形区域内（含边界）的设备
    pub fn find_equipment_in_area(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<&E> {
        self.equipment
            .search(&BoundingBox::new(min_x, min_y, max_x, max_y))
            .into_iter()
            .map(|item| &item.payload)
            .collect()
    }

    /// 与设备 `id` 相距不超过 `radius` 的其它设备
    ///
    /// 设备本身不在结果中。`id` 不存在时返回 `None`；
    /// 存在重复 id 时以第一个找到的条目为中心。
    pub fn find_adjacent_equipment(&self, id: &str, radius: f64) -> Option<Vec<&E>> {
        let origin = self.equipment.get(id)?;
        let adjacent: Vec<&E> = self
            .equipment
            .find_within_radius(origin.location.x, origin.location.y, radius)
            .into_iter()
            .filter(|item| !std::ptr::eq(*item, origin))
            .map(|item| &item.payload)
            .collect();

        debug!(%id, radius, found = adjacent.len(), "adjacent equipment lookup");
        Some(adjacent)
    }

    /// 中心点最近的 `k` 个房间，由近到远
    pub fn find_nearest_rooms(&self, x: f64, y: f64, k: usize) -> Vec<&R> {
        self.rooms
            .nearest_neighbors(x, y, k)
            .into_iter()
            .map(|neighbor| &neighbor.item.payload)
            .collect()
    }

    /// 中心点落在矩形区域内的房间
    pub fn find_rooms_in_area(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<&R> {
        self.rooms
            .search(&BoundingBox::new(min_x, min_y, max_x, max_y))
            .into_iter()
            .map(|item| &item.payload)
            .collect()
    }

    pub fn remove_equipment(&mut self, id: &str) -> bool {
        self.equipment.delete(id)
    }

    pub fn remove_room(&mut self, id: &str) -> bool {
        self.rooms.delete(id)
    }

    pub fn get_statistics(&self) -> IndexStatistics {
        IndexStatistics {
            equipment: self.equipment.statistics(),
            rooms: self.rooms.statistics(),
        }
    }

    pub fn equipment_tree(&self) -> &RTree<E> {
        &self.equipment
    }

    pub fn room_tree(&self) -> &RTree<R> {
        &self.rooms
    }

    pub fn clear(&mut self) {
        self.equipment.clear();
        self.rooms.clear();
    }
}
