use crate::config::IndexConfig;
use crate::index::{EquipmentEntry, RoomEntry, SpatialIndex};
use crate::rtree::BoundingBox;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// 建筑快照中的一件设备
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub equipment_type: Option<String>,
    pub x: f64,
    pub y: f64,
}

/// 建筑快照中的一个房间，以外接矩形表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl RoomRecord {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// 导入管线产出的建筑快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub equipment: Vec<EquipmentRecord>,
    #[serde(default)]
    pub rooms: Vec<RoomRecord>,
}

pub type SnapshotIndex = SpatialIndex<EquipmentRecord, RoomRecord>;

impl Snapshot {
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json).map_err(|e| format!("Failed to parse snapshot: {}", e))?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read snapshot '{}': {}", path.display(), e))?;
        Self::from_json_str(&json)
    }

    /// 按配置的节点容量建立索引，记录本身作为 payload
    pub fn into_index(self, config: &IndexConfig) -> crate::Result<SnapshotIndex> {
        let mut index = SpatialIndex::from_config(config)?;

        let equipment = self
            .equipment
            .into_iter()
            .map(|record| EquipmentEntry::new(record.id.clone(), record.x, record.y, record));
        let equipment_count = index.index_equipment(equipment)?;

        let rooms = self.rooms.into_iter().map(|record| {
            let bounds = record.bounds();
            RoomEntry::from_bounds(record.id.clone(), &bounds, record)
        });
        let room_count = index.index_rooms(rooms)?;

        info!(equipment = equipment_count, rooms = room_count, "snapshot loaded");
        Ok(index)
    }
}
