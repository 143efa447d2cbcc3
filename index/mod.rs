pub mod records;
pub mod spatial_index;

pub use records::{EquipmentEntry, RoomEntry};
pub use spatial_index::{IndexStatistics, SpatialIndex};
