use crate::error::{IndexError, IndexResult};
use crate::rtree::BoundingBox;
use serde::{Deserialize, Serialize};

/// 待索引的设备：一个带 payload 的位置点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentEntry<E> {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub payload: E,
}

impl<E> EquipmentEntry<E> {
    pub fn new(id: impl Into<String>, x: f64, y: f64, payload: E) -> Self {
        EquipmentEntry {
            id: id.into(),
            x,
            y,
            payload,
        }
    }

    pub(crate) fn check_finite(&self) -> IndexResult<()> {
        check_finite(&self.id, self.x, self.y)
    }
}

/// 待索引的房间：以房间外接矩形的中心点代表整个房间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomEntry<R> {
    pub id: String,
    pub centroid_x: f64,
    pub centroid_y: f64,
    pub payload: R,
}

impl<R> RoomEntry<R> {
    pub fn new(id: impl Into<String>, centroid_x: f64, centroid_y: f64, payload: R) -> Self {
        RoomEntry {
            id: id.into(),
            centroid_x,
            centroid_y,
            payload,
        }
    }

    /// 由房间外接矩形构造，中心点取矩形中点
    pub fn from_bounds(id: impl Into<String>, bounds: &BoundingBox, payload: R) -> Self {
        let center = bounds.center();
        RoomEntry::new(id, center.x, center.y, payload)
    }

    pub(crate) fn check_finite(&self) -> IndexResult<()> {
        check_finite(&self.id, self.centroid_x, self.centroid_y)
    }
}

fn check_finite(id: &str, x: f64, y: f64) -> IndexResult<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(IndexError::NonFiniteCoordinate {
            id: id.to_string(),
            x,
            y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_centroid_from_bounds() {
        let room = RoomEntry::from_bounds("R-101", &BoundingBox::new(10.0, 20.0, 0.0, 4.0), "Lobby");
        assert_eq!(room.centroid_x, 5.0);
        assert_eq!(room.centroid_y, 12.0);
        assert_eq!(room.payload, "Lobby");
        assert!(room.check_finite().is_ok());
    }

    #[test]
    fn test_check_finite_reports_entry() {
        let entry = EquipmentEntry::new("pump-1", f64::NAN, 1.0, ());
        match entry.check_finite() {
            Err(IndexError::NonFiniteCoordinate { id, y, .. }) => {
                assert_eq!(id, "pump-1");
                assert_eq!(y, 1.0);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
