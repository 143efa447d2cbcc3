use super::snapshot::{EquipmentRecord, RoomRecord};
use crate::index::IndexStatistics;
use crate::rtree::TreeStats;
use colored::*;

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format_equipment(equipment: &[&EquipmentRecord]) -> String {
        if equipment.is_empty() {
            return "(no equipment)".yellow().to_string();
        }

        let mut result = String::new();
        for (i, record) in equipment.iter().enumerate() {
            let mut line = format!("{}) {}", (i + 1).to_string().blue(), record.id.green());
            if let Some(name) = &record.name {
                line.push_str(&format!(" {}", name));
            }
            if let Some(kind) = &record.equipment_type {
                line.push_str(&format!(" [{}]", kind.cyan()));
            }
            line.push_str(&format!(" @ ({}, {})", record.x, record.y));
            result.push_str(&line);
            result.push('\n');
        }
        result.trim_end().to_string()
    }

    pub fn format_rooms(rooms: &[&RoomRecord]) -> String {
        if rooms.is_empty() {
            return "(no rooms)".yellow().to_string();
        }

        let mut result = String::new();
        for (i, room) in rooms.iter().enumerate() {
            let name = room.name.as_deref().unwrap_or("");
            result.push_str(&format!(
                "{}) {} {} {}\n",
                (i + 1).to_string().blue(),
                room.id.green(),
                name,
                room.bounds()
            ));
        }
        result.trim_end().to_string()
    }

    pub fn format_statistics(stats: &IndexStatistics) -> String {
        format!(
            "{}\n{}",
            Self::format_tree_stats("equipment", &stats.equipment),
            Self::format_tree_stats("rooms", &stats.rooms)
        )
    }

    fn format_tree_stats(label: &str, stats: &TreeStats) -> String {
        format!(
            "{}: {} items, {} nodes ({} leaves, {} internal), height {}, {} items per leaf",
            label.bold(),
            stats.total_items.to_string().cyan(),
            stats.total_nodes,
            stats.leaf_nodes,
            stats.internal_nodes,
            stats.height,
            format!("{}..={}", stats.min_items_per_leaf, stats.max_items_per_leaf).cyan()
        )
    }

    pub fn format_error(err: &str) -> String {
        format!("(error) {}", err.red())
    }
}
