use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bim-spatial",
    version,
    about = "Spatial queries over a building equipment/room snapshot",
    long_about = "bim-spatial loads a building snapshot (equipment positions and room bounds) from JSON,\nindexes it in two in-memory R-trees and answers proximity queries against it."
)]
pub struct CliArgs {
    /// 配置文件路径
    #[arg(short, long, default_value = "bim-spatial.toml")]
    pub config: String,

    /// 生成默认配置文件并退出
    #[arg(long)]
    pub generate_config: bool,

    /// Log level (overrides config file)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Building snapshot JSON file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<QueryCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum QueryCommand {
    /// Equipment within RADIUS of (X, Y)
    #[command(allow_negative_numbers = true)]
    Nearby { x: f64, y: f64, radius: f64 },

    /// The K nearest equipment (or rooms) to (X, Y), nearest first
    #[command(allow_negative_numbers = true)]
    Nearest {
        x: f64,
        y: f64,
        #[arg(short, long, default_value_t = 5)]
        k: usize,
        /// Only consider equipment of this type
        #[arg(short = 't', long = "type")]
        equipment_type: Option<String>,
        /// Query room centroids instead of equipment
        #[arg(long, conflicts_with = "equipment_type")]
        rooms: bool,
    },

    /// Equipment (or rooms) inside a rectangle, bounds inclusive
    #[command(allow_negative_numbers = true)]
    Area {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        /// Query room centroids instead of equipment
        #[arg(long)]
        rooms: bool,
    },

    /// Equipment within RADIUS of the equipment ID, excluding itself
    Adjacent { id: String, radius: f64 },

    /// Tree statistics for both indexes
    Stats,

    /// Dump the structure of one tree as JSON
    Dump {
        #[arg(value_enum, default_value_t = TreeKind::Equipment)]
        tree: TreeKind,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    Equipment,
    Rooms,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.generate_config {
            return Ok(());
        }

        if self.command.is_none() {
            return Err("No query specified. Run with --help to list the available queries.".to_string());
        }

        if self.input.is_none() {
            return Err("No snapshot given. Use --input <snapshot.json>.".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_nearby_with_negative_coordinates() {
        let args = parse(&["bim-spatial", "-i", "plant.json", "nearby", "-12.5", "3", "4"]);
        assert_eq!(
            args.command,
            Some(QueryCommand::Nearby {
                x: -12.5,
                y: 3.0,
                radius: 4.0
            })
        );
        assert_eq!(args.config, "bim-spatial.toml");
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_nearest_with_type_filter() {
        let args = parse(&["bim-spatial", "--input", "plant.json", "nearest", "1", "2", "-k", "3", "--type", "pump"]);
        match args.command {
            Some(QueryCommand::Nearest {
                k,
                equipment_type,
                rooms,
                ..
            }) => {
                assert_eq!(k, 3);
                assert_eq!(equipment_type.as_deref(), Some("pump"));
                assert!(!rooms);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rooms_conflicts_with_type() {
        let result = CliArgs::try_parse_from(["bim-spatial", "nearest", "0", "0", "--rooms", "--type", "pump"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_dump_defaults_to_equipment() {
        let args = parse(&["bim-spatial", "-i", "plant.json", "dump"]);
        assert_eq!(
            args.command,
            Some(QueryCommand::Dump {
                tree: TreeKind::Equipment
            })
        );
    }

    #[test]
    fn test_validate() {
        assert!(parse(&["bim-spatial", "--generate-config"]).validate().is_ok());
        assert!(parse(&["bim-spatial", "-i", "plant.json"]).validate().is_err());
        assert!(parse(&["bim-spatial", "stats"]).validate().is_err());
    }
}
