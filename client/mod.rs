pub mod cli_args;
pub mod formatter;
pub mod snapshot;

pub use cli_args::{CliArgs, QueryCommand, TreeKind};
pub use formatter::OutputFormatter;
pub use snapshot::{EquipmentRecord, RoomRecord, Snapshot, SnapshotIndex};
