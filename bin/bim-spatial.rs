use bim_spatial::client::{CliArgs, OutputFormatter, QueryCommand, Snapshot, SnapshotIndex, TreeKind};
use bim_spatial::{IndexConfig, Result};
use tracing::{debug, Level};

fn main() -> Result<()> {
    let args = CliArgs::parse_args();

    // 验证参数
    if let Err(e) = args.validate() {
        eprintln!("{}", OutputFormatter::format_error(&e));
        std::process::exit(1);
    }

    // 生成默认配置文件
    if args.generate_config {
        let config = IndexConfig::default();
        config.save_to_file(&args.config)?;
        println!("✅ Generated default configuration: {}", args.config);
        return Ok(());
    }

    // 加载配置，命令行参数覆盖配置文件
    let mut config = IndexConfig::from_file(&args.config)?;
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }
    config.validate()?;

    init_logging(&config.logging)?;
    debug!(?config, "configuration loaded");

    let (Some(input), Some(command)) = (args.input, args.command) else {
        return Ok(());
    };
    let index = Snapshot::from_file(&input)?.into_index(&config)?;

    run_query(&index, command)
}

fn run_query(index: &SnapshotIndex, command: QueryCommand) -> Result<()> {
    match command {
        QueryCommand::Nearby { x, y, radius } => {
            let found = index.find_nearby_equipment(x, y, radius);
            println!("{}", OutputFormatter::format_equipment(&found));
        }
        QueryCommand::Nearest {
            x,
            y,
            k,
            equipment_type,
            rooms,
        } => {
            if rooms {
                let found = index.find_nearest_rooms(x, y, k);
                println!("{}", OutputFormatter::format_rooms(&found));
            } else {
                let found = match equipment_type {
                    Some(kind) => index.find_nearest_equipment_matching(x, y, k, |record| {
                        record.equipment_type.as_deref() == Some(kind.as_str())
                    }),
                    None => index.find_nearest_equipment(x, y, k),
                };
                println!("{}", OutputFormatter::format_equipment(&found));
            }
        }
        QueryCommand::Area {
            min_x,
            min_y,
            max_x,
            max_y,
            rooms,
        } => {
            if rooms {
                let found = index.find_rooms_in_area(min_x, min_y, max_x, max_y);
                println!("{}", OutputFormatter::format_rooms(&found));
            } else {
                let found = index.find_equipment_in_area(min_x, min_y, max_x, max_y);
                println!("{}", OutputFormatter::format_equipment(&found));
            }
        }
        QueryCommand::Adjacent { id, radius } => match index.find_adjacent_equipment(&id, radius) {
            Some(found) => println!("{}", OutputFormatter::format_equipment(&found)),
            None => {
                eprintln!(
                    "{}",
                    OutputFormatter::format_error(&format!("Unknown equipment id '{}'", id))
                );
                std::process::exit(1);
            }
        },
        QueryCommand::Stats => {
            println!("{}", OutputFormatter::format_statistics(&index.get_statistics()));
        }
        QueryCommand::Dump { tree } => {
            let json = match tree {
                TreeKind::Equipment => index.equipment_tree().export_to_json()?,
                TreeKind::Rooms => index.room_tree().export_to_json()?,
            };
            println!("{}", json);
        }
    }

    Ok(())
}

/// 初始化日志系统
fn init_logging(config: &bim_spatial::config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    match (config.output.as_str(), &config.log_file) {
        ("file", Some(log_file)) => {
            // 确保日志目录存在
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .map_err(|e| format!("Failed to open log file '{}': {}", log_file.display(), e))?;

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(file)
                        .with_ansi(false)
                        .with_target(false),
                )
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
        _ => {
            // 日志写到 stderr，保持 stdout 只有查询结果
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
    }

    Ok(())
}
