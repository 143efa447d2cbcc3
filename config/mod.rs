use crate::rtree::{DEFAULT_MAX_ITEMS, MIN_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 空间索引配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// 树容量配置
    #[serde(default)]
    pub index: TreeCapacityConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 两棵树的节点容量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeCapacityConfig {
    /// 设备树节点最大条目数
    #[serde(default = "default_max_items")]
    pub equipment_max_items: usize,

    /// 房间树节点最大条目数
    #[serde(default = "default_max_items")]
    pub room_max_items: usize,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 日志输出：stdout, file
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志文件路径（当 output = file 时）
    pub log_file: Option<PathBuf>,
}

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stdout".to_string()
}

impl Default for TreeCapacityConfig {
    fn default() -> Self {
        Self {
            equipment_max_items: default_max_items(),
            room_max_items: default_max_items(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: default_log_output(),
            log_file: None,
        }
    }
}

impl IndexConfig {
    /// 从文件加载配置
    ///
    /// 配置加载顺序（优先级从低到高）：
    /// 1. 默认配置（内嵌的 default.toml）
    /// 2. 用户配置文件（可选，不存在时忽略）
    /// 3. 环境变量（BIM_SPATIAL__ 前缀，双下划线分隔嵌套，如 `BIM_SPATIAL__INDEX__ROOM_MAX_ITEMS=16`）
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use bim_spatial::config::IndexConfig;
    ///
    /// let config = IndexConfig::from_file("bim-spatial.toml").unwrap();
    /// ```
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from_str(
                include_str!("default.toml"),
                ::config::FileFormat::Toml,
            ))
            .add_source(::config::File::with_name(path).required(false))
            .add_source(::config::Environment::with_prefix("BIM_SPATIAL").separator("__"))
            .build()
            .map_err(|e| format!("Failed to load config: {}", e))?;

        Ok(settings
            .try_deserialize()
            .map_err(|e| format!("Failed to parse config: {}", e))?)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, toml_string)
            .map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// 验证配置
    ///
    /// 检查节点容量下限、日志级别、日志输出方式以及文件输出的路径。
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("equipment_max_items", self.index.equipment_max_items),
            ("room_max_items", self.index.room_max_items),
        ] {
            if value < MIN_CAPACITY {
                return Err(format!(
                    "index.{} is {}, must be at least {}",
                    name, value, MIN_CAPACITY
                ));
            }
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ))
            }
        }

        match self.logging.output.as_str() {
            "stdout" => {}
            "file" => {
                if self.logging.log_file.is_none() {
                    return Err("Log output is 'file' but log_file path is not specified".to_string());
                }
            }
            other => {
                return Err(format!(
                    "Invalid log output: '{}'. Must be one of: stdout, file",
                    other
                ))
            }
        }

        Ok(())
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        println!("📋 BIM Spatial Index Configuration:");
        println!("   Equipment Node Capacity: {}", self.index.equipment_max_items);
        println!("   Room Node Capacity:      {}", self.index.room_max_items);
        println!();
        println!("   Log Level:   {}", self.logging.level);
        println!("   Log Output:  {}", self.logging.output);
        if let Some(ref log_file) = self.logging.log_file {
            println!("   Log File:    {}", log_file.display());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert_eq!(config.index.equipment_max_items, 10);
        assert_eq!(config.index.room_max_items, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.output, "stdout");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        let parsed: IndexConfig = toml::from_str(include_str!("default.toml")).unwrap();
        assert_eq!(parsed, IndexConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = IndexConfig::default();

        // 容量过小
        config.index.room_max_items = 3;
        assert!(config.validate().unwrap_err().contains("room_max_items"));
        config.index.room_max_items = 4;
        assert!(config.validate().is_ok());

        // 无效日志级别
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
        config.logging.level = "debug".to_string();

        // 文件输出缺少路径
        config.logging.output = "file".to_string();
        assert!(config.validate().is_err());
        config.logging.log_file = Some(PathBuf::from("bim-spatial.log"));
        assert!(config.validate().is_ok());

        config.logging.output = "syslog".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: IndexConfig = toml::from_str("[index]\nroom_max_items = 32\n").unwrap();
        assert_eq!(parsed.index.room_max_items, 32);
        assert_eq!(parsed.index.equipment_max_items, 10);
        assert_eq!(parsed.logging, LoggingConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        use tempfile::Builder;

        let mut config = IndexConfig::default();
        config.index.equipment_max_items = 16;
        config.logging.level = "warn".to_string();

        let temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
        let path = temp_file.path().to_str().unwrap();

        config.save_to_file(path).unwrap();

        let loaded = IndexConfig::from_file(path).unwrap();
        assert_eq!(loaded.index.equipment_max_items, 16);
        assert_eq!(loaded.index.room_max_items, 10);
        assert_eq!(loaded.logging.level, "warn");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let loaded = IndexConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.index, TreeCapacityConfig::default());
    }
}
