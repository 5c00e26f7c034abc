use crate::constants::LOG_LEVELS;
use crate::error::ConfigError;
use log::LevelFilter;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// ORM 日志级别
///
/// 顺序为 `Silent < Error < Warn < Info`：配置的级别越高，放行的记录越多。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Silent = 1,
    Error,
    Warn,
    Info,
}

// 缓存级别名称映射表，避免每次解析时重新构建
static LOG_LEVEL_MAP: LazyLock<HashMap<&'static str, LogLevel>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("silent", LogLevel::Silent);
    map.insert("error", LogLevel::Error);
    map.insert("warn", LogLevel::Warn);
    map.insert("info", LogLevel::Info);
    map
});

impl LogLevel {
    /// 当前配置是否放行 `op` 级别的记录
    #[must_use]
    pub fn permits(self, op: LogLevel) -> bool {
        op != LogLevel::Silent && self >= op
    }

    /// 对应的 `log` 过滤级别，便于调用方让后端与适配器保持一致
    #[must_use]
    pub fn as_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Silent => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Silent => "silent",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        LOG_LEVEL_MAP
            .get(lower.as_str())
            .copied()
            .ok_or_else(|| ConfigError::InvalidLogLevel {
                level: s.to_string(),
                valid_levels: LOG_LEVELS.iter().map(|s| (*s).to_string()).collect(),
            })
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(LogLevel::Silent < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
    }

    #[test]
    fn test_permits_matrix() {
        let ops = [LogLevel::Error, LogLevel::Warn, LogLevel::Info];
        let configured = [
            LogLevel::Silent,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
        ];
        for level in configured {
            for op in ops {
                assert_eq!(level.permits(op), op <= level, "{level} vs {op}");
            }
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" Silent ".parse::<LogLevel>().unwrap(), LogLevel::Silent);
    }

    #[test]
    fn test_parse_invalid() {
        let err = "verbose".parse::<LogLevel>().unwrap_err();
        assert!(err.to_string().contains("verbose"));
        assert!(err.to_string().contains("silent, error, warn, info"));
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(LogLevel::Silent.as_level_filter(), LevelFilter::Off);
        assert_eq!(LogLevel::Info.as_level_filter(), LevelFilter::Info);
    }
}
