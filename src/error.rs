use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 库错误类型
///
/// 只有配置加载会返回错误；适配器的日志操作本身从不失败。
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration related error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Configuration file parse failed
    #[error("Failed to parse configuration file {path}: {reason}")]
    ParseFailed { path: PathBuf, reason: String },

    /// Invalid log level
    #[error("Invalid log level '{level}', valid values: {}", valid_levels.join(", "))]
    InvalidLogLevel {
        level: String,
        valid_levels: Vec<String>,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value {field} = '{value}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// 查询没有返回任何行
///
/// ORM 在“按条件取一条记录却没有命中”时应返回（或包装）这个值，
/// 适配器据此决定是否把它当作错误记录。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
#[error("record not found")]
pub struct RecordNotFound;

/// 判断错误（或其 source 链上的任一环节）是否为 [`RecordNotFound`]
pub fn is_record_not_found(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.downcast_ref::<RecordNotFound>().is_some() {
            return true;
        }
        current = e.source();
    }
    false
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, Error>;

// 辅助宏，用于快速创建配置错误
#[macro_export]
macro_rules! config_error {
    ($variant:ident { $($field:ident: $value:expr),+ $(,)? }) => {
        $crate::error::Error::Config($crate::error::ConfigError::$variant {
            $($field: $value),+
        })
    };
}
