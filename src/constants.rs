//! 公共常量
//! 提供：
//! - 合法日志级别常量 LOG_LEVELS
//! - 记录字段名与默认模块名

/// 合法的日志级别（统一来源）
pub const LOG_LEVELS: &[&str] = &["silent", "error", "warn", "info"];

/// 未配置模块名时使用的默认值
pub const DEFAULT_MODULE_NAME: &str = "orm";

/// 模块名字段
pub const MODULE_KEY: &str = "module";

/// 错误信息字段
pub const ERROR_KEY: &str = "error";

/// info/warn/error 附加参数字段
pub const DATA_KEY: &str = "data";

/// 不能用作 source_field 的字段名
pub const RESERVED_KEYS: &[&str] = &[MODULE_KEY, ERROR_KEY, DATA_KEY];

/// 行数未知时的占位符
pub const UNKNOWN_ROWS: &str = "-";

/// 慢查询标记前缀
pub const SLOW_SQL_MARKER: &str = "SLOW SQL";
