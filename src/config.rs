use crate::constants::{DEFAULT_MODULE_NAME, RESERVED_KEYS};
use crate::error::{ConfigError, Error, Result};
use crate::level::LogLevel;
use serde::{Deserialize, Deserializer};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 适配器配置
///
/// 构造后不再变化；`QueryLogger::log_mode` 只会复制一份并替换级别。
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 慢查询阈值，零表示不检测。配置文件中以毫秒给出
    #[serde(rename = "slow_threshold_ms", deserialize_with = "deserialize_millis")]
    pub slow_threshold: Duration,
    /// 最低日志级别，未设置时为 Info
    pub log_level: Option<LogLevel>,
    /// 为 true 时，RecordNotFound 不按错误记录
    pub skip_err_record_not_found: bool,
    /// 记录调用位置（file:line）的字段名，未设置则不记录；与保留字段同名时忽略
    pub source_field: Option<String>,
    /// 附加到每条记录上的模块名，为空时使用默认值
    pub module_name: String,
}

fn deserialize_millis<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

impl Config {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::Config(ConfigError::NotFound(path.to_path_buf())),
            _ => Error::Io(e),
        })?;
        Self::from_str(&content, path.to_path_buf())
    }

    /// 从字符串解析配置
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str, path: PathBuf) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| {
            Error::Config(ConfigError::ParseFailed {
                path,
                reason: e.to_string(),
            })
        })?;

        config.validate()?;

        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if let Some(field) = &self.source_field {
            if field.trim().is_empty() {
                return Err(crate::config_error!(InvalidValue {
                    field: "source_field".to_string(),
                    value: field.clone(),
                    reason: "Source field name cannot be blank".to_string(),
                }));
            }
            if RESERVED_KEYS.contains(&field.as_str()) {
                return Err(crate::config_error!(InvalidValue {
                    field: "source_field".to_string(),
                    value: field.clone(),
                    reason: format!("Reserved field names: {}", RESERVED_KEYS.join(", ")),
                }));
            }
        }

        if !self.module_name.is_empty() && self.module_name.trim().is_empty() {
            return Err(crate::config_error!(InvalidValue {
                field: "module_name".to_string(),
                value: self.module_name.clone(),
                reason: "Module name cannot be only whitespace".to_string(),
            }));
        }

        Ok(())
    }

    /// 填充默认值：模块名为空时使用 `DEFAULT_MODULE_NAME`，级别未设置时为 Info
    #[must_use]
    pub fn resolved(mut self) -> Self {
        if self.module_name.is_empty() {
            self.module_name = DEFAULT_MODULE_NAME.to_string();
        }
        if self.log_level.is_none() {
            self.log_level = Some(LogLevel::Info);
        }
        self
    }

    /// 生效的日志级别
    pub fn level(&self) -> LogLevel {
        self.log_level.unwrap_or(LogLevel::Info)
    }

    /// 生效的模块名
    pub fn module_name(&self) -> &str {
        if self.module_name.is_empty() {
            DEFAULT_MODULE_NAME
        } else {
            &self.module_name
        }
    }

    pub fn source_field(&self) -> Option<&str> {
        self.source_field.as_deref()
    }

    #[must_use]
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    #[must_use]
    pub fn with_skip_err_record_not_found(mut self, skip: bool) -> Self {
        self.skip_err_record_not_found = skip;
        self
    }

    #[must_use]
    pub fn with_source_field(mut self, field: impl Into<String>) -> Self {
        self.source_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }
}
