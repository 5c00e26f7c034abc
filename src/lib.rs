//! ORM 查询日志适配器
//!
//! 让任意 `log::Log` 后端承接 ORM 的 info/warn/error/trace 钩子：
//!
//! ```
//! use std::sync::Arc;
//! use std::time::{Duration, Instant};
//! use orm_query_logger::{Config, Context, LogLevel, OrmLogger, QueryLogger};
//!
//! struct Stdout;
//! impl log::Log for Stdout {
//!     fn enabled(&self, _: &log::Metadata) -> bool { true }
//!     fn log(&self, record: &log::Record) { println!("[{}] {}", record.level(), record.args()); }
//!     fn flush(&self) {}
//! }
//!
//! let logger = QueryLogger::new(
//!     Arc::new(Stdout),
//!     Config::default()
//!         .with_log_level(LogLevel::Warn)
//!         .with_slow_threshold(Duration::from_millis(200)),
//! );
//! logger.trace(
//!     &Context::background(),
//!     Instant::now(),
//!     &mut || ("SELECT 1".to_string(), 1),
//!     None,
//! );
//! ```
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod level;
pub mod logger;

pub use config::Config;
pub use context::Context;
pub use error::{Error, RecordNotFound, Result, is_record_not_found};
pub use level::LogLevel;
pub use logger::{OrmLogger, QueryLogger};
