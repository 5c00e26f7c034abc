/// ORM 日志适配器
/// 把 ORM 的 info/warn/error/trace 钩子转换为 `log::Record`，交给调用方注入的后端
use crate::config::Config;
use crate::constants::{
    DATA_KEY, ERROR_KEY, MODULE_KEY, RESERVED_KEYS, SLOW_SQL_MARKER, UNKNOWN_ROWS,
};
use crate::context::Context;
use crate::error::is_record_not_found;
use crate::level::LogLevel;
use log::kv::{self, Key, Source, Value, VisitSource};
use log::{Level, Log, Metadata, Record};
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// ORM 侧要求的日志接口
///
/// 实现必须可以在多个线程间共享：同一个实例会被并发的查询同时调用。
pub trait OrmLogger: Send + Sync {
    /// 返回只替换了级别的新实例，不修改 `self`
    fn log_mode(&self, level: LogLevel) -> Arc<dyn OrmLogger>;

    #[track_caller]
    fn info(&self, ctx: &Context, msg: &str, args: &[&dyn fmt::Debug]);

    #[track_caller]
    fn warn(&self, ctx: &Context, msg: &str, args: &[&dyn fmt::Debug]);

    #[track_caller]
    fn error(&self, ctx: &Context, msg: &str, args: &[&dyn fmt::Debug]);

    /// 每条查询完成后调用一次
    ///
    /// `fc` 返回 SQL 文本与影响行数（-1 表示未知），级别非 Silent 时恰好调用一次。
    #[track_caller]
    fn trace(
        &self,
        ctx: &Context,
        begin: Instant,
        fc: &mut dyn FnMut() -> (String, i64),
        err: Option<&(dyn StdError + 'static)>,
    );
}

/// 以 `log::Log` 为后端的 ORM 日志适配器
#[derive(Clone)]
pub struct QueryLogger {
    log: Arc<dyn Log>,
    config: Config,
}

impl fmt::Debug for QueryLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryLogger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QueryLogger {
    /// 创建适配器，模块名与级别按默认值补齐
    pub fn new(log: Arc<dyn Log>, config: Config) -> Self {
        Self {
            log,
            config: config.resolved(),
        }
    }

    /// 共享同一后端、仅级别不同的新实例
    #[must_use]
    pub fn with_level(&self, level: LogLevel) -> Self {
        let mut config = self.config.clone();
        config.log_level = Some(level);
        Self {
            log: Arc::clone(&self.log),
            config,
        }
    }

    /// 底层日志后端
    pub fn logger(&self) -> &Arc<dyn Log> {
        &self.log
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn level(&self) -> LogLevel {
        self.config.level()
    }

    /// 模块名与上下文字段；上下文中与保留字段同名的键被丢弃
    fn base_fields(&self, ctx: &Context) -> Fields {
        let mut fields = Fields::default();
        fields.insert(MODULE_KEY, self.config.module_name());
        for (k, v) in ctx.fields().filter(|(k, _)| !is_reserved(k)) {
            fields.insert(k, v);
        }
        fields
    }

    /// 生效的调用位置字段名，与保留字段冲突时不记录
    fn source_key(&self) -> Option<&str> {
        self.config.source_field().filter(|k| !is_reserved(k))
    }

    fn leveled(
        &self,
        op: LogLevel,
        level: Level,
        ctx: &Context,
        msg: &str,
        args: &[&dyn fmt::Debug],
        location: &'static Location<'static>,
    ) {
        if !self.level().permits(op) {
            return;
        }

        let mut fields = self.base_fields(ctx);
        if !args.is_empty() {
            fields.insert(DATA_KEY, format!("{args:?}"));
        }
        self.emit(level, &fields, location, format_args!("{msg}"));
    }

    fn emit(
        &self,
        level: Level,
        fields: &Fields,
        location: &'static Location<'static>,
        args: fmt::Arguments<'_>,
    ) {
        let metadata = Metadata::builder()
            .level(level)
            .target(self.config.module_name())
            .build();
        if !self.log.enabled(&metadata) {
            return;
        }

        self.log.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .module_path_static(Some(module_path!()))
                .file(Some(location.file()))
                .line(Some(location.line()))
                .key_values(fields)
                .build(),
        );
    }
}

impl OrmLogger for QueryLogger {
    fn log_mode(&self, level: LogLevel) -> Arc<dyn OrmLogger> {
        Arc::new(self.with_level(level))
    }

    #[track_caller]
    fn info(&self, ctx: &Context, msg: &str, args: &[&dyn fmt::Debug]) {
        self.leveled(LogLevel::Info, Level::Info, ctx, msg, args, Location::caller());
    }

    #[track_caller]
    fn warn(&self, ctx: &Context, msg: &str, args: &[&dyn fmt::Debug]) {
        self.leveled(LogLevel::Warn, Level::Warn, ctx, msg, args, Location::caller());
    }

    #[track_caller]
    fn error(&self, ctx: &Context, msg: &str, args: &[&dyn fmt::Debug]) {
        self.leveled(LogLevel::Error, Level::Error, ctx, msg, args, Location::caller());
    }

    #[track_caller]
    fn trace(
        &self,
        ctx: &Context,
        begin: Instant,
        fc: &mut dyn FnMut() -> (String, i64),
        err: Option<&(dyn StdError + 'static)>,
    ) {
        let current = self.level();
        if current == LogLevel::Silent {
            return;
        }

        let location = Location::caller();
        let elapsed = begin.elapsed();
        let (sql, rows) = fc();
        let ms = elapsed_millis(elapsed);
        let rows = format_rows(rows);

        let mut fields = self.base_fields(ctx);
        if let Some(key) = self.source_key() {
            fields.insert(key, format!("{}:{}", location.file(), location.line()));
        }

        let threshold = self.config.slow_threshold;
        let reportable = err.filter(|e| {
            current.permits(LogLevel::Error)
                && !(self.config.skip_err_record_not_found && is_record_not_found(*e))
        });

        if let Some(e) = reportable {
            fields.insert(ERROR_KEY, e.to_string());
            self.emit(
                Level::Error,
                &fields,
                location,
                format_args!("{sql}\n[{ms:.3}ms] [rows:{rows}]"),
            );
        } else if !threshold.is_zero() && elapsed > threshold && current.permits(LogLevel::Warn) {
            self.emit(
                Level::Warn,
                &fields,
                location,
                format_args!("{sql} {SLOW_SQL_MARKER} >= {threshold:?}\n[{ms:.3}ms] [rows:{rows}]"),
            );
        } else if current == LogLevel::Info {
            self.emit(
                Level::Info,
                &fields,
                location,
                format_args!("{sql}\n[{ms:.3}ms] [rows:{rows}]"),
            );
        } else {
            self.emit(
                Level::Debug,
                &fields,
                location,
                format_args!("{sql}\n[{ms:.3}ms] [rows:{rows}]"),
            );
        }
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// 耗时（毫秒，保留小数部分）
#[allow(clippy::cast_precision_loss)]
fn elapsed_millis(elapsed: Duration) -> f64 {
    elapsed.as_nanos() as f64 / 1e6
}

/// 行数渲染，-1 表示未知
fn format_rows(rows: i64) -> String {
    if rows == -1 {
        UNKNOWN_ROWS.to_string()
    } else {
        rows.to_string()
    }
}

/// 单条记录的字段集合，键唯一，后写入的覆盖先写入的
#[derive(Debug, Default)]
struct Fields(Vec<(String, String)>);

impl Fields {
    fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }
}

impl Source for Fields {
    fn visit<'kvs>(&'kvs self, visitor: &mut dyn VisitSource<'kvs>) -> Result<(), kv::Error> {
        for (k, v) in &self.0 {
            visitor.visit_pair(Key::from_str(k), Value::from(v.as_str()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rows_unknown() {
        assert_eq!(format_rows(-1), "-");
        assert_eq!(format_rows(0), "0");
        assert_eq!(format_rows(1_000_000), "1000000");
    }

    #[test]
    fn test_elapsed_millis() {
        let ms = elapsed_millis(Duration::from_micros(1_500));
        assert!((ms - 1.5).abs() < f64::EPSILON);
        assert_eq!(format!("{ms:.3}"), "1.500");
    }

    #[test]
    fn test_fields_override() {
        let mut fields = Fields::default();
        fields.insert("module", "a");
        fields.insert("module", "b");
        fields.insert("error", "boom");
        assert_eq!(fields.0.len(), 2);
        assert_eq!(fields.0[0], ("module".to_string(), "b".to_string()));
    }

    #[test]
    fn test_debug_hides_backend() {
        struct Nop;
        impl Log for Nop {
            fn enabled(&self, _: &Metadata) -> bool {
                true
            }
            fn log(&self, _: &Record) {}
            fn flush(&self) {}
        }

        let logger = QueryLogger::new(Arc::new(Nop), Config::default());
        let rendered = format!("{logger:?}");
        assert!(rendered.starts_with("QueryLogger"));
        assert!(rendered.contains("orm"));
    }
}
