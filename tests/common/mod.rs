//! 测试用的内存日志后端
#![allow(dead_code)]

use log::kv::{self, Key, Value, VisitSource};
use log::{Level, Log, Metadata, Record};
use orm_query_logger::{Config, QueryLogger};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// 捕获到的一条记录
#[derive(Debug, Clone)]
pub struct LogRow {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub fields: BTreeMap<String, String>,
}

impl LogRow {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// 把所有记录保存在内存中的后端
#[derive(Debug, Default)]
pub struct CaptureLog {
    rows: Mutex<Vec<LogRow>>,
}

impl CaptureLog {
    pub fn rows(&self) -> Vec<LogRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<LogRow> {
        std::mem::take(&mut *self.rows.lock().unwrap())
    }

    /// 期望恰好一条记录
    pub fn single(&self) -> LogRow {
        let rows = self.take();
        assert_eq!(rows.len(), 1, "expected exactly one record, got {rows:?}");
        rows.into_iter().next().unwrap()
    }
}

struct Collector<'a>(&'a mut BTreeMap<String, String>);

impl<'kvs> VisitSource<'kvs> for Collector<'_> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), kv::Error> {
        self.0.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl Log for CaptureLog {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut fields = BTreeMap::new();
        record
            .key_values()
            .visit(&mut Collector(&mut fields))
            .unwrap();

        self.rows.lock().unwrap().push(LogRow {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
            file: record.file().map(str::to_string),
            line: record.line(),
            fields,
        });
    }

    fn flush(&self) {}
}

/// 构造适配器与对应的捕获后端
pub fn setup_logger(config: Config) -> (Arc<CaptureLog>, QueryLogger) {
    let capture = Arc::new(CaptureLog::default());
    let logger = QueryLogger::new(capture.clone(), config);
    (capture, logger)
}
