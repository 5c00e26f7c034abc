/// 调用上下文
///
/// 只用于丰富日志记录：每个键值对都会作为字段附加到该次调用产生的记录上，
/// 不参与任何执行控制（没有取消、超时语义）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    fields: Vec<(String, String)>,
}

impl Context {
    /// 空上下文
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// 追加一个字段，同名字段以后写入的为准
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
