use quill_core::{ClassMap, Dialect, Value};

/// SQLite has no UUID type, they are stored as text.
#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn bind_value(&self, value: Value) -> Value {
        match value {
            Value::Uuid(v) => Value::Varchar(v.to_string()),
            Value::List(v) => Value::List(v.into_iter().map(|v| self.bind_value(v)).collect()),
            v => v,
        }
    }

    fn write_identity_sql(&self, out: &mut String, _map: &ClassMap) {
        out.push_str("SELECT LAST_INSERT_ROWID() AS ");
        self.write_identifier_quoted(out, "Id");
    }
}
