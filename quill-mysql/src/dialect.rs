use quill_core::{ClassMap, Dialect, Parameters, Result, SelectParts, Value, window_value};

#[derive(Default, Debug, Clone, Copy)]
pub struct MySqlDialect;

impl MySqlDialect {
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn open_quote(&self) -> char {
        '`'
    }

    fn close_quote(&self) -> char {
        '`'
    }

    // Multiple statements are disabled by default on MySQL connections
    fn supports_multiple_statements(&self) -> bool {
        false
    }

    fn bind_value(&self, value: Value) -> Value {
        match value {
            Value::Uuid(v) => Value::Varchar(v.to_string()),
            Value::List(v) => Value::List(v.into_iter().map(|v| self.bind_value(v)).collect()),
            v => v,
        }
    }

    fn write_insert_default_values(&self, out: &mut String) {
        out.push_str(" () VALUES ()");
    }

    fn write_identity_sql(&self, out: &mut String, _map: &ClassMap) {
        out.push_str("SELECT CONVERT(LAST_INSERT_ID(), SIGNED INTEGER) AS ");
        self.write_identifier_quoted(out, "Id");
    }

    fn write_set_select(
        &self,
        out: &mut String,
        parts: &SelectParts,
        first_result: u64,
        max_results: u64,
        parameters: &mut Parameters,
    ) -> Result<()> {
        self.write_select(out, parts);
        out.push_str(" LIMIT ");
        self.write_parameter(out, parameters, "_skip", window_value(first_result)?);
        out.push_str(", ");
        self.write_parameter(out, parameters, "_take", window_value(max_results)?);
        Ok(())
    }
}
