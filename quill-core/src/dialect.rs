use crate::{ClassMap, Parameters, PropertyMap, QueryError, Result, Value};

/// The parts of a select that paging dialects rearrange.
#[derive(Debug, Clone, Copy)]
pub struct SelectParts<'a> {
    pub map: &'a ClassMap,
    /// Comma separated column list, already quoted.
    pub columns: &'a str,
    /// WHERE fragment, `None` when the select is unfiltered.
    pub condition: Option<&'a str>,
    /// ORDER BY terms, empty when the select is unordered.
    pub order_by: &'a str,
}

/// Per database syntax used by the generator.
///
/// Every method has a default producing PostgreSQL-like SQL, a database overrides only what
/// it does differently.
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    fn open_quote(&self) -> char {
        '"'
    }

    fn close_quote(&self) -> char {
        '"'
    }

    fn parameter_prefix(&self) -> char {
        '@'
    }

    /// Separator of the statements of a batch.
    fn batch_separator(&self) -> &'static str {
        ";\n"
    }

    /// Whether several statements can be sent in one round trip, returning several result sets.
    fn supports_multiple_statements(&self) -> bool {
        true
    }

    /// Always true condition.
    fn empty_expression(&self) -> &'static str {
        "1=1"
    }

    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        let close = self.close_quote();
        let doubled: String = [close, close].iter().collect();
        out.push(self.open_quote());
        self.write_escaped(out, value, close, &doubled);
        out.push(close);
    }

    fn write_table_name(&self, out: &mut String, map: &ClassMap) {
        if let Some(schema) = &map.schema_name {
            self.write_identifier_quoted(out, schema);
            out.push('.');
        }
        self.write_identifier_quoted(out, &map.table_name);
    }

    /// Column of `property`, qualified by the table when `map` is given.
    ///
    /// With `alias` the column is followed by `AS "Name"` if its name differs from the property
    /// name, so that result columns are labeled like the properties.
    fn write_column_name(
        &self,
        out: &mut String,
        map: Option<&ClassMap>,
        property: &PropertyMap,
        alias: bool,
    ) {
        if let Some(map) = map {
            self.write_table_name(out, map);
            out.push('.');
        }
        self.write_identifier_quoted(out, &property.column_name);
        if alias && property.column_name != property.name {
            out.push_str(" AS ");
            self.write_identifier_quoted(out, &property.name);
        }
    }

    /// Adjust a value before it is bound, for databases lacking a native representation.
    fn bind_value(&self, value: Value) -> Value {
        value
    }

    /// Bind `value` under a fresh name derived from `base` and write the placeholder.
    fn write_parameter(&self, out: &mut String, parameters: &mut Parameters, base: &str, value: Value) {
        let name = parameters.bind(base, self.bind_value(value));
        out.push(self.parameter_prefix());
        out.push_str(&name);
    }

    /// Query returning the last identity generated on the connection, labeled `Id`.
    fn write_identity_sql(&self, out: &mut String, _map: &ClassMap) {
        out.push_str("SELECT LASTVAL() AS ");
        self.write_identifier_quoted(out, "Id");
    }

    /// Tail of an INSERT without any column, every column takes its default.
    fn write_insert_default_values(&self, out: &mut String) {
        out.push_str(" DEFAULT VALUES");
    }

    fn write_select(&self, out: &mut String, parts: &SelectParts) {
        out.push_str("SELECT ");
        out.push_str(parts.columns);
        out.push_str(" FROM ");
        self.write_table_name(out, parts.map);
        if let Some(condition) = parts.condition {
            out.push_str(" WHERE ");
            out.push_str(condition);
        }
        if !parts.order_by.is_empty() {
            out.push_str(" ORDER BY ");
            out.push_str(parts.order_by);
        }
    }

    /// Select the 1-based `page` of `results_per_page` rows.
    fn write_paged_select(
        &self,
        out: &mut String,
        parts: &SelectParts,
        page: u64,
        results_per_page: u64,
        parameters: &mut Parameters,
    ) -> Result<()> {
        let skip = page
            .checked_sub(1)
            .and_then(|v| v.checked_mul(results_per_page))
            .ok_or_else(|| {
                QueryError::InvalidPaging(format!(
                    "page {page} of {results_per_page} rows is out of range"
                ))
            })?;
        self.write_set_select(out, parts, skip, results_per_page, parameters)
    }

    /// Select at most `max_results` rows after skipping the first `first_result` rows.
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
        self.write_parameter(out, parameters, "_take", window_value(max_results)?);
        out.push_str(" OFFSET ");
        self.write_parameter(out, parameters, "_skip", window_value(first_result)?);
        Ok(())
    }
}

/// Paging bounds are bound as signed 64 bits integers.
pub fn window_value(value: u64) -> Result<Value> {
    i64::try_from(value)
        .map(Value::Int64)
        .map_err(|_| QueryError::InvalidPaging(format!("{value} does not fit a BIGINT")).into())
}

/// Dialect of databases following the standard closely, PostgreSQL syntax where it does not.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericDialect;

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}
