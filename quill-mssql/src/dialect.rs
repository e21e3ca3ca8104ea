use quill_core::{ClassMap, Dialect, Parameters, Result, SelectParts, window_value};

/// How SQL Server windows a paged select.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlServerPaging {
    /// `ORDER BY ... OFFSET n ROWS FETCH NEXT m ROWS ONLY`, SQL Server 2012 and later.
    #[default]
    OffsetFetch,
    /// `ROW_NUMBER() OVER(ORDER BY ...)` in a derived table, for older servers.
    RowNumber,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct SqlServerDialect {
    pub paging: SqlServerPaging,
}

impl SqlServerDialect {
    pub const fn new() -> Self {
        Self {
            paging: SqlServerPaging::OffsetFetch,
        }
    }

    pub const fn with_row_number() -> Self {
        Self {
            paging: SqlServerPaging::RowNumber,
        }
    }
}

impl Dialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn open_quote(&self) -> char {
        '['
    }

    fn close_quote(&self) -> char {
        ']'
    }

    fn write_identity_sql(&self, out: &mut String, _map: &ClassMap) {
        out.push_str("SELECT CAST(SCOPE_IDENTITY() AS BIGINT) AS ");
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
        match self.paging {
            SqlServerPaging::OffsetFetch => {
                self.write_select(out, parts);
                out.push_str(" OFFSET ");
                self.write_parameter(out, parameters, "_skip", window_value(first_result)?);
                out.push_str(" ROWS FETCH NEXT ");
                self.write_parameter(out, parameters, "_take", window_value(max_results)?);
                out.push_str(" ROWS ONLY");
            }
            SqlServerPaging::RowNumber => {
                out.push_str("SELECT TOP(");
                self.write_parameter(out, parameters, "_take", window_value(max_results)?);
                out.push_str(") [_proj].* FROM (SELECT ROW_NUMBER() OVER(ORDER BY ");
                out.push_str(parts.order_by);
                out.push_str(") AS [_row_number], ");
                out.push_str(parts.columns);
                out.push_str(" FROM ");
                self.write_table_name(out, parts.map);
                if let Some(condition) = parts.condition {
                    out.push_str(" WHERE ");
                    out.push_str(condition);
                }
                out.push_str(") [_proj] WHERE [_proj].[_row_number] > ");
                self.write_parameter(out, parameters, "_skip", window_value(first_result)?);
                out.push_str(" ORDER BY [_proj].[_row_number]");
            }
        }
        Ok(())
    }
}
