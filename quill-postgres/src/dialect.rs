use quill_core::Dialect;

/// Uses every default: double quoted identifiers, `LIMIT/OFFSET` and `LASTVAL()`.
#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }
}
