#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quill_core::{Configuration, Dialect, Entity, Parameters, SqlGenerator, Value, sort};
    use quill_postgres::PostgresDialect;
    use quill_tests::{Person, Ticket, execute_tests, init_logs};
    use std::sync::Arc;

    const DIALECT: PostgresDialect = PostgresDialect::new();

    #[tokio::test]
    async fn postgres() {
        init_logs();
        execute_tests(DIALECT).await;
    }

    #[test]
    fn statements() {
        let generator = SqlGenerator::new(Arc::new(Configuration::new(DIALECT)));
        assert_eq!(DIALECT.name(), "postgres");
        assert_eq!(
            &*generator.identity(Person::entity_type()).unwrap(),
            r#"SELECT LASTVAL() AS "Id""#
        );
        assert_eq!(
            &*generator.insert(Ticket::entity_type()).unwrap(),
            r#"INSERT INTO "ticket" DEFAULT VALUES"#
        );
        let mut parameters = Parameters::new();
        let sql = generator
            .select_paged(
                Ticket::entity_type(),
                None,
                &[sort::<Ticket>("ticket_id", false)],
                1,
                20,
                &mut parameters,
            )
            .unwrap();
        assert_eq!(
            sql,
            indoc! {r#"
                SELECT "ticket"."ticket_id" FROM "ticket"
                 ORDER BY "ticket"."ticket_id" DESC
                 LIMIT @_take_0 OFFSET @_skip_0
            "#}
            .trim()
            .replace('\n', "")
        );
        assert_eq!(parameters.get("_skip_0"), Some(&Value::Int64(0)));
    }

    #[test]
    fn quoting() {
        let mut out = String::new();
        DIALECT.write_identifier_quoted(&mut out, r#"odd"name"#);
        assert_eq!(out, r#""odd""name""#);
    }
}
