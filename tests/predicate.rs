#[cfg(test)]
mod tests {
    use quill::{
        Configuration, GenericDialect, GroupOperator, Operator, Parameters, Predicate, QueryError,
        SqlGenerator, Value, between, exists, field, group, property,
    };
    use quill_mssql::SqlServerDialect;
    use quill_sqlite::SqliteDialect;
    use quill_tests::{Animal, Car, Person};
    use std::sync::Arc;
    use uuid::Uuid;

    fn generator() -> SqlGenerator {
        SqlGenerator::new(Arc::new(Configuration::new(GenericDialect)))
    }

    fn render(predicate: &Predicate) -> (String, Parameters) {
        let mut parameters = Parameters::new();
        let sql = predicate
            .to_sql(&generator(), &mut parameters)
            .expect("Failed to render the predicate");
        (sql, parameters)
    }

    fn render_error(predicate: &Predicate) -> QueryError {
        let error = predicate
            .to_sql(&generator(), &mut Parameters::new())
            .expect_err("The predicate was expected to fail");
        error
            .downcast_ref::<QueryError>()
            .cloned()
            .unwrap_or_else(|| panic!("Not a QueryError: {error:#}"))
    }

    #[test]
    fn field_comparison() {
        {
            let (sql, parameters) = render(&field::<Person>("first_name", Operator::Eq, "Foo"));
            assert_eq!(sql, r#"("person"."first_name" = @first_name_0)"#);
            assert_eq!(
                parameters.get("first_name_0"),
                Some(&Value::Varchar("Foo".into()))
            );
        }
        {
            let (sql, _) = render(&!field::<Person>("first_name", Operator::Eq, "Foo"));
            assert_eq!(sql, r#"("person"."first_name" <> @first_name_0)"#);
        }
        {
            let (sql, _) = render(&!field::<Person>("last_name", Operator::Like, "B%"));
            assert_eq!(sql, r#"("person"."last_name" NOT LIKE @last_name_0)"#);
        }
        {
            let (sql, parameters) = render(&!!field::<Person>("age", Operator::Le, 40));
            assert_eq!(sql, r#"("person"."age" <= @age_0)"#);
            assert_eq!(parameters.get("age_0"), Some(&Value::Int32(40)));
        }
        {
            // Columns mapped under another name are referenced by column, bound by property
            let (sql, parameters) = render(&field::<Car>("name", Operator::Ge, "M"));
            assert_eq!(sql, r#"("garage"."cars"."car_name" >= @name_0)"#);
            assert_eq!(parameters.len(), 1);
        }
    }

    #[test]
    fn field_null() {
        let (sql, parameters) = render(&field::<Person>("age", Operator::Eq, Value::Null));
        assert_eq!(sql, r#"("person"."age" IS NULL)"#);
        assert!(parameters.is_empty());
        let (sql, _) = render(&!field::<Person>("age", Operator::Eq, None::<i32>));
        assert_eq!(sql, r#"("person"."age" IS NOT NULL)"#);
    }

    #[test]
    fn field_list() {
        {
            let (sql, parameters) = render(&field::<Person>("age", Operator::Eq, vec![18, 21, 30]));
            assert_eq!(sql, r#"("person"."age" IN (@age_0, @age_1, @age_2))"#);
            assert_eq!(parameters.get("age_2"), Some(&Value::Int32(30)));
        }
        {
            let (sql, _) = render(&!field::<Person>("age", Operator::Eq, vec![1]));
            assert_eq!(sql, r#"("person"."age" NOT IN (@age_0))"#);
        }
        {
            let (sql, parameters) = render(&field::<Person>("age", Operator::Eq, Vec::<i32>::new()));
            assert_eq!(sql, "(1=0)");
            assert!(parameters.is_empty());
            let (sql, _) = render(&!field::<Person>("age", Operator::Eq, Vec::<i32>::new()));
            assert_eq!(sql, "(1=1)");
        }
        assert_eq!(
            render_error(&field::<Person>("age", Operator::Gt, vec![18, 21])),
            QueryError::EnumerableOperator
        );
        assert!(matches!(
            render_error(&field::<Person>("nickname", Operator::Eq, Vec::<i32>::new())),
            QueryError::UnknownProperty { .. }
        ));
    }

    #[test]
    fn property_comparison() {
        let (sql, parameters) = render(&property::<Person, Person>(
            "first_name",
            Operator::Eq,
            "last_name",
        ));
        assert_eq!(sql, r#"("person"."first_name" = "person"."last_name")"#);
        assert!(parameters.is_empty());
        let (sql, _) = render(&!property::<Animal, Car>("name", Operator::Lt, "name"));
        assert_eq!(sql, r#"("animal"."name" >= "garage"."cars"."car_name")"#);
    }

    #[test]
    fn between_range() {
        let (sql, parameters) = render(&between::<Person>("age", 18, 65));
        assert_eq!(sql, r#"("person"."age" BETWEEN @age_0 AND @age_1)"#);
        assert_eq!(parameters.get("age_0"), Some(&Value::Int32(18)));
        assert_eq!(parameters.get("age_1"), Some(&Value::Int32(65)));
        let (sql, _) = render(&!between::<Person>("age", 18, 65));
        assert_eq!(sql, r#"("person"."age" NOT BETWEEN @age_0 AND @age_1)"#);
    }

    #[test]
    fn groups() {
        {
            let (sql, parameters) = render(&group(
                GroupOperator::And,
                [
                    field::<Person>("age", Operator::Gt, 18),
                    group(
                        GroupOperator::Or,
                        [
                            field::<Person>("age", Operator::Lt, 65),
                            field::<Person>("active", Operator::Eq, true),
                        ],
                    ),
                ],
            ));
            assert_eq!(
                sql,
                r#"(("person"."age" > @age_0) AND (("person"."age" < @age_1) OR ("person"."active" = @active_0)))"#
            );
            assert_eq!(parameters.len(), 3);
        }
        {
            // De Morgan
            let (sql, _) = render(&!group(
                GroupOperator::And,
                [
                    field::<Person>("age", Operator::Gt, 18),
                    field::<Person>("active", Operator::Eq, true),
                ],
            ));
            assert_eq!(
                sql,
                r#"(("person"."age" <= @age_0) OR ("person"."active" <> @active_0))"#
            );
        }
        {
            let empty = group(GroupOperator::Or, []);
            assert!(empty.is_empty());
            assert_eq!(render(&empty).0, "1=1");
            let nested = group(GroupOperator::And, [group(GroupOperator::Or, []), empty]);
            assert!(nested.is_empty());
            assert_eq!(render(&nested).0, "1=1");
            assert_eq!(render(&!nested).0, "1=1");
            assert!(!group(GroupOperator::And, [field::<Person>("age", Operator::Eq, 1)]).is_empty());
        }
        {
            // Empty sub groups never turn into an always true branch
            let predicate = group(
                GroupOperator::And,
                [
                    field::<Person>("age", Operator::Eq, 1),
                    group(GroupOperator::Or, []),
                ],
            );
            assert_eq!(render(&predicate).0, r#"(("person"."age" = @age_0))"#);
            assert_eq!(render(&!predicate).0, r#"(("person"."age" <> @age_0))"#);
            let predicate = !group(
                GroupOperator::Or,
                [
                    group(GroupOperator::And, [group(GroupOperator::Or, [])]),
                    field::<Person>("active", Operator::Eq, true),
                    field::<Person>("age", Operator::Gt, 18),
                ],
            );
            assert_eq!(
                render(&predicate).0,
                r#"(("person"."active" <> @active_0) AND ("person"."age" <= @age_0))"#
            );
        }
    }

    #[test]
    fn operator_inversion() {
        let table = [
            (Operator::Eq, "=", "<>"),
            (Operator::Gt, ">", "<="),
            (Operator::Ge, ">=", "<"),
            (Operator::Lt, "<", ">="),
            (Operator::Le, "<=", ">"),
            (Operator::Like, "LIKE", "NOT LIKE"),
        ];
        for (operator, plain, negated) in table {
            assert_eq!(operator.sql(false), plain);
            assert_eq!(operator.sql(true), negated);
            let (sql, _) = render(&field::<Person>("last_name", operator, "M"));
            assert_eq!(sql, format!(r#"("person"."last_name" {plain} @last_name_0)"#));
            let (sql, _) = render(&!field::<Person>("last_name", operator, "M"));
            assert_eq!(sql, format!(r#"("person"."last_name" {negated} @last_name_0)"#));
        }
    }

    #[test]
    fn exists_subquery() {
        let predicate = exists::<Animal>(group(
            GroupOperator::And,
            [
                property::<Animal, Person>("name", Operator::Eq, "first_name"),
                field::<Animal>("name", Operator::Like, "B%"),
            ],
        ));
        let (sql, parameters) = render(&predicate);
        assert_eq!(
            sql,
            r#"(EXISTS (SELECT 1 FROM "animal" WHERE (("animal"."name" = "person"."first_name") AND ("animal"."name" LIKE @name_0))))"#
        );
        assert_eq!(parameters.len(), 1);
        let (sql, _) = render(&!predicate);
        assert!(sql.starts_with(r#"(NOT EXISTS (SELECT 1 FROM "animal" WHERE (("animal"."name" = "#));
    }

    #[test]
    fn unmapped_properties() {
        assert_eq!(
            render_error(&field::<Person>("nickname", Operator::Eq, "x")),
            QueryError::UnknownProperty {
                entity: "person".into(),
                property: "nickname".into(),
            }
        );
        assert_eq!(
            render_error(&between::<Person>("full_name", "a", "b")),
            QueryError::IgnoredProperty {
                entity: "person".into(),
                property: "full_name".into(),
            }
        );
        assert!(matches!(
            render_error(&property::<Person, Car>("first_name", Operator::Eq, "car_name")),
            QueryError::UnknownProperty { .. }
        ));
    }

    #[test]
    fn dialect_quoting_and_binding() {
        let id = Uuid::new_v4();
        let predicate = group(
            GroupOperator::Or,
            [
                field::<Animal>("id", Operator::Eq, id),
                field::<Animal>("id", Operator::Eq, vec![id]),
            ],
        );
        {
            let generator = SqlGenerator::new(Arc::new(Configuration::new(SqliteDialect::new())));
            let mut parameters = Parameters::new();
            let sql = predicate.to_sql(&generator, &mut parameters).unwrap();
            assert_eq!(
                sql,
                r#"(("animal"."id" = @id_0) OR ("animal"."id" IN (@id_1)))"#
            );
            assert_eq!(parameters.get("id_0"), Some(&Value::Varchar(id.to_string())));
            assert_eq!(parameters.get("id_1"), Some(&Value::Varchar(id.to_string())));
        }
        {
            let generator = SqlGenerator::new(Arc::new(Configuration::new(SqlServerDialect::new())));
            let mut parameters = Parameters::new();
            let sql = predicate.to_sql(&generator, &mut parameters).unwrap();
            assert_eq!(sql, "(([animal].[id] = @id_0) OR ([animal].[id] IN (@id_1)))");
            assert_eq!(parameters.get("id_0"), Some(&Value::Uuid(id)));
        }
    }
}
