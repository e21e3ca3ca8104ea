#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quill::{
        Configuration, Entity, GenericDialect, GetMultiplePredicate, GroupOperator, Operator, Paging,
        Parameters, QueryError, SqlGenerator, Value, field, group, sort,
    };
    use quill_tests::{Animal, Car, Multikey, Person, Ticket};
    use std::sync::Arc;

    const PERSON_COLUMNS: &str = r#""person"."id", "person"."first_name", "person"."last_name", "person"."age", "person"."active", "person"."date_created""#;

    fn generator() -> SqlGenerator {
        SqlGenerator::new(Arc::new(Configuration::new(GenericDialect)))
    }

    fn query_error(error: quill::Error) -> QueryError {
        error
            .downcast_ref::<QueryError>()
            .cloned()
            .unwrap_or_else(|| panic!("Not a QueryError: {error:#}"))
    }

    #[test]
    fn select() {
        let generator = generator();
        {
            let mut parameters = Parameters::new();
            let sql = generator
                .select(Person::entity_type(), None, &[], &mut parameters)
                .unwrap();
            assert_eq!(sql, format!(r#"SELECT {PERSON_COLUMNS} FROM "person""#));
            assert!(parameters.is_empty());
        }
        {
            let mut parameters = Parameters::new();
            let sql = generator
                .select(
                    Person::entity_type(),
                    Some(&field::<Person>("age", Operator::Gt, 18)),
                    &[
                        sort::<Person>("last_name", true),
                        sort::<Person>("first_name", false),
                    ],
                    &mut parameters,
                )
                .unwrap();
            assert_eq!(
                sql,
                format!(
                    r#"SELECT {PERSON_COLUMNS} FROM "person" WHERE ("person"."age" > @age_0) ORDER BY "person"."last_name" ASC, "person"."first_name" DESC"#
                )
            );
            assert_eq!(parameters.get("age_0"), Some(&Value::Int32(18)));
        }
        {
            let mut parameters = Parameters::new();
            let sql = generator
                .select(Car::entity_type(), None, &[sort::<Car>("name", true)], &mut parameters)
                .unwrap();
            assert_eq!(
                sql,
                r#"SELECT "garage"."cars"."car_id" AS "id", "garage"."cars"."car_name" AS "name", "garage"."cars"."mileage" FROM "garage"."cars" ORDER BY "garage"."cars"."car_name" ASC"#
            );
        }
        {
            let error = generator
                .select(
                    Person::entity_type(),
                    None,
                    &[sort::<Person>("full_name", true)],
                    &mut Parameters::new(),
                )
                .unwrap_err();
            assert!(matches!(query_error(error), QueryError::IgnoredProperty { .. }));
        }
    }

    #[test]
    fn select_windows() {
        let generator = generator();
        let by_name = [sort::<Person>("last_name", true)];
        {
            let mut parameters = Parameters::new();
            let sql = generator
                .select_paged(Person::entity_type(), None, &by_name, 3, 25, &mut parameters)
                .unwrap();
            assert_eq!(
                sql,
                format!(
                    r#"SELECT {PERSON_COLUMNS} FROM "person" ORDER BY "person"."last_name" ASC LIMIT @_take_0 OFFSET @_skip_0"#
                )
            );
            assert_eq!(parameters.get("_skip_0"), Some(&Value::Int64(50)));
            assert_eq!(parameters.get("_take_0"), Some(&Value::Int64(25)));
        }
        {
            let mut parameters = Parameters::new();
            generator
                .select_set(
                    Person::entity_type(),
                    Some(&field::<Person>("active", Operator::Eq, true)),
                    &by_name,
                    0,
                    1,
                    &mut parameters,
                )
                .unwrap();
            assert_eq!(parameters.len(), 3);
            assert_eq!(parameters.get("_skip_0"), Some(&Value::Int64(0)));
        }
        let entity = Person::entity_type();
        let mut parameters = Parameters::new();
        assert_eq!(
            query_error(
                generator
                    .select_paged(entity, None, &[], 1, 10, &mut parameters)
                    .unwrap_err()
            ),
            QueryError::MissingSort("person".into())
        );
        for (page, results_per_page) in [(0, 10), (1, 0), (u64::MAX, 2)] {
            let error = generator
                .select_paged(entity, None, &by_name, page, results_per_page, &mut parameters)
                .unwrap_err();
            assert!(matches!(query_error(error), QueryError::InvalidPaging(..)));
        }
        for (first_result, max_results) in [(0, 0), (u64::MAX, 10)] {
            let error = generator
                .select_set(entity, None, &by_name, first_result, max_results, &mut parameters)
                .unwrap_err();
            assert!(matches!(query_error(error), QueryError::InvalidPaging(..)));
        }
    }

    #[test]
    fn count() {
        let generator = generator();
        let mut parameters = Parameters::new();
        let sql = generator
            .count(
                Person::entity_type(),
                Some(&group(
                    GroupOperator::Or,
                    [
                        field::<Person>("age", Operator::Lt, 18),
                        field::<Person>("age", Operator::Gt, 65),
                    ],
                )),
                &mut parameters,
            )
            .unwrap();
        assert_eq!(
            sql,
            r#"SELECT COUNT(*) AS "Total" FROM "person" WHERE (("person"."age" < @age_0) OR ("person"."age" > @age_1))"#
        );
        let sql = generator
            .count(Animal::entity_type(), None, &mut Parameters::new())
            .unwrap();
        assert_eq!(sql, r#"SELECT COUNT(*) AS "Total" FROM "animal""#);
    }

    #[test]
    fn key_statements() {
        let generator = generator();
        assert_eq!(
            &*generator.get(Person::entity_type()).unwrap(),
            format!(r#"SELECT {PERSON_COLUMNS} FROM "person" WHERE ("person"."id" = @id)"#)
        );
        assert_eq!(
            &*generator.get(Car::entity_type()).unwrap(),
            r#"SELECT "garage"."cars"."car_id" AS "id", "garage"."cars"."car_name" AS "name", "garage"."cars"."mileage" FROM "garage"."cars" WHERE ("garage"."cars"."car_id" = @id)"#
        );
        assert_eq!(
            &*generator.delete(Multikey::entity_type()).unwrap(),
            r#"DELETE FROM "multikey" WHERE (("multikey"."key1" = @key1) AND ("multikey"."key2" = @key2))"#
        );
        assert_eq!(
            &*generator.identity(Person::entity_type()).unwrap(),
            r#"SELECT LASTVAL() AS "Id""#
        );
        assert!(matches!(
            query_error(generator.identity(Animal::entity_type()).unwrap_err()),
            QueryError::Unsupported(..)
        ));
    }

    #[test]
    fn insert() {
        let generator = generator();
        assert_eq!(
            &*generator.insert(Person::entity_type()).unwrap(),
            r#"INSERT INTO "person" ("first_name", "last_name", "age", "active", "date_created") VALUES (@first_name, @last_name, @age, @active, @date_created)"#
        );
        assert_eq!(
            &*generator.insert(Animal::entity_type()).unwrap(),
            r#"INSERT INTO "animal" ("id", "name") VALUES (@id, @name)"#
        );
        assert_eq!(
            &*generator.insert(Car::entity_type()).unwrap(),
            r#"INSERT INTO "garage"."cars" ("car_id", "car_name") VALUES (@id, @name)"#
        );
        assert_eq!(
            &*generator.insert(Ticket::entity_type()).unwrap(),
            r#"INSERT INTO "ticket" DEFAULT VALUES"#
        );
    }

    #[test]
    fn update() {
        let generator = generator();
        assert_eq!(
            &*generator.update(Person::entity_type(), false).unwrap(),
            r#"UPDATE "person" SET "first_name" = @first_name, "last_name" = @last_name, "age" = @age, "active" = @active, "date_created" = @date_created WHERE ("person"."id" = @id)"#
        );
        assert_eq!(
            &*generator.update(Multikey::entity_type(), false).unwrap(),
            r#"UPDATE "multikey" SET "key1" = @key1, "key2" = @key2, "value" = @value WHERE (("multikey"."key1" = @key1) AND ("multikey"."key2" = @key2))"#
        );
        assert_eq!(
            &*generator.update(Multikey::entity_type(), true).unwrap(),
            r#"UPDATE "multikey" SET "value" = @value WHERE (("multikey"."key1" = @key1) AND ("multikey"."key2" = @key2))"#
        );
        assert_eq!(
            &*generator.update(Car::entity_type(), true).unwrap(),
            r#"UPDATE "garage"."cars" SET "car_name" = @name WHERE ("garage"."cars"."car_id" = @id)"#
        );
        assert_eq!(
            query_error(generator.update(Ticket::entity_type(), false).unwrap_err()),
            QueryError::NothingToUpdate("ticket".into())
        );
    }

    #[test]
    fn delete_where() {
        let generator = generator();
        let entity = Person::entity_type();
        let mut parameters = Parameters::new();
        let sql = generator
            .delete_where(
                entity,
                Some(&!field::<Person>("active", Operator::Eq, true)),
                &mut parameters,
            )
            .unwrap();
        assert_eq!(
            sql,
            r#"DELETE FROM "person" WHERE ("person"."active" <> @active_0)"#
        );
        for predicate in [None, Some(group(GroupOperator::And, [group(GroupOperator::Or, [])]))] {
            assert_eq!(
                query_error(
                    generator
                        .delete_where(entity, predicate.as_ref(), &mut parameters)
                        .unwrap_err()
                ),
                QueryError::EmptyPredicate("person".into())
            );
        }
        {
            let mut parameters = Parameters::new();
            let sql = generator
                .delete_where(
                    entity,
                    Some(&!group(
                        GroupOperator::And,
                        [
                            field::<Person>("age", Operator::Eq, 1),
                            group(GroupOperator::Or, []),
                        ],
                    )),
                    &mut parameters,
                )
                .unwrap();
            assert_eq!(
                sql,
                r#"DELETE FROM "person" WHERE (("person"."age" <> @age_0))"#
            );
            assert!(!sql.contains("1=1"));
        }
    }

    #[test]
    fn multiple_statements() {
        let generator = generator();
        let multiple = GetMultiplePredicate::new()
            .add::<Person>(
                Some(field::<Person>("age", Operator::Ge, 18)),
                [sort::<Person>("last_name", true)],
            )
            .add_paged::<Person>(
                Some(field::<Person>("age", Operator::Lt, 18)),
                [sort::<Person>("age", false)],
                Paging::Page {
                    page: 2,
                    results_per_page: 5,
                },
            )
            .add::<Animal>(None, []);
        assert_eq!(multiple.len(), 3);
        let mut parameters = Parameters::new();
        let statements = multiple.statements(&generator, &mut parameters).unwrap();
        assert_eq!(
            statements.join(";\n").replace(PERSON_COLUMNS, "*"),
            indoc! {r#"
                SELECT * FROM "person" WHERE ("person"."age" >= @age_0) ORDER BY "person"."last_name" ASC;
                SELECT * FROM "person" WHERE ("person"."age" < @age_1) ORDER BY "person"."age" DESC LIMIT @_take_0 OFFSET @_skip_0;
                SELECT "animal"."id", "animal"."name" FROM "animal"
            "#}
            .trim()
        );
        assert_eq!(parameters.len(), 4);
        assert_eq!(parameters.get("age_1"), Some(&Value::Int32(18)));
        assert_eq!(parameters.get("_skip_0"), Some(&Value::Int64(5)));
    }
}
