use crate::{Animal, MockConnection, Person, rows};
use quill::{
    Configuration, Database, Dialect, GetMultiplePredicate, Operator, Paging, QueryError, RowSet,
    Value, field, sort,
};
use std::sync::Arc;

fn people() -> RowSet {
    rows(
        ["id", "first_name", "last_name"],
        [
            [
                Value::Int64(1),
                Value::Varchar("Ada".into()),
                Value::Varchar("Lovelace".into()),
            ],
            [
                Value::Int64(2),
                Value::Varchar("Alan".into()),
                Value::Varchar("Turing".into()),
            ],
        ],
    )
}

fn animals() -> RowSet {
    rows(
        ["id", "name"],
        [[Value::Varchar(uuid::Uuid::new_v4().to_string()), Value::Varchar("Bella".into())]],
    )
}

pub async fn multiple<D: Dialect + Clone + 'static>(dialect: D) {
    let batch = dialect.supports_multiple_statements();
    let predicate = GetMultiplePredicate::new()
        .add_paged::<Person>(
            Some(field::<Person>("active", Operator::Eq, true)),
            [sort::<Person>("last_name", true)],
            Paging::Page {
                page: 1,
                results_per_page: 10,
            },
        )
        .add::<Animal>(Some(field::<Animal>("name", Operator::Eq, "Bella")), []);

    let config = Arc::new(Configuration::new(dialect.clone()));
    let mut database = Database::new(MockConnection::new(), config.clone());
    if batch {
        database.connection().respond_sets(vec![people(), animals()]);
    } else {
        database.connection().respond_rows(people()).respond_rows(animals());
    }
    let mut reader = database
        .get_multiple(&predicate)
        .await
        .expect("Failed to run the multiple query");
    let statements = database.connection().take_statements();
    if batch {
        assert_eq!(statements.len(), 1);
        let statement = &statements[0];
        assert!(statement.sql.contains(dialect.batch_separator()));
        assert!(statement.parameters.contains("active_0"));
        assert!(statement.parameters.contains("name_0"));
    } else {
        assert_eq!(statements.len(), 2);
    }

    // Result sets are read in declaration order, exactly once
    assert_eq!(reader.remaining(), 2);
    let error = reader
        .read::<Animal>()
        .expect_err("Reading the sets out of order must fail");
    assert!(matches!(
        error.downcast_ref::<QueryError>(),
        Some(QueryError::ResultSetMismatch { .. })
    ));
    let persons = reader.read::<Person>().expect("Failed to read the people");
    assert_eq!(persons.len(), 2);
    assert_eq!(persons[1].last_name, "Turing");
    let pets = reader.read::<Animal>().expect("Failed to read the animals");
    assert_eq!(pets.len(), 1);
    assert!(!pets[0].id.is_nil());
    let error = reader
        .read::<Person>()
        .expect_err("Reading past the last set must fail");
    assert!(matches!(
        error.downcast_ref::<QueryError>(),
        Some(QueryError::NoMoreResults)
    ));

    // Nothing to select, nothing sent
    let mut database = Database::new(MockConnection::new(), config.clone());
    let reader = database
        .get_multiple(&GetMultiplePredicate::new())
        .await
        .expect("Failed to run an empty multiple query");
    assert_eq!(reader.remaining(), 0);
    assert!(database.connection().statements().is_empty());

    // Executors unable to split result sets get one select at a time
    if batch {
        let mut database = Database::new(MockConnection::new().without_multiple_results(), config);
        database.connection().respond_rows(people()).respond_rows(animals());
        let mut reader = database
            .get_multiple(&predicate)
            .await
            .expect("Failed to run the multiple query one select at a time");
        assert_eq!(database.connection().statements().len(), 3);
        assert_eq!(
            reader.read::<Person>().expect("Failed to read the people").len(),
            2
        );
        assert_eq!(
            reader.read::<Animal>().expect("Failed to read the animals").len(),
            1
        );
    }
}
