use crate::{Animal, MockConnection, Multikey, Person, Response, Ticket, rows};
use quill::{
    Configuration, Database, Dialect, KeyValue, QueryError, QueryResult, RowsAffected, Value,
};
use std::sync::Arc;
use uuid::Uuid;

/// Script the outcome of an insert followed by the identity query.
fn respond_identity(connection: &mut MockConnection, multiple: bool, id: i64) {
    let identity = rows(["Id"], [[Value::Int64(id)]]);
    if multiple {
        let mut results = vec![QueryResult::Affected(RowsAffected::new(1))];
        results.extend(identity.into_iter().map(QueryResult::Row));
        connection.respond(Response::Results(results));
    } else {
        connection.respond_affected(1).respond_rows(identity);
    }
}

pub async fn crud<D: Dialect + Clone + 'static>(dialect: D) {
    let multiple = dialect.supports_multiple_statements();
    let config = Arc::new(Configuration::new(dialect.clone()));
    let mut database = Database::new(MockConnection::new(), config);

    // Identity key
    respond_identity(database.connection(), multiple, 42);
    let mut person = Person {
        first_name: "Foo".into(),
        last_name: "Bar".into(),
        age: Some(30),
        active: true,
        full_name: "Foo Bar".into(),
        ..Default::default()
    };
    let key = database
        .insert(&mut person)
        .await
        .expect("Failed to insert a person");
    assert_eq!(key, KeyValue::Int64(42));
    assert_eq!(person.id, 42);
    let statements = database.connection().take_statements();
    assert_eq!(statements.len(), if multiple { 1 } else { 2 });
    let insert = &statements[0];
    assert!(insert.sql.starts_with("INSERT INTO "));
    assert_eq!(insert.sql.contains(dialect.batch_separator()), multiple);
    assert!(!insert.parameters.contains("id"));
    assert!(!insert.parameters.contains("full_name"));
    assert_eq!(insert.parameters.len(), 5);
    assert_eq!(
        insert.parameters.get("first_name"),
        Some(&Value::Varchar("Foo".into()))
    );
    assert_eq!(insert.parameters.get("age"), Some(&Value::Int32(30)));
    assert_eq!(insert.parameters.get("date_created"), Some(&Value::Null));

    // Only an identity
    respond_identity(database.connection(), multiple, 7);
    let mut ticket = Ticket::default();
    database
        .insert(&mut ticket)
        .await
        .expect("Failed to insert a ticket");
    assert_eq!(ticket.ticket_id, 7);
    let insert = database.connection().take_statements().remove(0);
    assert!(insert.parameters.is_empty());

    // GUID key generated before the insert
    let mut animal = Animal {
        name: "Bella".into(),
        ..Default::default()
    };
    let key = database
        .insert(&mut animal)
        .await
        .expect("Failed to insert an animal");
    assert!(!animal.id.is_nil());
    assert_eq!(key, KeyValue::Uuid(animal.id));
    let insert = database
        .connection()
        .take_statements()
        .pop()
        .expect("The insert was not sent");
    assert_eq!(
        insert.parameters.get("id"),
        Some(&dialect.bind_value(Value::Uuid(animal.id)))
    );

    // GUID key already set
    let id = Uuid::new_v4();
    let mut animal = Animal {
        id,
        name: "Luna".into(),
    };
    let key = database
        .insert(&mut animal)
        .await
        .expect("Failed to insert an animal with a key");
    assert_eq!(key, KeyValue::Uuid(id));
    assert_eq!(animal.id, id);

    // Composite assigned key
    let mut multikey = Multikey {
        key1: 1,
        key2: "a".into(),
        value: "first".into(),
    };
    let key = database
        .insert(&mut multikey)
        .await
        .expect("Failed to insert a multikey");
    assert_eq!(key, KeyValue::composite([("key1", KeyValue::Int64(1)), ("key2", "a".into())]));
    assert_eq!(key.part("key2"), Some(&KeyValue::Varchar("a".into())));
    let insert = database.connection().take_statements().pop().expect("The insert was not sent");
    assert_eq!(insert.parameters.len(), 3);

    // Update
    database.connection().respond_affected(1);
    person.age = Some(31);
    assert!(
        database
            .update(&person, false)
            .await
            .expect("Failed to update a person")
    );
    let update = database.connection().take_statements().pop().expect("The update was not sent");
    assert!(update.sql.starts_with("UPDATE "));
    assert_eq!(update.parameters.get("id"), Some(&Value::Int64(42)));
    assert_eq!(update.parameters.get("age"), Some(&Value::Int32(31)));
    assert!(!update.parameters.contains("full_name"));

    // Update of a missing row is not an error
    database.connection().respond_affected(0);
    assert!(
        !database
            .update(&person, false)
            .await
            .expect("Failed to update a missing person")
    );

    // Assigned keys stay out of the SET clause when excluded
    database.connection().respond_affected(1);
    multikey.value = "second".into();
    assert!(
        database
            .update(&multikey, true)
            .await
            .expect("Failed to update a multikey")
    );
    let update = database.connection().take_statements().pop().expect("The update was not sent");
    let (set, condition) = update
        .sql
        .split_once(" WHERE ")
        .expect("The update has no WHERE clause");
    assert!(!set.contains("key1"));
    assert!(condition.contains("key1") && condition.contains("key2"));
    assert!(condition.contains(" AND "));

    // Get by key
    database.connection().respond_rows(rows(
        ["id", "first_name", "last_name", "age", "active", "date_created"],
        [[
            Value::Int64(42),
            Value::Varchar("Foo".into()),
            Value::Varchar("Bar".into()),
            Value::Int32(31),
            Value::Boolean(true),
            Value::Null,
        ]],
    ));
    let found = database
        .get::<Person>(42)
        .await
        .expect("Failed to get a person")
        .expect("The person was not found");
    assert_eq!(found.first_name, "Foo");
    assert_eq!(found.age, Some(31));
    assert_eq!(found.full_name, "");
    let get = database.connection().take_statements().pop().expect("The select was not sent");
    assert_eq!(get.parameters.get("id"), Some(&Value::Int64(42)));
    let missing = database
        .get::<Person>(43)
        .await
        .expect("Failed to get a missing person");
    assert!(missing.is_none());

    // Composite key lookups need every part
    let error = database
        .get::<Multikey>(1)
        .await
        .expect_err("A scalar key must not match a composite key");
    assert!(matches!(
        error.downcast_ref::<QueryError>(),
        Some(QueryError::KeyMismatch { .. })
    ));
    let error = database
        .get::<Multikey>(KeyValue::composite([("key1", 1)]))
        .await
        .expect_err("A partial composite key must be rejected");
    assert!(matches!(
        error.downcast_ref::<QueryError>(),
        Some(QueryError::KeyMismatch { .. })
    ));
    database
        .get::<Multikey>(KeyValue::composite([
            ("key1", KeyValue::Int64(1)),
            ("key2", "a".into()),
        ]))
        .await
        .expect("Failed to get a multikey");
    let get = database.connection().take_statements().pop().expect("The select was not sent");
    assert_eq!(get.parameters.len(), 2);

    // Delete
    database.connection().respond_affected(1);
    assert!(
        database
            .delete(&person)
            .await
            .expect("Failed to delete a person")
    );
    let delete = database.connection().take_statements().pop().expect("The delete was not sent");
    assert!(delete.sql.starts_with("DELETE FROM "));
    assert_eq!(delete.parameters.len(), 1);
    assert!(
        !database
            .delete(&person)
            .await
            .expect("Failed to delete a missing person")
    );

    // Executor errors are propagated
    database.connection().respond_error("constraint violated");
    let error = database
        .delete(&multikey)
        .await
        .expect_err("The executor error was swallowed");
    assert!(error.downcast_ref::<QueryError>().is_none());
    assert_eq!(error.to_string(), "constraint violated");

    assert_eq!(database.connection().pending_responses(), 0);
}
