use crate::{Animal, MockConnection};
use quill::{Configuration, Database, Dialect, Transaction};
use std::sync::Arc;

pub async fn transaction<D: Dialect + Clone + 'static>(dialect: D) {
    let mut database = Database::new(
        MockConnection::new(),
        Arc::new(Configuration::new(dialect)),
    );
    let implementor = database.implementor().clone();

    let mut transaction = database
        .begin()
        .await
        .expect("Could not begin a transaction");
    let mut animal = Animal {
        name: "Rex".into(),
        ..Default::default()
    };
    implementor
        .insert(&mut transaction, &mut animal)
        .await
        .expect("Failed to insert inside the transaction");
    transaction
        .commit()
        .await
        .expect("Failed to commit the transaction");

    let mut transaction = database
        .begin()
        .await
        .expect("Could not begin a transaction");
    implementor
        .delete(&mut transaction, &animal)
        .await
        .expect("Failed to delete inside the transaction");
    transaction
        .rollback()
        .await
        .expect("Failed to roll back the transaction");

    let connection = database.connection();
    assert_eq!(connection.transactions, 2);
    assert_eq!(connection.commits, 1);
    assert_eq!(connection.rollbacks, 1);
    assert_eq!(connection.statements().len(), 2);
    assert!(connection.statements()[0].sql.starts_with("INSERT INTO "));
    assert!(connection.statements()[1].sql.starts_with("DELETE FROM "));
}
