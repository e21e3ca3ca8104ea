use crate::{Animal, MockConnection, Person, rows, silent_logs};
use quill::{
    Configuration, Database, Dialect, GroupOperator, Operator, QueryError, Value, field, group,
    sort,
};
use std::sync::Arc;

fn assert_query_error(error: &quill::Error, check: impl Fn(&QueryError) -> bool) {
    let Some(query_error) = error.downcast_ref::<QueryError>() else {
        panic!("Expected a QueryError, got: {error:#}");
    };
    assert!(check(query_error), "Unexpected error: {query_error}");
}

pub async fn queries<D: Dialect + Clone + 'static>(dialect: D) {
    let config = Arc::new(Configuration::new(dialect.clone()));
    let mut database = Database::new(MockConnection::new(), config);
    let prefix = dialect.parameter_prefix();

    // List
    let result = rows(
        ["id", "name"],
        [
            [Value::Uuid(database.next_guid()), Value::Varchar("Bella".into())],
            [Value::Uuid(database.next_guid()), Value::Varchar("Luna".into())],
        ],
    );
    database.connection().respond_rows(result);
    let predicate = field::<Animal>("name", Operator::Like, "%a");
    let animals = database
        .get_list::<Animal>(Some(&predicate), &[sort::<Animal>("name", true)])
        .await
        .expect("Failed to list the animals");
    assert_eq!(animals.len(), 2);
    assert_eq!(animals[1].name, "Luna");
    let select = database.connection().take_statements().pop().expect("The select was not sent");
    assert!(select.sql.starts_with("SELECT "));
    assert!(select.sql.contains(&format!("LIKE {prefix}name_0")));
    assert!(select.sql.ends_with(" ASC"));
    assert_eq!(select.parameters.get("name_0"), Some(&Value::Varchar("%a".into())));

    // Unfiltered
    database
        .get_list::<Animal>(None, &[])
        .await
        .expect("Failed to list every animal");
    let select = database.connection().take_statements().pop().expect("The select was not sent");
    assert!(!select.sql.contains(" WHERE "));
    assert!(select.parameters.is_empty());

    // Pages are 1-based
    let by_name = [sort::<Person>("last_name", true), sort::<Person>("first_name", false)];
    database
        .get_page::<Person>(None, &by_name, 3, 10)
        .await
        .expect("Failed to get a page");
    let page = database.connection().take_statements().pop().expect("The page was not sent");
    assert_eq!(page.parameters.get("_skip_0"), Some(&Value::Int64(20)));
    assert_eq!(page.parameters.get("_take_0"), Some(&Value::Int64(10)));

    // Sets skip a 0-based number of rows
    let active = field::<Person>("active", Operator::Eq, true);
    database
        .get_set::<Person>(Some(&active), &by_name, 5, 3)
        .await
        .expect("Failed to get a set");
    let set = database.connection().take_statements().pop().expect("The set was not sent");
    assert_eq!(set.parameters.get("_skip_0"), Some(&Value::Int64(5)));
    assert_eq!(set.parameters.get("_take_0"), Some(&Value::Int64(3)));
    assert_eq!(set.parameters.get("active_0"), Some(&Value::Boolean(true)));

    // Paging requires a sort and a valid window
    let result;
    silent_logs! {
        result = database.get_page::<Person>(None, &[], 1, 10).await;
    }
    assert_query_error(&result.expect_err("Paging without a sort must fail"), |e| {
        matches!(e, QueryError::MissingSort(..))
    });
    let result = database.get_page::<Person>(None, &by_name, 0, 10).await;
    assert_query_error(&result.expect_err("Page 0 must fail"), |e| {
        matches!(e, QueryError::InvalidPaging(..))
    });
    let result = database.get_set::<Person>(None, &by_name, 0, 0).await;
    assert_query_error(&result.expect_err("An empty set must fail"), |e| {
        matches!(e, QueryError::InvalidPaging(..))
    });
    assert!(database.connection().statements().is_empty());

    // Count
    database
        .connection()
        .respond_rows(rows(["Total"], [[Value::Int64(12)]]));
    let count = database
        .count::<Person>(Some(&!field::<Person>("age", Operator::Eq, Value::Null)))
        .await
        .expect("Failed to count the people");
    assert_eq!(count, 12);
    let select = database.connection().take_statements().pop().expect("The count was not sent");
    assert!(select.sql.starts_with("SELECT COUNT(*)"));
    assert!(select.sql.contains("IS NOT NULL"));
    assert!(select.parameters.is_empty());

    // Delete by predicate is guarded
    for predicate in [None, Some(group(GroupOperator::And, []))] {
        let result;
        silent_logs! {
            result = database.delete_where::<Person>(predicate.as_ref()).await;
        }
        assert_query_error(&result.expect_err("Deleting everything must fail"), |e| {
            matches!(e, QueryError::EmptyPredicate(..))
        });
    }
    assert!(database.connection().statements().is_empty());
    database.connection().respond_affected(3);
    let old = group(
        GroupOperator::Or,
        [
            field::<Person>("age", Operator::Gt, 90),
            field::<Person>("age", Operator::Lt, 10),
        ],
    );
    assert!(
        database
            .delete_where::<Person>(Some(&old))
            .await
            .expect("Failed to delete by predicate")
    );
    let delete = database.connection().take_statements().pop().expect("The delete was not sent");
    assert!(delete.sql.starts_with("DELETE FROM "));
    assert!(delete.sql.contains(" OR "));
    assert_eq!(delete.parameters.get("age_0"), Some(&Value::Int32(90)));
    assert_eq!(delete.parameters.get("age_1"), Some(&Value::Int32(10)));

    // Unknown properties fail before anything is sent
    let result = database
        .get_list::<Person>(Some(&field::<Person>("nickname", Operator::Eq, "x")), &[])
        .await;
    assert_query_error(&result.expect_err("An unknown property must fail"), |e| {
        matches!(e, QueryError::UnknownProperty { .. })
    });
    let result = database
        .get_list::<Person>(Some(&field::<Person>("full_name", Operator::Eq, "x")), &[])
        .await;
    assert_query_error(&result.expect_err("An ignored property must fail"), |e| {
        matches!(e, QueryError::IgnoredProperty { .. })
    });
    assert!(database.connection().statements().is_empty());
}
