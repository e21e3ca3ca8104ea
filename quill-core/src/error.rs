use thiserror::Error;

/// Failures detected by quill itself, before or after talking to the database.
///
/// They travel inside [`crate::Error`], use `error.downcast_ref::<QueryError>()` to classify them.
/// Errors coming from an [`crate::Executor`] are propagated untouched and never wrapped here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("No class map could be resolved for entity `{0}`")]
    UnknownEntity(String),

    #[error("Property `{property}` is not mapped by entity `{entity}`")]
    UnknownProperty { entity: String, property: String },

    #[error("Property `{property}` of entity `{entity}` is ignored and has no column")]
    IgnoredProperty { entity: String, property: String },

    #[error("Entity `{0}` does not declare any key property")]
    NoKeys(String),

    #[error("Key property `{property}` of entity `{entity}` has no value")]
    MissingKeyValue { entity: String, property: String },

    #[error("The key does not match the key properties of entity `{entity}`: {reason}")]
    KeyMismatch { entity: String, reason: String },

    #[error("Operator must be set to Eq for Enumerable types")]
    EnumerableOperator,

    #[error("Refusing to delete from `{0}` without a predicate, this would remove every row")]
    EmptyPredicate(String),

    #[error("Sort cannot be empty when paging `{0}`, the row order would be undefined")]
    MissingSort(String),

    #[error("Invalid paging window: {0}")]
    InvalidPaging(String),

    #[error("Entity `{0}` has no column that can be updated")]
    NothingToUpdate(String),

    #[error("All the result sets have already been read")]
    NoMoreResults,

    #[error("The next result set was declared for `{expected}` but `{requested}` was requested")]
    ResultSetMismatch { expected: String, requested: String },

    #[error("{0}")]
    Unsupported(String),
}
