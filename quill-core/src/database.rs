use crate::{
    ClassMap, Configuration, Connection, Entity, GetMultiplePredicate, Implementor, KeyValue,
    MultipleResultReader, Predicate, Result, Sort,
};
use std::sync::Arc;
use uuid::Uuid;

/// A connection paired with an [`Implementor`], the entry point of most applications.
///
/// Statements inside a transaction go through a clone of the implementor:
/// ```rust,ignore
/// let implementor = database.implementor().clone();
/// let mut transaction = database.begin().await?;
/// implementor.insert(&mut transaction, &mut person).await?;
/// transaction.commit().await?;
/// ```
pub struct Database<C: Connection> {
    connection: C,
    implementor: Implementor,
}

impl<C: Connection> Database<C> {
    pub fn new(connection: C, config: Arc<Configuration>) -> Self {
        Self {
            connection,
            implementor: Implementor::new(config),
        }
    }

    pub fn connection(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn implementor(&self) -> &Implementor {
        &self.implementor
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    pub async fn begin(&mut self) -> Result<C::Transaction<'_>> {
        self.connection.begin().await
    }

    pub fn clear_cache(&self) {
        self.implementor.configuration().clear_cache();
    }

    pub fn next_guid(&self) -> Uuid {
        self.implementor.configuration().next_guid()
    }

    pub fn get_map<E: Entity>(&self) -> Result<Arc<ClassMap>> {
        self.implementor.get_map::<E>()
    }

    pub async fn get<E: Entity>(&mut self, key: impl Into<KeyValue>) -> Result<Option<E>> {
        self.implementor.get(&mut self.connection, key).await
    }

    pub async fn insert<E: Entity>(&mut self, entity: &mut E) -> Result<KeyValue> {
        self.implementor.insert(&mut self.connection, entity).await
    }

    pub async fn insert_many<'a, E: Entity>(
        &mut self,
        entities: impl IntoIterator<Item = &'a mut E>,
    ) -> Result<Vec<KeyValue>> {
        self.implementor
            .insert_many(&mut self.connection, entities)
            .await
    }

    pub async fn update<E: Entity>(&mut self, entity: &E, exclude_assigned_keys: bool) -> Result<bool> {
        self.implementor
            .update(&mut self.connection, entity, exclude_assigned_keys)
            .await
    }

    pub async fn delete<E: Entity>(&mut self, entity: &E) -> Result<bool> {
        self.implementor.delete(&mut self.connection, entity).await
    }

    pub async fn delete_where<E: Entity>(&mut self, predicate: Option<&Predicate>) -> Result<bool> {
        self.implementor
            .delete_where::<E, _>(&mut self.connection, predicate)
            .await
    }

    pub async fn get_list<E: Entity>(
        &mut self,
        predicate: Option<&Predicate>,
        sort: &[Sort],
    ) -> Result<Vec<E>> {
        self.implementor
            .get_list(&mut self.connection, predicate, sort)
            .await
    }

    pub async fn get_page<E: Entity>(
        &mut self,
        predicate: Option<&Predicate>,
        sort: &[Sort],
        page: u64,
        results_per_page: u64,
    ) -> Result<Vec<E>> {
        self.implementor
            .get_page(&mut self.connection, predicate, sort, page, results_per_page)
            .await
    }

    pub async fn get_set<E: Entity>(
        &mut self,
        predicate: Option<&Predicate>,
        sort: &[Sort],
        first_result: u64,
        max_results: u64,
    ) -> Result<Vec<E>> {
        self.implementor
            .get_set(&mut self.connection, predicate, sort, first_result, max_results)
            .await
    }

    pub async fn count<E: Entity>(&mut self, predicate: Option<&Predicate>) -> Result<u64> {
        self.implementor
            .count::<E, _>(&mut self.connection, predicate)
            .await
    }

    pub async fn get_multiple(&mut self, predicate: &GetMultiplePredicate) -> Result<MultipleResultReader> {
        self.implementor
            .get_multiple(&mut self.connection, predicate)
            .await
    }
}
