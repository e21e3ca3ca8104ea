use crate::{
    ClassMap, Configuration, Entity, EntityType, Executor, GetMultiplePredicate, KeyType,
    KeyValue, MultipleResultReader, Parameters, Predicate, PropertyMap, QueryError, Result,
    RowSet, Sort, SqlGenerator, Statement, Value,
    stream::TryStreamExt,
};
use log::Level;
use std::sync::Arc;

/// CRUD operations over any [`Executor`].
///
/// Holds nothing but the generator, cloning is cheap and clones share the caches. Every call
/// resolves the class map, builds the statement and suspends only while the executor runs it.
#[derive(Debug, Clone)]
pub struct Implementor {
    generator: Arc<SqlGenerator>,
}

impl Implementor {
    pub fn new(config: Arc<Configuration>) -> Self {
        Self {
            generator: Arc::new(SqlGenerator::new(config)),
        }
    }

    pub fn generator(&self) -> &SqlGenerator {
        &self.generator
    }

    pub fn configuration(&self) -> &Arc<Configuration> {
        self.generator.configuration()
    }

    pub fn get_map<E: Entity>(&self) -> Result<Arc<ClassMap>> {
        self.generator.map(E::entity_type())
    }

    /// Entity with the given key, `None` when no row matches.
    ///
    /// A scalar key is accepted for entities with a single key property, entities with a
    /// composite key need a [`KeyValue::Composite`] naming every key property.
    pub async fn get<E: Entity, Exec: Executor>(
        &self,
        executor: &mut Exec,
        key: impl Into<KeyValue>,
    ) -> Result<Option<E>> {
        let entity = E::entity_type();
        let map = self.generator.map(entity)?;
        let parameters = self.key_parameters(&map, key.into())?;
        let statement = Statement::new(&*self.generator.get(entity)?, parameters);
        let mut rows = self.fetch(executor, statement).await?.into_iter();
        rows.next().map(|row| E::from_row(&map, row)).transpose()
    }

    /// Insert the entity and return its key.
    ///
    /// Unset `Guid` keys are generated before the statement is sent. An `Identity` key is read
    /// back from the database and written into the entity.
    pub async fn insert<E: Entity, Exec: Executor>(
        &self,
        executor: &mut Exec,
        entity: &mut E,
    ) -> Result<KeyValue> {
        let entity_type = E::entity_type();
        let map = self.generator.map(entity_type)?;
        if map.keys().next().is_none() {
            return Err(QueryError::NoKeys(map.entity_name.to_string()).into());
        }
        for key in map.keys().filter(|k| k.key_type == KeyType::Guid) {
            let unset = match entity.get_value(&key.name) {
                None | Some(Value::Null) => true,
                Some(Value::Uuid(v)) => v.is_nil(),
                _ => false,
            };
            if unset {
                let guid = self.configuration().next_guid();
                log::trace!("Generated {guid} for `{}.{}`", map.entity_name, key.name);
                entity.set_value(&key.name, Value::Uuid(guid))?;
            }
        }
        let sql = self.generator.insert(entity_type)?;
        let parameters = self.entity_parameters(entity, map.insertable());
        if let Some(identity) = map.identity() {
            let identity_sql = self.generator.identity(entity_type)?;
            let rows = if self.generator.supports_multiple_statements() {
                let batch = format!(
                    "{sql}{}{identity_sql}",
                    self.generator.dialect().batch_separator()
                );
                self.fetch(executor, Statement::new(batch, parameters))
                    .await?
            } else {
                self.execute(executor, Statement::new(&*sql, parameters))
                    .await?;
                self.fetch(executor, Statement::new(&*identity_sql, Parameters::new()))
                    .await?
            };
            let id = identity_of(&rows).ok_or_else(|| {
                crate::Error::msg(format!(
                    "The identity of `{}` was not returned after the insert",
                    map.entity_name
                ))
            })?;
            entity.set_value(&identity.name, Value::Int64(id))?;
        } else {
            self.execute(executor, Statement::new(&*sql, parameters))
                .await?;
        }
        key_of(&map, entity)
    }

    /// Insert every entity one by one, returning the keys in the same order.
    pub async fn insert_many<'a, E, Exec, It>(
        &self,
        executor: &mut Exec,
        entities: It,
    ) -> Result<Vec<KeyValue>>
    where
        E: Entity,
        Exec: Executor,
        It: IntoIterator<Item = &'a mut E>,
    {
        let mut keys = Vec::new();
        for entity in entities {
            keys.push(self.insert(executor, entity).await?);
        }
        Ok(keys)
    }

    /// Update the row with the keys of `entity`, false when no row matches.
    pub async fn update<E: Entity, Exec: Executor>(
        &self,
        executor: &mut Exec,
        entity: &E,
        exclude_assigned_keys: bool,
    ) -> Result<bool> {
        let entity_type = E::entity_type();
        let map = self.generator.map(entity_type)?;
        let sql = self.generator.update(entity_type, exclude_assigned_keys)?;
        let mut parameters =
            self.entity_parameters(entity, map.updatable(exclude_assigned_keys));
        parameters.extend(self.entity_key_parameters(&map, entity)?);
        let affected = self
            .execute(executor, Statement::new(&*sql, parameters))
            .await?;
        Ok(check_single_row(&map, "updated", affected))
    }

    /// Delete the row with the keys of `entity`, false when no row matches.
    pub async fn delete<E: Entity, Exec: Executor>(
        &self,
        executor: &mut Exec,
        entity: &E,
    ) -> Result<bool> {
        let entity_type = E::entity_type();
        let map = self.generator.map(entity_type)?;
        let sql = self.generator.delete(entity_type)?;
        let parameters = self.entity_key_parameters(&map, entity)?;
        let affected = self
            .execute(executor, Statement::new(&*sql, parameters))
            .await?;
        Ok(check_single_row(&map, "deleted", affected))
    }

    /// Delete every row matching `predicate`. A missing or empty predicate is refused before
    /// anything is sent.
    pub async fn delete_where<E: Entity, Exec: Executor>(
        &self,
        executor: &mut Exec,
        predicate: Option<&Predicate>,
    ) -> Result<bool> {
        let mut parameters = Parameters::new();
        let sql = self
            .generator
            .delete_where(E::entity_type(), predicate, &mut parameters)?;
        let affected = self
            .execute(executor, Statement::new(sql, parameters))
            .await?;
        Ok(affected > 0)
    }

    pub async fn get_list<E: Entity, Exec: Executor>(
        &self,
        executor: &mut Exec,
        predicate: Option<&Predicate>,
        sort: &[Sort],
    ) -> Result<Vec<E>> {
        let entity = E::entity_type();
        let mut parameters = Parameters::new();
        let sql = self
            .generator
            .select(entity, predicate, sort, &mut parameters)?;
        self.fetch_entities(executor, entity, Statement::new(sql, parameters))
            .await
    }

    /// Rows of the 1-based `page`, `sort` must not be empty.
    pub async fn get_page<E: Entity, Exec: Executor>(
        &self,
        executor: &mut Exec,
        predicate: Option<&Predicate>,
        sort: &[Sort],
        page: u64,
        results_per_page: u64,
    ) -> Result<Vec<E>> {
        let entity = E::entity_type();
        let mut parameters = Parameters::new();
        let sql = self.generator.select_paged(
            entity,
            predicate,
            sort,
            page,
            results_per_page,
            &mut parameters,
        )?;
        self.fetch_entities(executor, entity, Statement::new(sql, parameters))
            .await
    }

    /// At most `max_results` rows after the first `first_result` ones, `sort` must not be empty.
    pub async fn get_set<E: Entity, Exec: Executor>(
        &self,
        executor: &mut Exec,
        predicate: Option<&Predicate>,
        sort: &[Sort],
        first_result: u64,
        max_results: u64,
    ) -> Result<Vec<E>> {
        let entity = E::entity_type();
        let mut parameters = Parameters::new();
        let sql = self.generator.select_set(
            entity,
            predicate,
            sort,
            first_result,
            max_results,
            &mut parameters,
        )?;
        self.fetch_entities(executor, entity, Statement::new(sql, parameters))
            .await
    }

    pub async fn count<E: Entity, Exec: Executor>(
        &self,
        executor: &mut Exec,
        predicate: Option<&Predicate>,
    ) -> Result<u64> {
        let mut parameters = Parameters::new();
        let sql = self
            .generator
            .count(E::entity_type(), predicate, &mut parameters)?;
        let rows = self
            .fetch(executor, Statement::new(sql, parameters))
            .await?;
        rows.first()
            .and_then(|row| row.get_column("Total").or(row.values().first()))
            .and_then(Value::as_i64)
            .and_then(|v| u64::try_from(v).ok())
            .ok_or_else(|| crate::Error::msg("The count query did not return a number"))
    }

    /// Run every select of `predicate` and return a reader handing out the results in order.
    ///
    /// When the dialect supports it the selects travel in one batch, otherwise (or when the
    /// executor cannot split result sets) they are sent one after the other.
    pub async fn get_multiple<Exec: Executor>(
        &self,
        executor: &mut Exec,
        predicate: &GetMultiplePredicate,
    ) -> Result<MultipleResultReader> {
        if predicate.is_empty() {
            return Ok(MultipleResultReader::new(
                self.configuration().clone(),
                std::iter::empty(),
            ));
        }
        let entities = predicate.items().iter().map(|v| v.entity);
        if self.generator.supports_multiple_statements() {
            let mut parameters = Parameters::new();
            let sql = predicate
                .statements(&self.generator, &mut parameters)?
                .join(self.generator.dialect().batch_separator());
            let statement = Statement::new(sql, parameters);
            log_statement(&statement);
            match executor.fetch_multiple(statement).await {
                Ok(sets) => {
                    if sets.len() != predicate.items().len() {
                        return Err(crate::Error::msg(format!(
                            "Expected {} result sets, the batch returned {}",
                            predicate.items().len(),
                            sets.len()
                        )));
                    }
                    return Ok(MultipleResultReader::new(
                        self.configuration().clone(),
                        entities.zip(sets),
                    ));
                }
                Err(e) if matches!(e.downcast_ref::<QueryError>(), Some(QueryError::Unsupported(..))) => {
                    log::debug!("{e:#}, sending the selects one by one");
                }
                Err(e) => return Err(e),
            }
        }
        let mut sets = Vec::<RowSet>::with_capacity(predicate.items().len());
        for item in predicate.items() {
            let mut parameters = Parameters::new();
            let sql = item.statement(&self.generator, &mut parameters)?;
            sets.push(
                self.fetch(executor, Statement::new(sql, parameters))
                    .await?,
            );
        }
        Ok(MultipleResultReader::new(
            self.configuration().clone(),
            entities.zip(sets),
        ))
    }

    async fn fetch<Exec: Executor>(&self, executor: &mut Exec, statement: Statement) -> Result<RowSet> {
        log_statement(&statement);
        executor.fetch(statement).try_collect().await
    }

    async fn fetch_entities<E: Entity, Exec: Executor>(
        &self,
        executor: &mut Exec,
        entity: EntityType,
        statement: Statement,
    ) -> Result<Vec<E>> {
        let map = self.generator.map(entity)?;
        self.fetch(executor, statement)
            .await?
            .into_iter()
            .map(|row| E::from_row(&map, row))
            .collect()
    }

    async fn execute<Exec: Executor>(&self, executor: &mut Exec, statement: Statement) -> Result<u64> {
        log_statement(&statement);
        Ok(executor.execute(statement).await?.rows_affected)
    }

    fn bind(&self, parameters: &mut Parameters, name: &str, value: Value) {
        parameters.insert(name, self.generator.dialect().bind_value(value));
    }

    fn entity_parameters<'m, E: Entity>(
        &self,
        entity: &E,
        properties: impl Iterator<Item = &'m PropertyMap>,
    ) -> Parameters {
        let mut parameters = Parameters::new();
        for property in properties {
            let value = entity.get_value(&property.name).unwrap_or_default();
            self.bind(&mut parameters, &property.name, value);
        }
        parameters
    }

    /// Values of every key of `entity`, all of them must be set.
    fn entity_key_parameters<E: Entity>(&self, map: &ClassMap, entity: &E) -> Result<Parameters> {
        let mut parameters = Parameters::new();
        for key in map.keys() {
            let value = key_value(map, key, entity)?;
            self.bind(&mut parameters, &key.name, value);
        }
        if parameters.is_empty() {
            return Err(QueryError::NoKeys(map.entity_name.to_string()).into());
        }
        Ok(parameters)
    }

    fn key_parameters(&self, map: &ClassMap, key: KeyValue) -> Result<Parameters> {
        let keys = map.keys().collect::<Vec<_>>();
        let mismatch = |reason: String| QueryError::KeyMismatch {
            entity: map.entity_name.to_string(),
            reason,
        };
        let mut parameters = Parameters::new();
        match (keys.as_slice(), key) {
            ([], _) => return Err(QueryError::NoKeys(map.entity_name.to_string()).into()),
            (_, KeyValue::Composite(parts)) => {
                if let Some((name, _)) = parts
                    .iter()
                    .find(|(name, _)| !keys.iter().any(|k| k.name == *name))
                {
                    return Err(mismatch(format!("`{name}` is not a key")).into());
                }
                for key in &keys {
                    let Some((_, value)) = parts.iter().find(|(name, _)| *name == key.name) else {
                        return Err(mismatch(format!("missing a value for `{}`", key.name)).into());
                    };
                    self.bind(&mut parameters, &key.name, value.clone().try_into()?);
                }
            }
            ([key], value) => self.bind(&mut parameters, &key.name, value.try_into()?),
            (keys, _) => {
                return Err(mismatch(format!(
                    "a composite value is required for the {} keys",
                    keys.len()
                ))
                .into());
            }
        }
        Ok(parameters)
    }
}

fn log_statement(statement: &Statement) {
    log::debug!("{statement}");
    if log::log_enabled!(Level::Trace) {
        for (name, value) in statement.parameters.iter() {
            log::trace!("  {name} = {value}");
        }
    }
}

fn key_value<E: Entity>(map: &ClassMap, key: &PropertyMap, entity: &E) -> Result<Value> {
    match entity.get_value(&key.name) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(QueryError::MissingKeyValue {
            entity: map.entity_name.to_string(),
            property: key.name.to_string(),
        }
        .into()),
    }
}

/// Key of `entity`, composite when several properties are keys.
fn key_of<E: Entity>(map: &ClassMap, entity: &E) -> Result<KeyValue> {
    let mut parts = map
        .keys()
        .map(|key| {
            Ok((
                key.name.to_string(),
                KeyValue::try_from(key_value(map, key, entity)?)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    match parts.len() {
        0 => Err(QueryError::NoKeys(map.entity_name.to_string()).into()),
        1 => Ok(parts.swap_remove(0).1),
        _ => Ok(KeyValue::Composite(parts)),
    }
}

fn identity_of(rows: &RowSet) -> Option<i64> {
    let row = rows.last()?;
    row.get_column("Id")
        .or(row.values().first())
        .and_then(Value::as_i64)
}

fn check_single_row(map: &ClassMap, action: &str, affected: u64) -> bool {
    if affected != 1 {
        log::log!(
            if affected == 0 {
                Level::Info
            } else {
                Level::Error
            },
            "The statement {action} {affected} rows of `{}` instead of the expected 1",
            map.entity_name
        );
    }
    affected > 0
}
