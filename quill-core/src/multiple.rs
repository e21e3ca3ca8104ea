use crate::{
    Configuration, Entity, EntityType, Parameters, Predicate, QueryError, Result, RowSet, Sort,
    SqlGenerator,
};
use std::{collections::VecDeque, sync::Arc};

/// Window applied to one select of a [`GetMultiplePredicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// 1-based page of `results_per_page` rows.
    Page { page: u64, results_per_page: u64 },
    /// `max_results` rows after skipping `first_result` rows.
    Set { first_result: u64, max_results: u64 },
}

/// One select of a batched multi result query.
#[derive(Debug, Clone, PartialEq)]
pub struct GetMultipleItem {
    pub entity: EntityType,
    pub predicate: Option<Predicate>,
    pub sort: Vec<Sort>,
    pub paging: Option<Paging>,
}

impl GetMultipleItem {
    /// Select statement of this item, binding into the shared `parameters`.
    pub fn statement(&self, generator: &SqlGenerator, parameters: &mut Parameters) -> Result<String> {
        let predicate = self.predicate.as_ref();
        match self.paging {
            None => generator.select(self.entity, predicate, &self.sort, parameters),
            Some(Paging::Page {
                page,
                results_per_page,
            }) => generator.select_paged(
                self.entity,
                predicate,
                &self.sort,
                page,
                results_per_page,
                parameters,
            ),
            Some(Paging::Set {
                first_result,
                max_results,
            }) => generator.select_set(
                self.entity,
                predicate,
                &self.sort,
                first_result,
                max_results,
                parameters,
            ),
        }
    }
}

/// Ordered selects, possibly of different entities, executed in a single call.
///
/// ```rust,ignore
/// let multiple = GetMultiplePredicate::new()
///     .add::<Person>(Some(field::<Person>("Active", Operator::Eq, true)), [sort::<Person>("LastName", true)])
///     .add::<Animal>(None, []);
/// let mut reader = implementor.get_multiple(&mut connection, &multiple).await?;
/// let people = reader.read::<Person>()?;
/// let animals = reader.read::<Animal>()?;
/// ```
#[derive(Default, Debug, Clone, PartialEq)]
pub struct GetMultiplePredicate {
    items: Vec<GetMultipleItem>,
}

impl GetMultiplePredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<E: Entity>(
        self,
        predicate: Option<Predicate>,
        sort: impl IntoIterator<Item = Sort>,
    ) -> Self {
        self.push(EntityType::of::<E>(), predicate, sort, None)
    }

    pub fn add_paged<E: Entity>(
        self,
        predicate: Option<Predicate>,
        sort: impl IntoIterator<Item = Sort>,
        paging: Paging,
    ) -> Self {
        self.push(EntityType::of::<E>(), predicate, sort, Some(paging))
    }

    fn push(
        mut self,
        entity: EntityType,
        predicate: Option<Predicate>,
        sort: impl IntoIterator<Item = Sort>,
        paging: Option<Paging>,
    ) -> Self {
        self.items.push(GetMultipleItem {
            entity,
            predicate,
            sort: sort.into_iter().collect(),
            paging,
        });
        self
    }

    pub fn items(&self) -> &[GetMultipleItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// One select per item, in declaration order, all binding into the same `parameters`.
    pub fn statements(&self, generator: &SqlGenerator, parameters: &mut Parameters) -> Result<Vec<String>> {
        self.items
            .iter()
            .map(|item| item.statement(generator, parameters))
            .collect()
    }
}

/// Result sets of a multi result query, consumed strictly in declaration order.
#[derive(Debug)]
pub struct MultipleResultReader {
    config: Arc<Configuration>,
    sets: VecDeque<(EntityType, RowSet)>,
}

impl MultipleResultReader {
    pub fn new(
        config: Arc<Configuration>,
        sets: impl IntoIterator<Item = (EntityType, RowSet)>,
    ) -> Self {
        Self {
            config,
            sets: sets.into_iter().collect(),
        }
    }

    /// Number of result sets not read yet.
    pub fn remaining(&self) -> usize {
        self.sets.len()
    }

    /// Entity type of the next result set.
    pub fn peek(&self) -> Option<EntityType> {
        self.sets.front().map(|(entity, _)| *entity)
    }

    /// Consume the next result set as entities of type `E`.
    ///
    /// Fails if `E` is not the type declared for that set, the set is then left unread.
    pub fn read<E: Entity>(&mut self) -> Result<Vec<E>> {
        let requested = EntityType::of::<E>();
        let Some(expected) = self.peek() else {
            return Err(QueryError::NoMoreResults.into());
        };
        if expected != requested {
            return Err(QueryError::ResultSetMismatch {
                expected: expected.name().into(),
                requested: requested.name().into(),
            }
            .into());
        }
        let map = self.config.get_map(requested)?;
        let Some((_, rows)) = self.sets.pop_front() else {
            return Err(QueryError::NoMoreResults.into());
        };
        rows.into_iter().map(|row| E::from_row(&map, row)).collect()
    }
}

impl Iterator for MultipleResultReader {
    type Item = (EntityType, RowSet);
    fn next(&mut self) -> Option<Self::Item> {
        self.sets.pop_front()
    }
}
