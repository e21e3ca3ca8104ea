use crate::{ClassMap, Dialect, EntityType, QueryError, Result};
use std::{
    any::TypeId,
    collections::HashMap,
    fmt::{self, Debug},
    sync::{Arc, PoisonError, RwLock},
};
use uuid::Uuid;

/// Source of the identifiers assigned to unset `Guid` keys.
pub trait IdGenerator: Send + Sync {
    fn next_guid(&self) -> Uuid;
}

/// Random UUID version 4.
#[derive(Default, Debug, Clone, Copy)]
pub struct RandomGuid;

impl IdGenerator for RandomGuid {
    fn next_guid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Time ordered UUID version 7, keeps clustered indexes append only.
#[derive(Default, Debug, Clone, Copy)]
pub struct SequentialGuid;

impl IdGenerator for SequentialGuid {
    fn next_guid(&self) -> Uuid {
        Uuid::now_v7()
    }
}

/// Shape of a statement that does not depend on predicate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// Column list of selects.
    Columns,
    /// Select by key.
    Get,
    Insert,
    Update { exclude_assigned_keys: bool },
    /// Delete by key.
    Delete,
    Identity,
}

/// Process scoped state shared by every generator and implementor built from it.
///
/// Class maps and statements are resolved lazily on first use. Two threads racing on the same
/// entry both compute it but only the first one to publish is kept, the lock is never held
/// while computing.
pub struct Configuration {
    dialect: Arc<dyn Dialect>,
    id_generator: Box<dyn IdGenerator>,
    maps: RwLock<HashMap<TypeId, Arc<ClassMap>>>,
    statements: RwLock<HashMap<(TypeId, StatementKind), Arc<str>>>,
}

impl Configuration {
    pub fn new(dialect: impl Dialect + 'static) -> Self {
        Self::with_dialect(Arc::new(dialect))
    }

    pub fn with_dialect(dialect: Arc<dyn Dialect>) -> Self {
        Self {
            dialect,
            id_generator: Box::new(RandomGuid),
            maps: Default::default(),
            statements: Default::default(),
        }
    }

    pub fn with_id_generator(mut self, id_generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Box::new(id_generator);
        self
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn next_guid(&self) -> Uuid {
        self.id_generator.next_guid()
    }

    /// Class map of the entity, resolved on first request.
    pub fn get_map(&self, entity: EntityType) -> Result<Arc<ClassMap>> {
        if let Some(map) = self
            .maps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&entity.id())
        {
            return Ok(map.clone());
        }
        let map = entity.resolve();
        if map.table_name.is_empty() {
            return Err(QueryError::UnknownEntity(entity.name().into()).into());
        }
        log::debug!(
            "Resolved class map of `{}`: table {}, {} properties",
            entity.name(),
            map.table_name,
            map.properties.len()
        );
        Ok(self
            .maps
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(entity.id())
            .or_insert_with(|| Arc::new(map))
            .clone())
    }

    /// Statement of the given shape, built by `build` on first request.
    pub fn cached_statement(
        &self,
        entity: EntityType,
        kind: StatementKind,
        build: impl FnOnce() -> Result<String>,
    ) -> Result<Arc<str>> {
        let key = (entity.id(), kind);
        if let Some(sql) = self
            .statements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(sql.clone());
        }
        let sql: Arc<str> = build()?.into();
        Ok(self
            .statements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(sql)
            .clone())
    }

    /// Drop every cached class map and statement.
    pub fn clear_cache(&self) {
        self.maps
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.statements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        log::debug!("Cleared the class map and statement caches");
    }

    pub fn cached_maps(&self) -> usize {
        self.maps.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn cached_statements(&self) -> usize {
        self.statements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("dialect", &self.dialect.name())
            .field("maps", &self.cached_maps())
            .field("statements", &self.cached_statements())
            .finish()
    }
}
