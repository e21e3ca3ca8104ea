use crate::{ClassMap, Context, Result, RowLabeled, Value};
use std::{
    any::{self, TypeId},
    fmt::{self, Debug},
    hash::{Hash, Hasher},
};

/// A type persisted as one row of one table.
///
/// Implementors describe their mapping with [`Entity::class_map`] and expose their properties
/// by name, this is all the information the generator and the implementor need.
pub trait Entity: Default + Send + Sync + 'static {
    /// Mapping of the entity, resolved once and then cached by the configuration.
    fn class_map() -> ClassMap;

    /// Current value of a property, `None` when the entity has no such property.
    fn get_value(&self, property: &str) -> Option<Value>;

    /// Assign a property, fails when the value cannot be converted to the property type.
    fn set_value(&mut self, property: &str, value: Value) -> Result<()>;

    fn entity_type() -> EntityType {
        EntityType::of::<Self>()
    }

    /// Build an entity from a result row, columns not belonging to the mapping are skipped.
    fn from_row(map: &ClassMap, row: RowLabeled) -> Result<Self> {
        let mut entity = Self::default();
        let RowLabeled { labels, values } = row;
        for (label, value) in labels.iter().zip(values.into_vec()) {
            let Some(property) = map.property_for_label(label) else {
                log::trace!("Column `{label}` is not mapped by `{}`", map.entity_name);
                continue;
            };
            entity.set_value(&property.name, value).with_context(|| {
                format!(
                    "While reading column `{label}` into `{}.{}`",
                    map.entity_name, property.name
                )
            })?;
        }
        Ok(entity)
    }
}

/// Type name without the module path, generic arguments are kept as they are.
fn short_name(name: &'static str) -> &'static str {
    let head = name.find('<').unwrap_or(name.len());
    match name[..head].rfind("::") {
        Some(i) => &name[i + 2..],
        None => name,
    }
}

/// Runtime token of an entity type, key of the caches and of multi result sets.
#[derive(Clone, Copy)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
    resolve: fn() -> ClassMap,
}

impl EntityType {
    pub fn of<E: Entity>() -> Self {
        let name = any::type_name::<E>();
        Self {
            id: TypeId::of::<E>(),
            name: short_name(name),
            resolve: E::class_map,
        }
    }
    pub fn id(&self) -> TypeId {
        self.id
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    /// Build the mapping, bypassing any cache.
    pub fn resolve(&self) -> ClassMap {
        (self.resolve)()
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
