use crate::{Entity, QueryError, Result, Value};
use std::borrow::Cow;

/// How a key property gets its value.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Not part of the key.
    #[default]
    NotAKey,
    /// Generated by the database, read back after the insert.
    Identity,
    /// Generated by quill right before the insert when unset.
    Guid,
    /// Supplied by the caller, never generated.
    Assigned,
}

impl KeyType {
    pub fn is_key(&self) -> bool {
        *self != KeyType::NotAKey
    }
}

/// Mapping of one entity property to its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMap {
    pub name: Cow<'static, str>,
    pub column_name: Cow<'static, str>,
    pub key_type: KeyType,
    pub ignored: bool,
    pub read_only: bool,
}

impl PropertyMap {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        Self {
            column_name: name.clone(),
            name,
            key_type: KeyType::NotAKey,
            ignored: false,
            read_only: false,
        }
    }
    pub fn column(mut self, column_name: impl Into<Cow<'static, str>>) -> Self {
        self.column_name = column_name.into();
        self
    }
    pub fn key(mut self, key_type: KeyType) -> Self {
        self.key_type = key_type;
        self
    }
    /// The property has no column, it is never selected nor written.
    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }
    /// The column is selected but never inserted nor updated.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
    pub fn is_key(&self) -> bool {
        self.key_type.is_key()
    }
}

/// Resolved mapping of an entity type: table name and property mappings.
///
/// Built once per entity by [`Entity::class_map`], cached by the [`crate::Configuration`]
/// and never mutated afterwards. Property order only affects the text of the generated SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMap {
    pub entity_name: Cow<'static, str>,
    pub schema_name: Option<Cow<'static, str>>,
    pub table_name: Cow<'static, str>,
    pub properties: Vec<PropertyMap>,
}

impl ClassMap {
    pub fn new(table_name: impl Into<Cow<'static, str>>) -> Self {
        let table_name = table_name.into();
        Self {
            entity_name: table_name.clone(),
            schema_name: None,
            table_name,
            properties: Vec::new(),
        }
    }

    pub fn schema(mut self, schema_name: impl Into<Cow<'static, str>>) -> Self {
        self.schema_name = Some(schema_name.into());
        self
    }

    /// Name used in error messages and logs, defaults to the table name.
    pub fn entity(mut self, entity_name: impl Into<Cow<'static, str>>) -> Self {
        self.entity_name = entity_name.into();
        self
    }

    /// Add a property mapping, replacing any previous mapping with the same name.
    pub fn map(mut self, property: PropertyMap) -> Self {
        if let Some(existing) = self.properties.iter_mut().find(|p| p.name == property.name) {
            *existing = property;
        } else {
            self.properties.push(property);
        }
        self
    }

    /// Map by convention every name in `properties` that is not mapped yet.
    ///
    /// When no key was declared explicitly the key is the property called `id` (any case)
    /// or else the first property whose name ends with `id`. Its key type comes from the
    /// value the prototype holds for it: a UUID makes a `Guid` key, an integer an `Identity`
    /// key and anything else an `Assigned` key.
    pub fn auto_map<E: Entity>(mut self, properties: &[&'static str], prototype: &E) -> Self {
        let has_key = self.properties.iter().any(PropertyMap::is_key);
        for name in properties {
            if !self.properties.iter().any(|p| p.name == *name) {
                self.properties.push(PropertyMap::new(*name));
            }
        }
        if has_key {
            return self;
        }
        let key = self
            .properties
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case("id"))
            .or_else(|| {
                self.properties
                    .iter()
                    .position(|p| p.name.to_ascii_lowercase().ends_with("id"))
            });
        if let Some(key) = key {
            let property = &mut self.properties[key];
            property.key_type = match prototype.get_value(&property.name) {
                Some(Value::Uuid(..)) => KeyType::Guid,
                Some(Value::Int32(..) | Value::Int64(..)) => KeyType::Identity,
                _ => KeyType::Assigned,
            };
        }
        self
    }

    /// Find a property by name, the lookup of every predicate and sort.
    pub fn property(&self, name: &str) -> Result<&PropertyMap> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| {
                QueryError::UnknownProperty {
                    entity: self.entity_name.to_string(),
                    property: name.to_string(),
                }
                .into()
            })
    }

    /// Find the property a result column belongs to, by property name first then by column name.
    pub fn property_for_label(&self, label: &str) -> Option<&PropertyMap> {
        let mut mapped = self.properties.iter().filter(|p| !p.ignored);
        mapped
            .clone()
            .find(|p| p.name == label)
            .or_else(|| mapped.find(|p| p.column_name.eq_ignore_ascii_case(label)))
    }

    /// Properties having a column.
    pub fn columns(&self) -> impl Iterator<Item = &PropertyMap> + Clone {
        self.properties.iter().filter(|p| !p.ignored)
    }

    /// Every property whose key type is not `NotAKey`.
    pub fn keys(&self) -> impl Iterator<Item = &PropertyMap> + Clone {
        self.columns().filter(|p| p.is_key())
    }

    pub fn identity(&self) -> Option<&PropertyMap> {
        self.keys().find(|p| p.key_type == KeyType::Identity)
    }

    /// Columns listed by INSERT: database generated identities and read only columns are left out.
    pub fn insertable(&self) -> impl Iterator<Item = &PropertyMap> + Clone {
        self.columns()
            .filter(|p| !p.read_only && p.key_type != KeyType::Identity)
    }

    /// Columns listed by the SET clause of UPDATE.
    pub fn updatable(&self, exclude_assigned_keys: bool) -> impl Iterator<Item = &PropertyMap> + Clone {
        self.columns().filter(move |p| {
            !p.read_only
                && match p.key_type {
                    KeyType::NotAKey => true,
                    KeyType::Assigned => !exclude_assigned_keys,
                    KeyType::Identity | KeyType::Guid => false,
                }
        })
    }
}
