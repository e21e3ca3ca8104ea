use quill::{AsValue, ClassMap, Entity, KeyType, PropertyMap, Result, Value};
use time::PrimitiveDateTime;
use uuid::Uuid;

/// Identity key found by convention, one ignored property.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub active: bool,
    pub date_created: Option<PrimitiveDateTime>,
    pub full_name: String,
}

impl Entity for Person {
    fn class_map() -> ClassMap {
        ClassMap::new("person")
            .map(PropertyMap::new("full_name").ignore())
            .auto_map(
                &[
                    "id",
                    "first_name",
                    "last_name",
                    "age",
                    "active",
                    "date_created",
                ],
                &Self::default(),
            )
    }

    fn get_value(&self, property: &str) -> Option<Value> {
        Some(match property {
            "id" => self.id.as_value(),
            "first_name" => self.first_name.clone().as_value(),
            "last_name" => self.last_name.clone().as_value(),
            "age" => self.age.as_value(),
            "active" => self.active.as_value(),
            "date_created" => self.date_created.as_value(),
            "full_name" => self.full_name.clone().as_value(),
            _ => return None,
        })
    }

    fn set_value(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "id" => self.id = AsValue::try_from_value(value)?,
            "first_name" => self.first_name = AsValue::try_from_value(value)?,
            "last_name" => self.last_name = AsValue::try_from_value(value)?,
            "age" => self.age = AsValue::try_from_value(value)?,
            "active" => self.active = AsValue::try_from_value(value)?,
            "date_created" => self.date_created = AsValue::try_from_value(value)?,
            "full_name" => self.full_name = AsValue::try_from_value(value)?,
            _ => return Err(quill::Error::msg(format!("Person has no property {property}"))),
        }
        Ok(())
    }
}

/// GUID key found by convention.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Animal {
    pub id: Uuid,
    pub name: String,
}

impl Entity for Animal {
    fn class_map() -> ClassMap {
        ClassMap::new("animal").auto_map(&["id", "name"], &Self::default())
    }

    fn get_value(&self, property: &str) -> Option<Value> {
        match property {
            "id" => Some(self.id.as_value()),
            "name" => Some(self.name.clone().as_value()),
            _ => None,
        }
    }

    fn set_value(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "id" => self.id = AsValue::try_from_value(value)?,
            "name" => self.name = AsValue::try_from_value(value)?,
            _ => return Err(quill::Error::msg(format!("Animal has no property {property}"))),
        }
        Ok(())
    }
}

/// Composite key of two assigned properties.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Multikey {
    pub key1: i64,
    pub key2: String,
    pub value: String,
}

impl Entity for Multikey {
    fn class_map() -> ClassMap {
        ClassMap::new("multikey")
            .map(PropertyMap::new("key1").key(KeyType::Assigned))
            .map(PropertyMap::new("key2").key(KeyType::Assigned))
            .map(PropertyMap::new("value"))
    }

    fn get_value(&self, property: &str) -> Option<Value> {
        match property {
            "key1" => Some(self.key1.as_value()),
            "key2" => Some(self.key2.clone().as_value()),
            "value" => Some(self.value.clone().as_value()),
            _ => None,
        }
    }

    fn set_value(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "key1" => self.key1 = AsValue::try_from_value(value)?,
            "key2" => self.key2 = AsValue::try_from_value(value)?,
            "value" => self.value = AsValue::try_from_value(value)?,
            _ => return Err(quill::Error::msg(format!("Multikey has no property {property}"))),
        }
        Ok(())
    }
}

/// Columns named differently from the properties, a schema and a read only column.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Car {
    pub id: String,
    pub name: String,
    pub mileage: i64,
}

impl Entity for Car {
    fn class_map() -> ClassMap {
        ClassMap::new("cars")
            .schema("garage")
            .entity("Car")
            .map(PropertyMap::new("id").column("car_id").key(KeyType::Assigned))
            .map(PropertyMap::new("name").column("car_name"))
            .map(PropertyMap::new("mileage").read_only())
    }

    fn get_value(&self, property: &str) -> Option<Value> {
        match property {
            "id" => Some(self.id.clone().as_value()),
            "name" => Some(self.name.clone().as_value()),
            "mileage" => Some(self.mileage.as_value()),
            _ => None,
        }
    }

    fn set_value(&mut self, property: &str, value: Value) -> Result<()> {
        match property {
            "id" => self.id = AsValue::try_from_value(value)?,
            "name" => self.name = AsValue::try_from_value(value)?,
            "mileage" => self.mileage = AsValue::try_from_value(value)?,
            _ => return Err(quill::Error::msg(format!("Car has no property {property}"))),
        }
        Ok(())
    }
}

/// Nothing but a database generated identity.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Ticket {
    pub ticket_id: i64,
}

impl Entity for Ticket {
    fn class_map() -> ClassMap {
        ClassMap::new("ticket").auto_map(&["ticket_id"], &Self::default())
    }

    fn get_value(&self, property: &str) -> Option<Value> {
        (property == "ticket_id").then(|| self.ticket_id.as_value())
    }

    fn set_value(&mut self, property: &str, value: Value) -> Result<()> {
        if property == "ticket_id" {
            self.ticket_id = AsValue::try_from_value(value)?;
        }
        Ok(())
    }
}
