mod as_value;
mod class_map;
mod config;
mod database;
mod dialect;
mod entity;
mod error;
mod executor;
mod generator;
mod implementor;
mod multiple;
mod parameters;
mod predicate;
mod query;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use class_map::*;
pub use config::*;
pub use database::*;
pub use dialect::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use generator::*;
pub use implementor::*;
pub use multiple::*;
pub use parameters::*;
pub use predicate::*;
pub use query::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
