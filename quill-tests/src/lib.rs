mod crud;
mod fixtures;
mod mock;
mod multiple;
mod queries;
mod transaction;

pub use fixtures::*;
pub use mock::*;

use crate::{crud::crud, multiple::multiple, queries::queries, transaction::transaction};
use log::LevelFilter;
use quill::Dialect;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run the behaviour every dialect must share against a [`MockConnection`].
pub async fn execute_tests<D: Dialect + Clone + 'static>(dialect: D) {
    crud(dialect.clone()).await;
    queries(dialect.clone()).await;
    multiple(dialect.clone()).await;
    transaction(dialect).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
