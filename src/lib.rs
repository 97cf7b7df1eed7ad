pub mod modules;
pub mod schema;
pub mod shared;

use modules::contacts::ContactRepositoryImpl;
use modules::data_import::ImportService;
use shared::errors::AppResult;
use shared::utils::logger::init_logger;
use shared::{AppConfig, Database};
use std::sync::Arc;

/// Wire the import service over the Postgres contact store
pub fn bootstrap(config: AppConfig) -> AppResult<ImportService> {
    init_logger();

    let database = Arc::new(Database::new(&config.database_url)?);
    let contact_repo =
        Arc::new(ContactRepositoryImpl::new(database).with_statement_timeout(config.import.pair_timeout));

    log_info!(
        "Import service ready (concurrency {}, pair timeout {:?}, max file {} bytes)",
        config.import.max_concurrency,
        config.import.pair_timeout,
        config.import.max_file_bytes
    );

    Ok(ImportService::new(contact_repo, config.import))
}
