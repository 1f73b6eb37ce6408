mod indexer;
mod settings;

use entry_point_indexer_logic::ActivityService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub use indexer::run as run_indexer;
pub use settings::{ApiSettings, Settings};

/// Read-side service over the indexed data, limited by the configured page size.
pub fn activity_service(
    settings: &Settings,
    db_connection: Arc<DatabaseConnection>,
) -> ActivityService {
    ActivityService::new(db_connection, settings.api.max_page_size)
}
