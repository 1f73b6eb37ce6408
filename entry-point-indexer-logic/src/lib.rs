pub mod activity;
pub mod explorer;
pub mod indexer;
pub mod repository;
pub mod settings;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use activity::ActivityService;
pub use settings::IndexerSettings;
