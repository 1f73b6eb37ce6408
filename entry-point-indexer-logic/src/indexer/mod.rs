pub mod abi;
pub mod backfill;
pub mod calldata;
pub mod cursor;
pub mod events;
pub mod scheduler;
pub mod sync;

pub use backfill::InternalTxBackfiller;
pub use sync::SyncOrchestrator;
