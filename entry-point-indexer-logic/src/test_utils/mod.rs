use crate::types::event::UserOperationEventLog;
use alloy::primitives::{address, Address, BlockNumber, ChainId, TxHash, B256, U256};
use blockscout_service_launcher::test_database::TestDbGuard;
use migration::{
    from_sql, Alias, DynIden, IntoIden, MigrationName, MigrationTrait, MigratorTrait, SchemaManager,
};
use sea_orm::{Database, DatabaseConnection, DbErr};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Chain seeded by `fixtures.sql`.
pub const CHAIN_ID: ChainId = 1;

/// Chain that tests writing into the shared database use, so fixture counts stay stable.
pub const SCRATCH_CHAIN_ID: ChainId = 31337;

pub const ENTRY_POINT: Address = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");

static SHARED_DB_MUTEX: Mutex<Option<String>> = Mutex::const_new(None);

pub async fn get_shared_db() -> Arc<DatabaseConnection> {
    let mut initialized = SHARED_DB_MUTEX.lock().await;
    match initialized.clone() {
        None => {
            let client = TestDbGuard::new::<TestMigrator>("shared").await;
            *initialized = Some(client.db_url());
            client.client()
        }
        Some(db_url) => Arc::new(Database::connect(db_url).await.unwrap()),
    }
}

/// Empty database with the schema only.
pub async fn init_db(name: &str) -> TestDbGuard {
    TestDbGuard::new::<migration::Migrator>(name).await
}

pub fn event_log(
    transaction_hash: TxHash,
    log_index: u64,
    block_number: BlockNumber,
) -> UserOperationEventLog {
    UserOperationEventLog {
        chain_id: SCRATCH_CHAIN_ID,
        entry_point: ENTRY_POINT,
        user_op_hash: B256::with_last_byte(log_index as u8),
        sender: address!("0000000000000000000000000000000000000051"),
        paymaster: Address::ZERO,
        nonce: U256::from(log_index),
        success: true,
        actual_gas_cost: U256::from(100),
        actual_gas_used: U256::from(90),
        block_number,
        block_hash: B256::repeat_byte(0xbb),
        timestamp: 1700000000 + block_number,
        gas_price: U256::from(7),
        gas_used: U256::from(21000),
        log_index,
        transaction_hash,
        transaction_index: 0,
    }
}

pub struct TestMigrator;

#[async_trait::async_trait]
impl MigratorTrait for TestMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        let after: Vec<Box<dyn MigrationTrait>> = vec![Box::new(TestMigrationAfter)];
        migration::Migrator::migrations()
            .into_iter()
            .chain(after)
            .collect()
    }

    fn migration_table_name() -> DynIden {
        Alias::new("entry_point_indexer_migrations").into_iden()
    }
}

pub struct TestMigrationAfter;

impl MigrationName for TestMigrationAfter {
    fn name(&self) -> &str {
        "test_migration_after_0"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for TestMigrationAfter {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        from_sql(manager, include_str!("fixtures.sql")).await
    }
}
