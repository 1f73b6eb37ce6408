use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            CREATE INDEX entry_point_logs_chain_id_address_block_number_index ON entry_point_logs (chain_id, address, block_number DESC);

            CREATE INDEX entry_point_logs_chain_id_timestamp_index ON entry_point_logs (chain_id, timestamp DESC);

            CREATE INDEX entry_point_logs_chain_id_sender_nonce_index ON entry_point_logs (chain_id, sender, nonce);

            CREATE INDEX entry_point_logs_chain_id_paymaster_index ON entry_point_logs (chain_id, paymaster);

            CREATE INDEX entry_point_logs_chain_id_user_op_hash_index ON entry_point_logs (chain_id, user_op_hash);

            CREATE INDEX entry_point_logs_chain_id_block_number_index ON entry_point_logs (chain_id, block_number);

            CREATE INDEX entry_point_txs_chain_id_address_block_number_index ON entry_point_txs (chain_id, address, block_number DESC);

            CREATE INDEX entry_point_txs_chain_id_tx_from_index ON entry_point_txs (chain_id, tx_from);

            CREATE INDEX entry_point_txs_chain_id_method_id_timestamp_index ON entry_point_txs (chain_id, method_id, timestamp DESC);

            CREATE INDEX user_operation_info_chain_id_beneficiary_index ON user_operation_info (chain_id, beneficiary);
        "#;
        crate::from_sql(manager, sql).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            DROP INDEX entry_point_logs_chain_id_address_block_number_index;

            DROP INDEX entry_point_logs_chain_id_timestamp_index;

            DROP INDEX entry_point_logs_chain_id_sender_nonce_index;

            DROP INDEX entry_point_logs_chain_id_paymaster_index;

            DROP INDEX entry_point_logs_chain_id_user_op_hash_index;

            DROP INDEX entry_point_logs_chain_id_block_number_index;

            DROP INDEX entry_point_txs_chain_id_address_block_number_index;

            DROP INDEX entry_point_txs_chain_id_tx_from_index;

            DROP INDEX entry_point_txs_chain_id_method_id_timestamp_index;

            DROP INDEX user_operation_info_chain_id_beneficiary_index;
        "#;
        crate::from_sql(manager, sql).await
    }
}
