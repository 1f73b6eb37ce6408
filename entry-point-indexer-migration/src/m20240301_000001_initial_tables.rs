use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            CREATE TABLE entry_point_config (
                address bytea NOT NULL PRIMARY KEY,
                name varchar NOT NULL,
                support_chains jsonb NOT NULL DEFAULT '[]'::jsonb,
                user_operation_event_topic bytea NOT NULL,
                account_deployed_topic bytea NOT NULL,
                revert_reason_topic bytea NOT NULL,
                created_at timestamp NOT NULL DEFAULT (now())
            );

            CREATE TABLE scan_config (
                chain_id bigint NOT NULL PRIMARY KEY,
                scan_url varchar NOT NULL,
                api_key varchar NOT NULL DEFAULT '',
                created_at timestamp NOT NULL DEFAULT (now())
            );

            CREATE TABLE entry_point_logs (
                chain_id bigint NOT NULL,
                transaction_hash bytea NOT NULL,
                log_index bigint NOT NULL,
                address bytea NOT NULL,
                user_op_hash bytea NOT NULL,
                sender bytea NOT NULL,
                paymaster bytea NOT NULL,
                nonce numeric(100, 0) NOT NULL,
                success varchar(1) NOT NULL,
                actual_gas_cost numeric(100, 0) NOT NULL,
                actual_gas_used numeric(100, 0) NOT NULL,
                block_number bigint NOT NULL,
                block_hash bytea NOT NULL,
                timestamp bigint NOT NULL,
                gas_price numeric(100, 0) NOT NULL,
                gas_used numeric(100, 0) NOT NULL,
                transaction_index bigint NOT NULL,
                inserted_at timestamp NOT NULL DEFAULT (now()),
                PRIMARY KEY (chain_id, transaction_hash, log_index)
            );

            CREATE TABLE entry_point_txs (
                chain_id bigint NOT NULL,
                hash bytea NOT NULL,
                address bytea NOT NULL,
                nonce numeric(100, 0) NOT NULL,
                block_number bigint NOT NULL,
                block_hash bytea NOT NULL,
                transaction_index bigint NOT NULL,
                tx_from bytea NOT NULL,
                tx_to bytea,
                value numeric(100, 0) NOT NULL,
                timestamp bigint NOT NULL,
                gas numeric(100, 0) NOT NULL,
                gas_price numeric(100, 0) NOT NULL,
                gas_used numeric(100, 0) NOT NULL,
                cumulative_gas_used numeric(100, 0) NOT NULL,
                is_error boolean NOT NULL,
                receipt_status varchar NOT NULL,
                contract_address bytea,
                input bytea NOT NULL,
                method_id bytea,
                function_name varchar NOT NULL,
                inserted_at timestamp NOT NULL DEFAULT (now()),
                PRIMARY KEY (chain_id, hash)
            );

            CREATE TABLE user_operation_info (
                chain_id bigint NOT NULL,
                transaction_hash bytea NOT NULL,
                sender bytea NOT NULL,
                nonce numeric(100, 0) NOT NULL,
                address bytea NOT NULL,
                init_code bytea NOT NULL,
                call_data bytea NOT NULL,
                call_gas_limit numeric(100, 0) NOT NULL,
                verification_gas_limit numeric(100, 0) NOT NULL,
                pre_verification_gas numeric(100, 0) NOT NULL,
                max_fee_per_gas numeric(100, 0) NOT NULL,
                max_priority_fee_per_gas numeric(100, 0) NOT NULL,
                paymaster_and_data bytea NOT NULL,
                signature bytea NOT NULL,
                beneficiary bytea NOT NULL,
                factory bytea NOT NULL,
                inserted_at timestamp NOT NULL DEFAULT (now()),
                PRIMARY KEY (chain_id, transaction_hash, sender, nonce)
            );

            CREATE TABLE account_deployed_logs (
                chain_id bigint NOT NULL,
                user_op_hash bytea NOT NULL,
                address bytea NOT NULL,
                sender bytea NOT NULL,
                factory bytea NOT NULL,
                paymaster bytea NOT NULL,
                transaction_hash bytea NOT NULL,
                inserted_at timestamp NOT NULL DEFAULT (now()),
                PRIMARY KEY (chain_id, user_op_hash)
            );

            CREATE TABLE revert_reason_logs (
                chain_id bigint NOT NULL,
                user_op_hash bytea NOT NULL,
                address bytea NOT NULL,
                sender bytea NOT NULL,
                nonce numeric(100, 0) NOT NULL,
                revert_reason bytea NOT NULL,
                transaction_hash bytea NOT NULL,
                inserted_at timestamp NOT NULL DEFAULT (now()),
                PRIMARY KEY (chain_id, user_op_hash)
            );

            CREATE TABLE entry_point_internal_txs (
                chain_id bigint NOT NULL,
                transaction_hash bytea NOT NULL,
                address bytea NOT NULL,
                internal_txs jsonb NOT NULL,
                inserted_at timestamp NOT NULL DEFAULT (now()),
                PRIMARY KEY (chain_id, transaction_hash)
            );
        "#;
        crate::from_sql(manager, sql).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            DROP TABLE entry_point_internal_txs;
            DROP TABLE revert_reason_logs;
            DROP TABLE account_deployed_logs;
            DROP TABLE user_operation_info;
            DROP TABLE entry_point_txs;
            DROP TABLE entry_point_logs;
            DROP TABLE scan_config;
            DROP TABLE entry_point_config;
        "#;
        crate::from_sql(manager, sql).await
    }
}
