use crate::{
    repository::bytes_array,
    types::activity::{ActivityRole, UserOpActivity},
};
use alloy::primitives::{Address, BlockNumber, ChainId, TxHash, B256};
use entity::entry_point_logs;
use sea_orm::{
    prelude::BigDecimal, ConnectionTrait, DatabaseConnection, FromQueryResult, Statement,
};

#[derive(FromQueryResult)]
pub(crate) struct CountDB {
    pub count: i64,
}

/// Log columns joined with everything known about the same operation.
#[derive(FromQueryResult, Debug, Clone)]
pub struct UserOpDetailDB {
    pub chain_id: i64,
    pub transaction_hash: Vec<u8>,
    pub log_index: i64,
    pub address: Vec<u8>,
    pub user_op_hash: Vec<u8>,
    pub sender: Vec<u8>,
    pub paymaster: Vec<u8>,
    pub nonce: BigDecimal,
    pub success: String,
    pub actual_gas_cost: BigDecimal,
    pub actual_gas_used: BigDecimal,
    pub block_number: i64,
    pub block_hash: Vec<u8>,
    pub timestamp: i64,
    pub gas_price: BigDecimal,
    pub gas_used: BigDecimal,
    pub transaction_index: i64,
    pub revert_reason: Option<Vec<u8>>,
    pub init_code: Option<Vec<u8>>,
    pub call_data: Option<Vec<u8>>,
    pub call_gas_limit: Option<BigDecimal>,
    pub verification_gas_limit: Option<BigDecimal>,
    pub pre_verification_gas: Option<BigDecimal>,
    pub max_fee_per_gas: Option<BigDecimal>,
    pub max_priority_fee_per_gas: Option<BigDecimal>,
    pub paymaster_and_data: Option<Vec<u8>>,
    pub signature: Option<Vec<u8>>,
    pub beneficiary: Option<Vec<u8>>,
    pub factory: Option<Vec<u8>>,
    pub internal_txs: Option<serde_json::Value>,
    pub tx_from: Option<Vec<u8>>,
    pub tx_to: Option<Vec<u8>>,
    pub input: Option<Vec<u8>>,
}

/// Join and filter selecting the logs attributed to an address in `role`.
/// The chain is bound as `$1` and the address as `$2`.
fn role_clause(role: ActivityRole) -> (&'static str, &'static str) {
    match role {
        ActivityRole::EntryPoint => ("", "l.address = $2"),
        ActivityRole::Paymaster => ("", "l.paymaster = $2"),
        ActivityRole::Sender => ("", "l.sender = $2"),
        ActivityRole::Bundler => (
            "JOIN entry_point_txs t ON t.chain_id = l.chain_id AND t.hash = l.transaction_hash",
            "t.tx_from = $2",
        ),
        ActivityRole::Beneficiary => (
            "JOIN user_operation_info u ON u.chain_id = l.chain_id \
             AND u.transaction_hash = l.transaction_hash \
             AND u.sender = l.sender \
             AND u.nonce = l.nonce",
            "u.beneficiary = $2",
        ),
    }
}

/// Beneficiaries are counted by decoded bundles; the other roles by matching logs.
pub async fn count_by_role(
    db: &DatabaseConnection,
    chain_id: ChainId,
    role: ActivityRole,
    address: Address,
) -> Result<u64, anyhow::Error> {
    let sql = match role {
        ActivityRole::Beneficiary => {
            "SELECT count(*) AS count FROM user_operation_info u WHERE u.chain_id = $1 AND u.beneficiary = $2"
                .to_string()
        }
        _ => {
            let (join, filter) = role_clause(role);
            format!(
                "SELECT count(*) AS count FROM entry_point_logs l {join} WHERE l.chain_id = $1 AND {filter}"
            )
        }
    };
    count(
        db,
        Statement::from_sql_and_values(
            db.get_database_backend(),
            sql,
            [(chain_id as i64).into(), address.to_vec().into()],
        ),
    )
    .await
}

pub async fn list_by_role(
    db: &DatabaseConnection,
    chain_id: ChainId,
    role: ActivityRole,
    address: Address,
    limit: u64,
    offset: u64,
) -> Result<Vec<UserOpActivity>, anyhow::Error> {
    let (join, filter) = role_clause(role);
    let sql = format!(
        r#"
SELECT l.*
FROM entry_point_logs l
         {join}
WHERE l.chain_id = $1
  AND {filter}
ORDER BY l.timestamp DESC, l.log_index DESC
LIMIT $3 OFFSET $4"#
    );
    list(
        db,
        Statement::from_sql_and_values(
            db.get_database_backend(),
            sql,
            [
                (chain_id as i64).into(),
                address.to_vec().into(),
                (limit as i64).into(),
                (offset as i64).into(),
            ],
        ),
    )
    .await
}

pub async fn count_user_ops(db: &DatabaseConnection, chain_id: ChainId) -> Result<u64, anyhow::Error> {
    count(
        db,
        Statement::from_sql_and_values(
            db.get_database_backend(),
            "SELECT count(*) AS count FROM entry_point_logs WHERE chain_id = $1",
            [(chain_id as i64).into()],
        ),
    )
    .await
}

pub async fn list_user_ops(
    db: &DatabaseConnection,
    chain_id: ChainId,
    limit: u64,
    offset: u64,
) -> Result<Vec<UserOpActivity>, anyhow::Error> {
    list(
        db,
        Statement::from_sql_and_values(
            db.get_database_backend(),
            r#"
SELECT *
FROM entry_point_logs
WHERE chain_id = $1
ORDER BY timestamp DESC, log_index DESC
LIMIT $2 OFFSET $3"#,
            [
                (chain_id as i64).into(),
                (limit as i64).into(),
                (offset as i64).into(),
            ],
        ),
    )
    .await
}

pub async fn list_block_user_ops(
    db: &DatabaseConnection,
    chain_id: ChainId,
    block_number: BlockNumber,
) -> Result<Vec<UserOpActivity>, anyhow::Error> {
    list(
        db,
        Statement::from_sql_and_values(
            db.get_database_backend(),
            r#"
SELECT *
FROM entry_point_logs
WHERE chain_id = $1
  AND block_number = $2
ORDER BY timestamp DESC, log_index DESC"#,
            [(chain_id as i64).into(), (block_number as i64).into()],
        ),
    )
    .await
}

/// Operations executed by the given bundler transactions, in log order.
pub async fn list_by_tx_hashes(
    db: &DatabaseConnection,
    chain_id: ChainId,
    tx_hashes: &[TxHash],
) -> Result<Vec<UserOpActivity>, anyhow::Error> {
    if tx_hashes.is_empty() {
        return Ok(vec![]);
    }
    list(
        db,
        Statement::from_sql_and_values(
            db.get_database_backend(),
            r#"
SELECT *
FROM entry_point_logs
WHERE chain_id = $1
  AND transaction_hash = ANY($2)
ORDER BY transaction_hash, log_index"#,
            [(chain_id as i64).into(), bytes_array(tx_hashes)],
        ),
    )
    .await
}

pub async fn find_details_by_hashes(
    db: &DatabaseConnection,
    chain_id: ChainId,
    user_op_hashes: &[B256],
) -> Result<Vec<UserOpDetailDB>, anyhow::Error> {
    if user_op_hashes.is_empty() {
        return Ok(vec![]);
    }
    let rows = UserOpDetailDB::find_by_statement(Statement::from_sql_and_values(
        db.get_database_backend(),
        r#"
SELECT l.chain_id,
       l.transaction_hash,
       l.log_index,
       l.address,
       l.user_op_hash,
       l.sender,
       l.paymaster,
       l.nonce,
       l.success,
       l.actual_gas_cost,
       l.actual_gas_used,
       l.block_number,
       l.block_hash,
       l.timestamp,
       l.gas_price,
       l.gas_used,
       l.transaction_index,
       r.revert_reason,
       u.init_code,
       u.call_data,
       u.call_gas_limit,
       u.verification_gas_limit,
       u.pre_verification_gas,
       u.max_fee_per_gas,
       u.max_priority_fee_per_gas,
       u.paymaster_and_data,
       u.signature,
       u.beneficiary,
       u.factory,
       i.internal_txs,
       t.tx_from,
       t.tx_to,
       t.input
FROM entry_point_logs l
         LEFT JOIN revert_reason_logs r
                   ON r.chain_id = l.chain_id AND r.user_op_hash = l.user_op_hash
         LEFT JOIN user_operation_info u
                   ON u.chain_id = l.chain_id
                       AND u.transaction_hash = l.transaction_hash
                       AND u.sender = l.sender
                       AND u.nonce = l.nonce
         LEFT JOIN entry_point_internal_txs i
                   ON i.chain_id = l.chain_id AND i.transaction_hash = l.transaction_hash
         LEFT JOIN entry_point_txs t
                   ON t.chain_id = l.chain_id AND t.hash = l.transaction_hash
WHERE l.chain_id = $1
  AND l.user_op_hash = ANY($2)
ORDER BY l.timestamp DESC, l.log_index DESC"#,
        [(chain_id as i64).into(), bytes_array(user_op_hashes)],
    ))
    .all(db)
    .await?;
    Ok(rows)
}

pub(crate) async fn count(db: &DatabaseConnection, stmt: Statement) -> Result<u64, anyhow::Error> {
    let count = CountDB::find_by_statement(stmt)
        .one(db)
        .await?
        .map(|row| row.count.max(0) as u64)
        .unwrap_or_default();
    Ok(count)
}

async fn list(db: &DatabaseConnection, stmt: Statement) -> Result<Vec<UserOpActivity>, anyhow::Error> {
    let items = entry_point_logs::Model::find_by_statement(stmt)
        .all(db)
        .await?
        .into_iter()
        .map(UserOpActivity::from)
        .collect();
    Ok(items)
}
