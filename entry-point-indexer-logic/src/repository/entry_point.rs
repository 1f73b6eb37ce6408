use crate::types::entry_point::{EntryPoint, ScanProvider};
use alloy::primitives::{Address, BlockNumber, ChainId};
use entity::{entry_point_config, scan_config};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryOrder, Statement,
};
use std::collections::HashMap;

#[derive(FromQueryResult)]
struct MaxBlockDB {
    max: Option<i64>,
}

#[derive(FromQueryResult)]
struct EntryPointStatsDB {
    ops: i64,
    block_number: Option<i64>,
    timestamp: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryPointStats {
    pub ops: u64,
    pub last_op_block_number: Option<BlockNumber>,
    pub last_op_timestamp: Option<u64>,
}

/// Configured entry points. Rows with a malformed chain list are skipped.
pub async fn load_entry_points(db: &DatabaseConnection) -> Result<Vec<EntryPoint>, anyhow::Error> {
    let entry_points = entry_point_config::Entity::find()
        .order_by_asc(entry_point_config::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|model| {
            EntryPoint::try_from(model)
                .inspect_err(|err| {
                    tracing::error!(error = ?err, "skipping misconfigured entry point");
                })
                .ok()
        })
        .collect();
    Ok(entry_points)
}

pub async fn load_scan_providers(
    db: &DatabaseConnection,
) -> Result<HashMap<ChainId, ScanProvider>, anyhow::Error> {
    let providers = scan_config::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(ScanProvider::from)
        .map(|p| (p.chain_id, p))
        .collect();
    Ok(providers)
}

pub async fn find_scan_provider(
    db: &DatabaseConnection,
    chain_id: ChainId,
) -> Result<Option<ScanProvider>, anyhow::Error> {
    let provider = scan_config::Entity::find_by_id(chain_id as i64)
        .one(db)
        .await?
        .map(ScanProvider::from);
    Ok(provider)
}

pub async fn max_log_block(
    db: &DatabaseConnection,
    chain_id: ChainId,
    entry_point: Address,
) -> Result<Option<BlockNumber>, anyhow::Error> {
    max_block(
        db,
        "SELECT MAX(block_number) AS max FROM entry_point_logs WHERE chain_id = $1 AND address = $2",
        chain_id,
        entry_point,
    )
    .await
}

pub async fn max_tx_block(
    db: &DatabaseConnection,
    chain_id: ChainId,
    entry_point: Address,
) -> Result<Option<BlockNumber>, anyhow::Error> {
    max_block(
        db,
        "SELECT MAX(block_number) AS max FROM entry_point_txs WHERE chain_id = $1 AND address = $2",
        chain_id,
        entry_point,
    )
    .await
}

async fn max_block(
    db: &DatabaseConnection,
    sql: &str,
    chain_id: ChainId,
    entry_point: Address,
) -> Result<Option<BlockNumber>, anyhow::Error> {
    let max = MaxBlockDB::find_by_statement(Statement::from_sql_and_values(
        db.get_database_backend(),
        sql,
        [(chain_id as i64).into(), entry_point.to_vec().into()],
    ))
    .one(db)
    .await?
    .and_then(|row| row.max)
    .map(|max| max.max(0) as BlockNumber);
    Ok(max)
}

/// Number of operations of `entry_point` on a chain, and the position of the latest one.
pub async fn entry_point_stats(
    db: &DatabaseConnection,
    chain_id: ChainId,
    entry_point: Address,
) -> Result<EntryPointStats, anyhow::Error> {
    let stats = EntryPointStatsDB::find_by_statement(Statement::from_sql_and_values(
        db.get_database_backend(),
        r#"
SELECT (SELECT count(*) FROM entry_point_logs WHERE chain_id = $1 AND address = $2) AS ops,
       last_op.block_number,
       last_op.timestamp
FROM (SELECT 1) AS dummy
         LEFT JOIN LATERAL (SELECT block_number, timestamp
                            FROM entry_point_logs
                            WHERE chain_id = $1
                              AND address = $2
                            ORDER BY timestamp DESC
                            LIMIT 1) AS last_op ON true"#,
        [(chain_id as i64).into(), entry_point.to_vec().into()],
    ))
    .one(db)
    .await?
    .map(|row| EntryPointStats {
        ops: row.ops.max(0) as u64,
        last_op_block_number: row.block_number.map(|b| b as BlockNumber),
        last_op_timestamp: row.timestamp.map(|t| t as u64),
    })
    .unwrap_or_default();
    Ok(stats)
}
