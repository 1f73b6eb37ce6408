use crate::{explorer::types::InternalTx, types::common::{address_from_db, b256_from_db}};
use alloy::primitives::{Address, ChainId, TxHash};
use entity::entry_point_internal_txs;
use sea_orm::{
    sea_query::OnConflict, ActiveValue::Set, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, Statement,
};

#[derive(FromQueryResult)]
struct PendingTxDB {
    hash: Vec<u8>,
    address: Vec<u8>,
}

/// Most recent bundler transaction of the chain with no stored internal traces.
pub async fn find_tx_without_internal_txs(
    db: &DatabaseConnection,
    chain_id: ChainId,
) -> Result<Option<(TxHash, Address)>, anyhow::Error> {
    let pending = PendingTxDB::find_by_statement(Statement::from_sql_and_values(
        db.get_database_backend(),
        r#"
SELECT t.hash, t.address
FROM entry_point_txs t
         LEFT JOIN entry_point_internal_txs i
                   ON i.chain_id = t.chain_id AND i.transaction_hash = t.hash
WHERE t.chain_id = $1
  AND i.transaction_hash IS NULL
ORDER BY t.block_number DESC
LIMIT 1"#,
        [(chain_id as i64).into()],
    ))
    .one(db)
    .await?
    .map(|row| (b256_from_db(&row.hash), address_from_db(&row.address)));
    Ok(pending)
}

/// Stores the traces of a transaction. Traces are immutable, so an already
/// stored record is left untouched.
pub async fn insert_internal_txs(
    db: &DatabaseConnection,
    chain_id: ChainId,
    entry_point: Address,
    tx_hash: TxHash,
    internal_txs: &[InternalTx],
) -> Result<(), anyhow::Error> {
    let model = entry_point_internal_txs::ActiveModel {
        chain_id: Set(chain_id as i64),
        transaction_hash: Set(tx_hash.to_vec()),
        address: Set(entry_point.to_vec()),
        internal_txs: Set(serde_json::to_value(internal_txs)?),
        ..Default::default()
    };
    entry_point_internal_txs::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([
                entry_point_internal_txs::Column::ChainId,
                entry_point_internal_txs::Column::TransactionHash,
            ])
            .do_nothing()
            .to_owned(),
        )
        .do_nothing()
        .exec(db)
        .await?;
    Ok(())
}
