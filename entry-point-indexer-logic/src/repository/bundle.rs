use crate::repository::{bytes_array, user_op::count};
use alloy::primitives::ChainId;
use entity::entry_point_txs;
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, Statement};

/// Number of chain transactions calling one of the bundle `selectors`.
pub async fn count_bundles(
    db: &DatabaseConnection,
    chain_id: ChainId,
    selectors: &[[u8; 4]],
) -> Result<u64, anyhow::Error> {
    count(
        db,
        Statement::from_sql_and_values(
            db.get_database_backend(),
            "SELECT count(*) AS count FROM entry_point_txs WHERE chain_id = $1 AND method_id = ANY($2)",
            [(chain_id as i64).into(), bytes_array(selectors)],
        ),
    )
    .await
}

pub async fn list_bundles(
    db: &DatabaseConnection,
    chain_id: ChainId,
    selectors: &[[u8; 4]],
    limit: u64,
    offset: u64,
) -> Result<Vec<entry_point_txs::Model>, anyhow::Error> {
    let txs = entry_point_txs::Model::find_by_statement(Statement::from_sql_and_values(
        db.get_database_backend(),
        r#"
SELECT *
FROM entry_point_txs
WHERE chain_id = $1
  AND method_id = ANY($2)
ORDER BY timestamp DESC, transaction_index DESC
LIMIT $3 OFFSET $4"#,
        [
            (chain_id as i64).into(),
            bytes_array(selectors),
            (limit as i64).into(),
            (offset as i64).into(),
        ],
    ))
    .all(db)
    .await?;
    Ok(txs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        indexer::calldata::BUNDLE_SELECTORS,
        test_utils::{get_shared_db, CHAIN_ID},
    };
    use pretty_assertions::assert_eq;

    #[tokio::test]
    #[ignore = "needs database to run"]
    async fn counts_only_bundle_selectors() {
        let db = get_shared_db().await;

        assert_eq!(count_bundles(&db, CHAIN_ID, &BUNDLE_SELECTORS).await.unwrap(), 2);
        assert_eq!(count_bundles(&db, 999, &BUNDLE_SELECTORS).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "needs database to run"]
    async fn lists_latest_bundles_first() {
        let db = get_shared_db().await;

        let bundles = list_bundles(&db, CHAIN_ID, &BUNDLE_SELECTORS, 10, 0)
            .await
            .unwrap();

        assert_eq!(bundles.len(), 2);
        assert_eq!(bundles[0].block_number, 101);
        assert_eq!(bundles[1].block_number, 100);

        let second_page = list_bundles(&db, CHAIN_ID, &BUNDLE_SELECTORS, 1, 1)
            .await
            .unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].block_number, 100);
    }
}
