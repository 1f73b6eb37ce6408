pub mod bundle;
pub mod entry_point;
pub mod internal_txs;
pub mod user_op;
pub mod writer;

use sea_orm::{sea_query::ArrayType, Value};

/// Binds a list of byte strings as a single `bytea[]` parameter, for `= ANY($n)` filters.
pub(crate) fn bytes_array<I, T>(items: I) -> Value
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let values = items
        .into_iter()
        .map(|item| Value::Bytes(Some(Box::new(item.as_ref().to_vec()))))
        .collect::<Vec<_>>();
    Value::Array(ArrayType::Bytes, Some(Box::new(values)))
}
