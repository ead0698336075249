use rocksdb::Transaction;
use rocksdb::TransactionDB;

use crate::Result;

pub fn next_seq<K: AsRef<[u8]>>(tx: &Transaction<TransactionDB>, key: K) -> Result<u64> {
    let id = tx.get(key.as_ref())?;
    let result: u64 = match id {
        Some(v) => u64::from_be_bytes(v.try_into().unwrap()) + 1,
        None => 1,
    };
    tx.put(key, result.to_be_bytes())?;

    Ok(result)
}
