use bincode::deserialize;
use rocksdb::Transaction;
use rocksdb::TransactionDB;
use serde::de::DeserializeOwned;

use crate::metadata::ListResponse;
use crate::metadata::ResponseMetadata;
use crate::Result;

pub fn make_data_value_key(ns: &[u8], id: u64) -> Vec<u8> {
    // big-endian id bytes keep prefix-scan order equal to insertion order
    [ns, b"/data/", id.to_be_bytes().as_ref()].concat()
}

pub fn make_data_key(ns: &[u8]) -> Vec<u8> {
    [ns, b"/data"].concat()
}

pub fn make_id_seq_key(ns: &[u8]) -> Vec<u8> {
    [ns, b"/id_seq"].concat()
}

pub fn list<T>(tx: &Transaction<TransactionDB>, ns: &[u8]) -> Result<ListResponse<T>>
where T: DeserializeOwned {
    let prefix = make_data_key(ns);

    let mut data = Vec::new();
    for kv in tx.prefix_iterator(prefix.as_slice()) {
        let (key, value) = kv?;
        if key.len() < prefix.len() || key[..prefix.len()] != prefix[..] {
            break;
        }
        data.push(deserialize(value.as_ref())?);
    }

    Ok(ListResponse {
        data,
        meta: ResponseMetadata { next: None },
    })
}
