//! Batched external lookup with merge-back by key.

use std::collections::HashMap;
use std::future::Future;

use tracing::{debug, info, instrument};

use vtdex_shared::{Result, VtdexError};

/// Resolve every keyed record through `lookup_batch`, `batch_size` keys per
/// call, and pair each record with the metadata found for its key.
///
/// - Records whose key is `None` or empty are never looked up and come back
///   with `None`.
/// - Keys are chunked in record order; chunks are looked up one after
///   another. No call is made when no record has a key.
/// - A key missing from a lookup response is not an error; its record comes
///   back with `None`.
/// - Output order matches `records`.
///
/// A failed lookup aborts the whole operation.
#[instrument(skip_all, fields(records = records.len(), batch_size = batch_size))]
pub async fn enrich_with_batch_lookup<R, M, K, L, Fut>(
    records: Vec<R>,
    join_key: K,
    batch_size: usize,
    mut lookup_batch: L,
) -> Result<Vec<(R, Option<M>)>>
where
    M: Clone,
    K: Fn(&R) -> Option<String>,
    L: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<HashMap<String, M>>>,
{
    if batch_size == 0 {
        return Err(VtdexError::config("batch size must be at least 1"));
    }

    let keys: Vec<Option<String>> = records
        .iter()
        .map(|record| join_key(record).filter(|key| !key.is_empty()))
        .collect();
    let lookup_keys: Vec<String> = keys.iter().flatten().cloned().collect();

    let batches = lookup_keys.len().div_ceil(batch_size);
    info!(
        keyed = lookup_keys.len(),
        unkeyed = records.len() - lookup_keys.len(),
        batches,
        "split into batches"
    );

    let mut found: HashMap<String, M> = HashMap::new();
    for (index, chunk) in lookup_keys.chunks(batch_size).enumerate() {
        info!(batch = index + 1, batches, keys = chunk.len(), "looking up batch");
        let response = lookup_batch(chunk.to_vec()).await?;
        debug!(requested = chunk.len(), returned = response.len(), "batch resolved");
        found.extend(response);
    }

    Ok(records
        .into_iter()
        .zip(keys)
        .map(|(record, key)| {
            let metadata = key.and_then(|key| found.get(&key).cloned());
            (record, metadata)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Rec {
        id: u32,
        key: &'static str,
    }

    fn rec(id: u32, key: &'static str) -> Rec {
        Rec { id, key }
    }

    fn key_of(record: &Rec) -> Option<String> {
        Some(record.key.to_string())
    }

    #[tokio::test]
    async fn partitions_in_order_and_merges_by_key() {
        let records = vec![
            rec(1, "k1"),
            rec(2, "k2"),
            rec(3, "k3"),
            rec(4, "k4"),
            rec(5, "k5"),
        ];
        let mut calls: Vec<Vec<String>> = Vec::new();

        let merged = enrich_with_batch_lookup(records.clone(), key_of, 2, |keys| {
            calls.push(keys.clone());
            let response: HashMap<String, String> = keys
                .into_iter()
                .filter(|k| k == "k1" || k == "k4")
                .map(|k| (k.clone(), format!("meta-{k}")))
                .collect();
            async move { Ok(response) }
        })
        .await
        .unwrap();

        assert_eq!(calls, vec![vec!["k1", "k2"], vec!["k3", "k4"], vec!["k5"]]);

        let (out_records, metadata): (Vec<Rec>, Vec<Option<String>>) =
            merged.into_iter().unzip();
        assert_eq!(out_records, records);
        assert_eq!(
            metadata,
            vec![
                Some("meta-k1".to_string()),
                None,
                None,
                Some("meta-k4".to_string()),
                None
            ]
        );
    }

    #[tokio::test]
    async fn empty_keys_are_never_looked_up() {
        let records = vec![rec(1, ""), rec(2, "k2"), rec(3, ""), rec(4, "k4")];
        let mut calls: Vec<Vec<String>> = Vec::new();

        let merged = enrich_with_batch_lookup(records, key_of, 50, |keys| {
            calls.push(keys.clone());
            let response: HashMap<String, u32> =
                keys.into_iter().map(|k| (k, 7)).collect();
            async move { Ok(response) }
        })
        .await
        .unwrap();

        assert_eq!(calls, vec![vec!["k2", "k4"]]);
        let ids_with_meta: Vec<(u32, Option<u32>)> =
            merged.iter().map(|(r, m)| (r.id, *m)).collect();
        assert_eq!(
            ids_with_meta,
            vec![(1, None), (2, Some(7)), (3, None), (4, Some(7))]
        );
    }

    #[tokio::test]
    async fn no_keys_means_no_calls() {
        let mut calls = 0;
        let merged = enrich_with_batch_lookup(
            vec![rec(1, ""), rec(2, "")],
            key_of,
            2,
            |_keys| {
                calls += 1;
                async { Ok(HashMap::<String, u32>::new()) }
            },
        )
        .await
        .unwrap();

        assert_eq!(calls, 0);
        assert!(merged.iter().all(|(_, m)| m.is_none()));
    }

    #[tokio::test]
    async fn zero_batch_size_is_a_config_error() {
        let err = enrich_with_batch_lookup(vec![rec(1, "k1")], key_of, 0, |_keys| async {
            Ok(HashMap::<String, u32>::new())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, VtdexError::Config { .. }));
    }

    #[tokio::test]
    async fn lookup_failure_aborts() {
        let records = vec![rec(1, "k1"), rec(2, "k2"), rec(3, "k3")];
        let mut calls = 0;

        let result = enrich_with_batch_lookup(records, key_of, 1, |_keys| {
            calls += 1;
            let fail = calls == 2;
            async move {
                if fail {
                    Err(VtdexError::Network("quota exceeded".into()))
                } else {
                    Ok(HashMap::<String, u32>::new())
                }
            }
        })
        .await;

        assert!(matches!(result, Err(VtdexError::Network(_))));
        assert_eq!(calls, 2);
    }
}
