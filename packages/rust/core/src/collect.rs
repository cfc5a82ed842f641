//! Paginated collection of listing records.

use std::future::Future;

use tracing::{debug, info};

use vtdex_shared::Result;

/// Fetch pages 1, 2, 3, ... until one comes back empty, concatenating the
/// records of every earlier page in fetch order.
///
/// There is no page cap; the empty page is the only stop signal. Malformed
/// entries are filtered out by the page fetcher, so a page counts as empty
/// only when none of its entries survived. The first fetch error aborts
/// collection.
pub async fn collect_all<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut records = Vec::new();

    for page in 1u32.. {
        info!(page, "fetching page");
        let batch = fetch_page(page).await?;

        if batch.is_empty() {
            debug!(page, total = records.len(), "empty page, stopping");
            break;
        }
        records.extend(batch);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use vtdex_shared::VtdexError;

    #[tokio::test]
    async fn stops_at_first_empty_page() {
        let calls = Mutex::new(Vec::new());

        let records = collect_all(|page| {
            calls.lock().unwrap().push(page);
            async move {
                Ok(match page {
                    1 => vec!["rec1", "rec2"],
                    _ => vec![],
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(records, vec!["rec1", "rec2"]);
        assert_eq!(*calls.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn concatenates_pages_in_fetch_order() {
        let records = collect_all(|page| async move {
            Ok(if page <= 3 {
                vec![page * 10, page * 10 + 1]
            } else {
                vec![]
            })
        })
        .await
        .unwrap();

        assert_eq!(records, vec![10, 11, 20, 21, 30, 31]);
    }

    #[tokio::test]
    async fn empty_first_page_yields_nothing() {
        let records: Vec<String> = collect_all(|_| async { Ok(vec![]) }).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn fetch_error_aborts_collection() {
        let result: Result<Vec<u32>> = collect_all(|page| async move {
            if page == 2 {
                Err(VtdexError::Network("page 2: HTTP 503".into()))
            } else {
                Ok(vec![page])
            }
        })
        .await;

        assert!(matches!(result, Err(VtdexError::Network(_))));
    }
}
