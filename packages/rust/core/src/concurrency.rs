//! Window-synchronous bounded-concurrency mapping.
//!
//! [`map_windowed`] runs at most `limit` transforms at a time and waits for
//! the whole window before starting the next one. It is not a streaming
//! scheduler: one slow item holds up the following window.
//!
//! Failure is all-or-nothing. The first error observed while awaiting a
//! window fails the call, no later window is started, and results already
//! collected are discarded. The remaining members of the failing window are
//! dropped, which cancels their in-flight I/O. Callers that want to retry
//! must re-run the whole mapping.

use std::future::Future;

use futures::future::try_join_all;
use tracing::trace;

use vtdex_shared::{Result, VtdexError};

/// Map `items` through `transform` with at most `limit` calls in flight,
/// returning results in input order.
///
/// `transform` receives each item together with its index in `items`.
/// `limit == 0` is rejected with a config error before anything runs; an
/// empty `items` returns an empty vector without calling `transform`.
pub async fn map_windowed<T, U, F, Fut>(
    items: Vec<T>,
    limit: usize,
    mut transform: F,
) -> Result<Vec<U>>
where
    F: FnMut(T, usize) -> Fut,
    Fut: Future<Output = Result<U>>,
{
    if limit == 0 {
        return Err(VtdexError::config("concurrency limit must be at least 1"));
    }

    let total = items.len();
    let mut results = Vec::with_capacity(total);
    let mut pending = items.into_iter().enumerate().peekable();

    while pending.peek().is_some() {
        let window: Vec<Fut> = pending
            .by_ref()
            .take(limit)
            .map(|(index, item)| transform(item, index))
            .collect();

        trace!(start = results.len(), size = window.len(), total, "awaiting window");
        results.extend(try_join_all(window).await?);
    }

    Ok(results)
}
