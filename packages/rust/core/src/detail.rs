//! Detail enrichment: one profile fetch per basic record.

use std::future::Future;

use tracing::{error, info, instrument};

use vtdex_shared::{BasicRecord, DetailRecord, Result};

use crate::concurrency::map_windowed;
use crate::pipeline::ProgressReporter;
use crate::sanitize::{ZeroValues, sanitize_record};

/// Default number of profile pages fetched per window.
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 25;

/// Fetch a [`DetailRecord`] for every record, `concurrency` at a time, and
/// sanitize the results with [`ZeroValues::detail_defaults`].
///
/// Output order matches `records`. Any fetch failure aborts the whole run
/// with no partial output, per [`map_windowed`].
#[instrument(skip_all, fields(records = records.len(), concurrency = concurrency))]
pub async fn enrich_all<F, Fut>(
    records: Vec<BasicRecord>,
    concurrency: usize,
    fetch_detail: F,
    progress: &dyn ProgressReporter,
) -> Result<Vec<DetailRecord>>
where
    F: Fn(BasicRecord) -> Fut,
    Fut: Future<Output = Result<DetailRecord>>,
{
    let total = records.len();

    let detailed = map_windowed(records, concurrency, |record, index| {
        info!(name = %record.name, current = index + 1, total, "fetching details");
        progress.item_progress(index + 1, total, &record.name);

        let name = record.name.clone();
        let fetch = fetch_detail(record);
        async move {
            fetch
                .await
                .inspect_err(|e| error!(%name, error = %e, "failed to fetch details"))
        }
    })
    .await?;

    let zero_values = ZeroValues::detail_defaults();
    detailed
        .iter()
        .map(|record| sanitize_record(record, &zero_values))
        .collect()
}
