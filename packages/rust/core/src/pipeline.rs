//! Stage pipeline: listing → profile details → channel metadata.
//!
//! Each stage reads the previous stage's output file, does its work, and
//! writes its own file only after the whole stage succeeded. The typed
//! `collect_*` / `attach_*` functions hold the stage logic without any file
//! I/O; the `run_*` functions wrap them with the stage files from
//! [`OutputConfig`](vtdex_shared::OutputConfig).

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use vtdex_crawler::HololistClient;
use vtdex_shared::{
    AppConfig, BasicRecord, DetailRecord, EnrichedRecord, MAX_CHANNEL_BATCH, Result, VtdexError,
};
use vtdex_youtube::YoutubeClient;

use crate::batch::enrich_with_batch_lookup;
use crate::collect::collect_all;
use crate::detail::enrich_all;
use crate::store::{read_records, write_records};

/// The three pipeline stages, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Basic,
    Detailed,
    Youtube,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Basic => "basic",
            Self::Detailed => "detailed",
            Self::Youtube => "youtube",
        })
    }
}

/// Summary of one completed stage.
#[derive(Debug)]
pub struct StageResult {
    pub stage: Stage,
    /// Records written.
    pub records: usize,
    /// Records that received channel metadata (youtube stage only).
    pub matched: Option<usize>,
    /// File the records were written to.
    pub output: PathBuf,
    pub elapsed: Duration,
}

/// Progress callback for reporting stage status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after a listing page was fetched and parsed.
    fn page_fetched(&self, page: u32, records: usize);
    /// Called as each per-record task starts.
    fn item_progress(&self, current: usize, total: usize, detail: &str);
    /// Called when a stage completes.
    fn done(&self, result: &StageResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_fetched(&self, _page: u32, _records: usize) {}
    fn item_progress(&self, _current: usize, _total: usize, _detail: &str) {}
    fn done(&self, _result: &StageResult) {}
}

// ---------------------------------------------------------------------------
// Typed stages
// ---------------------------------------------------------------------------

/// Walk the ranking pages until the first empty one.
pub async fn collect_basic(
    client: &HololistClient,
    progress: &dyn ProgressReporter,
) -> Result<Vec<BasicRecord>> {
    collect_all(|page| async move {
        let records = client.fetch_listing_page(page).await?;
        progress.page_fetched(page, records.len());
        Ok(records)
    })
    .await
}

/// Fetch and sanitize the profile page of every record.
pub async fn collect_details(
    client: &HololistClient,
    records: Vec<BasicRecord>,
    concurrency: usize,
    progress: &dyn ProgressReporter,
) -> Result<Vec<DetailRecord>> {
    enrich_all(records, concurrency, |record| client.fetch_detail(record), progress).await
}

/// Attach channel metadata to every record that carries a channel key.
///
/// `batch_size` must be between 1 and [`MAX_CHANNEL_BATCH`].
pub async fn attach_channels(
    client: &YoutubeClient,
    records: Vec<DetailRecord>,
    batch_size: usize,
) -> Result<Vec<EnrichedRecord>> {
    if batch_size > MAX_CHANNEL_BATCH {
        return Err(VtdexError::config(format!(
            "youtube batch_size {batch_size} exceeds the API limit of {MAX_CHANNEL_BATCH}"
        )));
    }

    let merged = enrich_with_batch_lookup(
        records,
        |record: &DetailRecord| record.channel_key().map(String::from),
        batch_size,
        |ids| async move { client.lookup_channels(&ids).await },
    )
    .await?;

    Ok(merged
        .into_iter()
        .map(|(detail, channel)| EnrichedRecord { detail, channel })
        .collect())
}

// ---------------------------------------------------------------------------
// File-backed stages
// ---------------------------------------------------------------------------

/// Collect the listing and write the basic stage file.
#[instrument(skip_all)]
pub async fn run_basic(config: &AppConfig, progress: &dyn ProgressReporter) -> Result<StageResult> {
    let start = Instant::now();
    let output = config.output.basic_path();
    info!(base_url = %config.listing.base_url, "starting basic stage");

    progress.phase("Collecting listing pages");
    let client = HololistClient::new(&config.listing)?;
    let records = collect_basic(&client, progress).await?;

    progress.phase("Writing basic records");
    write_records(&output, &records)?;

    Ok(finish(Stage::Basic, records.len(), None, output, start, progress))
}

/// Read the basic stage file, fetch every profile, and write the detailed file.
#[instrument(skip_all)]
pub async fn run_detailed(
    config: &AppConfig,
    progress: &dyn ProgressReporter,
) -> Result<StageResult> {
    let start = Instant::now();
    let input = config.output.basic_path();
    let output = config.output.detailed_path();

    let records: Vec<BasicRecord> = read_records(&input)?;
    info!(
        input = %input.display(),
        records = records.len(),
        concurrency = config.listing.detail_concurrency,
        "starting detailed stage"
    );

    progress.phase("Fetching profile pages");
    let client = HololistClient::new(&config.listing)?;
    let detailed =
        collect_details(&client, records, config.listing.detail_concurrency, progress).await?;

    progress.phase("Writing detailed records");
    write_records(&output, &detailed)?;

    Ok(finish(Stage::Detailed, detailed.len(), None, output, start, progress))
}

/// Read the detailed stage file, look up channels, and write the youtube file.
#[instrument(skip_all)]
pub async fn run_youtube(
    config: &AppConfig,
    api_key: &str,
    progress: &dyn ProgressReporter,
) -> Result<StageResult> {
    let start = Instant::now();
    let input = config.output.detailed_path();
    let output = config.output.youtube_path();

    let records: Vec<DetailRecord> = read_records(&input)?;
    info!(
        input = %input.display(),
        records = records.len(),
        batch_size = config.youtube.batch_size,
        "starting youtube stage"
    );

    progress.phase("Looking up YouTube channels");
    let client = YoutubeClient::new(&config.youtube, api_key)?;
    let enriched = attach_channels(&client, records, config.youtube.batch_size).await?;
    let matched = enriched.iter().filter(|r| r.channel.is_some()).count();

    progress.phase("Writing enriched records");
    write_records(&output, &enriched)?;

    Ok(finish(Stage::Youtube, enriched.len(), Some(matched), output, start, progress))
}

/// Run all three stages back to back.
pub async fn run_all(
    config: &AppConfig,
    api_key: &str,
    progress: &dyn ProgressReporter,
) -> Result<Vec<StageResult>> {
    Ok(vec![
        run_basic(config, progress).await?,
        run_detailed(config, progress).await?,
        run_youtube(config, api_key, progress).await?,
    ])
}

fn finish(
    stage: Stage,
    records: usize,
    matched: Option<usize>,
    output: PathBuf,
    start: Instant,
    progress: &dyn ProgressReporter,
) -> StageResult {
    let result = StageResult {
        stage,
        records,
        matched,
        output,
        elapsed: start.elapsed(),
    };

    progress.done(&result);
    info!(
        %stage,
        records = result.records,
        matched = ?result.matched,
        output = %result.output.display(),
        elapsed_ms = result.elapsed.as_millis(),
        "stage complete"
    );

    result
}
