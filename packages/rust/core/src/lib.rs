//! Scraping pipeline and its generic building blocks for vtdex.
//!
//! The building blocks ([`map_windowed`], [`sanitize`](sanitize::sanitize),
//! [`collect_all`], [`enrich_all`], [`enrich_with_batch_lookup`]) know
//! nothing about HTTP; [`pipeline`] wires them to the listing-site and
//! YouTube clients and the stage files.

pub mod batch;
pub mod collect;
pub mod concurrency;
pub mod detail;
pub mod pipeline;
pub mod sanitize;
pub mod store;

pub use batch::enrich_with_batch_lookup;
pub use collect::collect_all;
pub use concurrency::map_windowed;
pub use detail::enrich_all;
pub use pipeline::{ProgressReporter, SilentProgress, Stage, StageResult};
pub use sanitize::{UNKNOWN_SENTINEL, ZeroValues};
