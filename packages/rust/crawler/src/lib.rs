//! Listing site access and HTML extraction.
//!
//! This crate provides:
//! - [`HololistClient`]: fetches ranking pages and persona profile pages
//! - [`parse_listing_page`]: ranking page → [`BasicRecord`](vtdex_shared::BasicRecord)s
//! - [`parse_detail_page`]: profile page → [`DetailRecord`](vtdex_shared::DetailRecord)

pub mod client;
pub mod detail;
pub mod listing;

pub use client::HololistClient;
pub use detail::parse_detail_page;
pub use listing::parse_listing_page;
