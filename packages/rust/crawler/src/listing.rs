//! Listing page extraction.
//!
//! Each ranking page holds a column of persona cards. A card without a detail
//! URL or avatar image cannot be enriched later, so it is skipped with a
//! warning instead of failing the page.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

use vtdex_shared::{BasicRecord, Result, VtdexError};

/// Extract every well-formed persona card from a listing page.
///
/// Relative `href`/`data-src` values are resolved against `page_url`.
/// An empty result means either an empty page or a page where every card
/// was malformed; both end pagination.
pub fn parse_listing_page(html: &str, page_url: &Url) -> Vec<BasicRecord> {
    let doc = Html::parse_document(html);
    let card_sel = Selector::parse(".d-flex.mb-4.rounded").unwrap();

    let mut records = Vec::new();
    for card in doc.select(&card_sel) {
        match parse_card(card, page_url) {
            Ok(record) => records.push(record),
            Err(e) => warn!(page = %page_url, error = %e, "skipping listing entry"),
        }
    }
    records
}

fn parse_card(card: ElementRef<'_>, page_url: &Url) -> Result<BasicRecord> {
    let name_sel = Selector::parse(r#"span[itemprop="name"]"#).unwrap();
    let affiliation_sel = Selector::parse(r#"div[itemprop="affiliation"]"#).unwrap();
    let link_sel = Selector::parse("a.line-truncate").unwrap();
    let image_sel = Selector::parse("img.lazy-image.me-2.border.rounded-circle").unwrap();

    let name = first_text(card, &name_sel);
    let affiliation = first_text(card, &affiliation_sel);

    let url = first_attr(card, &link_sel, "href", page_url).ok_or_else(|| {
        VtdexError::MissingField {
            field: "url",
            name: name.clone(),
        }
    })?;
    let image = first_attr(card, &image_sel, "data-src", page_url).ok_or_else(|| {
        VtdexError::MissingField {
            field: "image",
            name: name.clone(),
        }
    })?;

    Ok(BasicRecord {
        name,
        url,
        image,
        affiliation,
    })
}

fn first_text(scope: ElementRef<'_>, sel: &Selector) -> String {
    scope
        .select(sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Non-empty attribute of the first match, resolved to an absolute URL.
fn first_attr(scope: ElementRef<'_>, sel: &Selector, attr: &str, base: &Url) -> Option<String> {
    let raw = scope.select(sel).next()?.value().attr(attr)?.trim();
    if raw.is_empty() {
        return None;
    }
    match base.join(raw) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(_) => Some(raw.to_string()),
    }
}
