//! Detail page extraction.
//!
//! Profile fields are read verbatim. Empty strings and the site's `....`
//! placeholder are left in place here; the detail stage sanitizes records
//! before they are persisted.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use vtdex_shared::{BasicRecord, DetailRecord, Result, VtdexError};

/// Elements whose presence identifies a persona profile page.
const PROFILE_MARKERS: &str =
    "div#birthday, div#debut, div#status, div#gender, div#hashtags, h3.fs-6.mb-2";

/// Hashtag categories shown on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashtagKind {
    Live,
    Fanart,
    Fans,
    Other,
}

impl HashtagKind {
    fn from_label(label: &str) -> Self {
        match label {
            "Live" => Self::Live,
            "Fanart" => Self::Fanart,
            "Fans" => Self::Fans,
            _ => Self::Other,
        }
    }
}

/// Build a [`DetailRecord`] from a profile page and the record that linked to it.
pub fn parse_detail_page(html: &str, basic: BasicRecord) -> Result<DetailRecord> {
    let doc = Html::parse_document(html);

    let marker_sel = Selector::parse(PROFILE_MARKERS).unwrap();
    if doc.select(&marker_sel).next().is_none() {
        return Err(VtdexError::parse(format!(
            "{}: no profile sections found",
            basic.url
        )));
    }

    let mut record = DetailRecord::from_basic(basic);

    record.original_name = value_line(&doc, "div#original-name");
    record.nicknames = nicknames(&doc);
    record.birthday = first_text(&doc, "div#birthday > div > span");
    record.debut_date = first_text(&doc, "div#debut > div > span");
    record.height = value_line(&doc, "div#height");
    record.weight = value_line(&doc, "div#weight");
    record.zodiac_sign = first_text(&doc, "div#zodiac > a");
    record.group = first_text(&doc, "div#group > a");
    record.language = first_text(&doc, "div#language > a");
    record.gender = first_text(&doc, "div#gender > a");
    record.oshi_mark = value_line(&doc, "div#oshi-mark");
    record.status = value_line(&doc, "div#status");

    apply_hashtags(&doc, &mut record)?;

    record.youtube = section_links(&doc, "Channels")
        .iter()
        .filter(|link| link.contains("youtube"))
        .find_map(|link| path_segment(link, 1))
        .unwrap_or_default();

    record.twitter = section_links(&doc, "Socials")
        .iter()
        .filter(|link| link.contains("twitter") || link.contains("//x.com"))
        .find_map(|link| path_segment(link, 0));

    Ok(record)
}

/// Sort hashtag rows into the stream/art/fan slots; the first tag of each
/// kind wins and the rest land in `other_tags`.
fn apply_hashtags(doc: &Html, record: &mut DetailRecord) -> Result<()> {
    let row_sel = Selector::parse("div#hashtags > div.mb-3 > div.py-1").unwrap();
    let tag_sel = Selector::parse("a").unwrap();

    for row in doc.select(&row_sel) {
        let tag = row
            .select(&tag_sel)
            .next()
            .map(|a| a.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let row_text = row.text().collect::<String>();
        let label = row_text.split('-').nth(1).map(str::trim).ok_or_else(|| {
            VtdexError::parse(format!(
                "{}: hashtag row without a kind label: {:?}",
                record.basic.url,
                row_text.trim()
            ))
        })?;

        let slot = match HashtagKind::from_label(label) {
            HashtagKind::Live => &mut record.stream_tag,
            HashtagKind::Fanart => &mut record.art_tag,
            HashtagKind::Fans => &mut record.fan_tag,
            HashtagKind::Other => {
                record.other_tags.push(tag);
                continue;
            }
        };

        if slot.is_some() {
            record.other_tags.push(tag);
        } else {
            *slot = Some(tag);
        }
    }

    Ok(())
}

/// One nickname per line, across every value block of the nickname section.
fn nicknames(doc: &Html) -> Vec<String> {
    let sel = Selector::parse("div#nickname > div").unwrap();
    doc.select(&sel)
        .flat_map(|el| {
            el.text()
                .collect::<String>()
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(css).unwrap();
    doc.select(&sel).next()
}

fn first_text(doc: &Html, css: &str) -> Option<String> {
    select_first(doc, css).map(|el| el.text().collect::<String>().trim().to_string())
}

/// Labelled sections render as a label line followed by the value line.
fn value_line(doc: &Html, css: &str) -> Option<String> {
    let text = select_first(doc, css)?.text().collect::<String>();
    let value = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .nth(1)
        .unwrap_or_default();
    Some(value.to_string())
}

/// Links inside the `.d-flex` siblings of the section header titled `heading`.
fn section_links(doc: &Html, heading: &str) -> Vec<String> {
    let header_sel = Selector::parse("h3.fs-6.mb-2").unwrap();
    let link_sel = Selector::parse("a[href]").unwrap();

    let mut links = Vec::new();
    for header in doc
        .select(&header_sel)
        .filter(|h| h.text().collect::<String>().contains(heading))
    {
        let Some(parent) = header.parent() else {
            continue;
        };
        for sibling in parent.children().filter_map(ElementRef::wrap) {
            if sibling == header || !sibling.value().classes().any(|c| c == "d-flex") {
                continue;
            }
            links.extend(
                sibling
                    .select(&link_sel)
                    .filter_map(|a| a.value().attr("href"))
                    .map(String::from),
            );
        }
    }
    links
}

/// The `index`-th path segment of an absolute link, if non-empty.
fn path_segment(link: &str, index: usize) -> Option<String> {
    let url = Url::parse(link).ok()?;
    url.path_segments()?
        .nth(index)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
